//! Text extraction from uploaded documents.

use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent, TableChild,
    TableRowChild,
};
use log::{info, warn};

use crate::error::{AssistantError, Result};
use crate::types::UploadKind;

const EMPTY_DOCX: &str = "The document appears to be empty.";

/// Extracts the text of an uploaded document.
///
/// Images carry no text and are rejected.
pub fn extract_text(kind: UploadKind, data: &[u8]) -> Result<String> {
    let text = match kind {
        UploadKind::Text => read_txt(data),
        UploadKind::Pdf => read_pdf(data),
        UploadKind::Docx => read_docx(data),
        UploadKind::Image => Err(AssistantError::Extraction {
            format: "document",
            message: "images have no text to extract".to_string(),
        }),
    };

    match &text {
        Ok(text) => info!("Extracted {} characters of {:?} text", text.len(), kind),
        Err(e) => warn!("Extraction failed: {}", e),
    }
    text
}

fn read_txt(data: &[u8]) -> Result<String> {
    String::from_utf8(data.to_vec()).map_err(|e| AssistantError::Extraction {
        format: "TXT",
        message: e.to_string(),
    })
}

fn read_pdf(data: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(data).map_err(|e| AssistantError::Extraction {
        format: "PDF",
        message: e.to_string(),
    })
}

/// Non-empty paragraphs first, then one line per table row with its
/// non-empty cells joined by " | ".
fn read_docx(data: &[u8]) -> Result<String> {
    let docx = docx_rs::read_docx(data).map_err(|e| AssistantError::Extraction {
        format: "DOCX file",
        message: e.to_string(),
    })?;

    let mut paragraphs: Vec<String> = Vec::new();
    let mut rows: Vec<String> = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => {
                let text = paragraph_text(paragraph);
                if !text.trim().is_empty() {
                    paragraphs.push(text);
                }
            }
            DocumentChild::Table(table) => rows.extend(table_rows(table)),
            _ => {}
        }
    }

    paragraphs.extend(rows);
    let text = paragraphs.join("\n");
    if text.trim().is_empty() {
        return Ok(EMPTY_DOCX.to_string());
    }
    Ok(text)
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    push_children_text(&paragraph.children, &mut text);
    text
}

/// Appends run text, including runs nested in hyperlinks.
fn push_children_text(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    if let RunChild::Text(t) = run_child {
                        text.push_str(&t.text);
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_children_text(&link.children, text),
            _ => {}
        }
    }
}

fn table_rows(table: &Table) -> Vec<String> {
    let mut rows = Vec::new();
    for row in &table.rows {
        #[allow(irrefutable_let_patterns)]
        let TableChild::TableRow(row) = row else {
            continue;
        };
        let mut cells: Vec<String> = Vec::new();
        for cell in &row.cells {
            #[allow(irrefutable_let_patterns)]
            let TableRowChild::TableCell(cell) = cell else {
                continue;
            };
            let lines: Vec<String> = cell
                .children
                .iter()
                .filter_map(|content| match content {
                    TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
                    _ => None,
                })
                .collect();
            let text = lines.join("\n");
            let text = text.trim();
            if !text.is_empty() {
                cells.push(text.to_string());
            }
        }
        if !cells.is_empty() {
            rows.push(cells.join(" | "));
        }
    }
    rows
}
