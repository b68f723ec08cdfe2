//! Common types shared by the dispatcher and the HTTP layer.

use std::path::Path;

use serde::Serialize;
use strum::EnumString;

/// A chat reply.
///
/// Serializes to `{"reply": ...}` for plain text, or to the structured
/// document object used by the read-out/summarize flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    /// Plain text reply
    Text { reply: String },
    /// Reply in the document flow, with a separate text-to-speech line
    Document {
        text: String,
        speak: String,
        full_content: Option<String>,
    },
}

impl Reply {
    pub fn text(reply: impl Into<String>) -> Self {
        Reply::Text {
            reply: reply.into(),
        }
    }

    /// Returns the displayed text of the reply
    pub fn as_text(&self) -> &str {
        match self {
            Reply::Text { reply } => reply,
            Reply::Document { text, .. } => text,
        }
    }
}

/// JSON body returned by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UploadReply {
    Caption {
        caption: String,
    },
    Document {
        #[serde(rename = "type")]
        kind: &'static str,
        message: &'static str,
        speak: &'static str,
    },
    Error {
        status: &'static str,
        message: String,
    },
    NoFile {
        status: &'static str,
    },
}

impl UploadReply {
    pub fn error(message: impl Into<String>) -> Self {
        UploadReply::Error {
            status: "error",
            message: message.into(),
        }
    }

    pub fn no_file() -> Self {
        UploadReply::NoFile {
            status: "no file uploaded",
        }
    }
}

/// File extensions accepted by the upload endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
enum Extension {
    Png,
    Jpg,
    Jpeg,
    Bmp,
    Pdf,
    Docx,
    Txt,
}

/// How an uploaded file is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// Image to caption
    Image,
    /// PDF document
    Pdf,
    /// Word document
    Docx,
    /// Plain text file
    Text,
}

impl UploadKind {
    /// Determine the upload kind from the file name's extension
    pub fn from_filename(filename: &str) -> Option<UploadKind> {
        let extension = Path::new(filename).extension()?.to_str()?;
        let kind = match extension.parse::<Extension>().ok()? {
            Extension::Png | Extension::Jpg | Extension::Jpeg | Extension::Bmp => UploadKind::Image,
            Extension::Pdf => UploadKind::Pdf,
            Extension::Docx => UploadKind::Docx,
            Extension::Txt => UploadKind::Text,
        };
        Some(kind)
    }
}
