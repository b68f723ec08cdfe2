//! Code snippets keyed by program name, loaded from a JSON side file.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, error, info, warn};

use crate::error::Result;

/// Immutable program name to source table.
#[derive(Debug, Clone, Default)]
pub struct SnippetTable {
    /// Entries sorted by name, with the lowercased name alongside
    entries: Vec<(String, String, String)>,
}

impl SnippetTable {
    pub fn new(snippets: BTreeMap<String, String>) -> Self {
        let entries = snippets
            .into_iter()
            .map(|(name, source)| (name.to_lowercase(), name, source))
            .collect();
        Self { entries }
    }

    /// Parses a JSON object of `name -> source`.
    pub fn from_json(json: &str) -> Result<Self> {
        let snippets: BTreeMap<String, String> = serde_json::from_str(json)?;
        Ok(Self::new(snippets))
    }

    /// Loads the table from disk. A missing file yields an empty table with
    /// a warning; an unreadable or malformed one yields an empty table with
    /// an error log.
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("{} not found, starting with no code snippets", path.display());
                return Self::default();
            }
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(table) => {
                info!("Loaded {} code snippets from {}", table.len(), path.display());
                table
            }
            Err(e) => {
                error!("Failed to parse {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the longest program name contained in the message. Equal
    /// lengths resolve to the name that sorts first.
    pub fn find(&self, message: &str) -> Option<(&str, &str)> {
        let message = message.to_lowercase();
        let mut best: Option<&(String, String, String)> = None;
        for entry in &self.entries {
            if !message.contains(entry.0.as_str()) {
                continue;
            }
            if best.is_none_or(|b| entry.0.len() > b.0.len()) {
                best = Some(entry);
            }
        }
        best.map(|(_, name, source)| (name.as_str(), source.as_str()))
    }

    /// Reply for a message naming a known program.
    pub fn lookup(&self, message: &str) -> Option<String> {
        let (name, source) = self.find(message)?;
        debug!("Snippet lookup matched '{}'", name);
        Some(format!("Here is the {name} program:\n```python\n{source}\n```"))
    }
}
