//! Multi-document text dumps.
//!
//! A dump concatenates the extracted text of several statements. Each one
//! starts with an `ARCHIVO: <name>` line; a body consisting only of `ERROR`
//! marks a document whose extraction failed. Lines made only of `=` are
//! separators.

use extracto_core::SourceDocument;

use crate::source::InMemorySource;

const DOCUMENT_MARKER: &str = "ARCHIVO:";
const FAILED_BODY: &str = "ERROR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpEntry {
    pub document: SourceDocument,
    /// Extracted text, or `None` when the dump recorded a failure.
    pub text: Option<String>,
}

pub fn is_dump(text: &str) -> bool {
    text.lines().any(|l| l.trim_start().starts_with(DOCUMENT_MARKER))
}

/// Lines before the first marker are ignored.
pub fn split_dump(text: &str) -> Vec<DumpEntry> {
    let mut entries: Vec<(SourceDocument, Vec<&str>)> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(name) = trimmed.strip_prefix(DOCUMENT_MARKER) {
            entries.push((SourceDocument::new(name.trim()), Vec::new()));
            continue;
        }
        if !trimmed.is_empty() && trimmed.chars().all(|c| c == '=') {
            continue;
        }
        if let Some((_, body)) = entries.last_mut() {
            body.push(line);
        }
    }

    entries
        .into_iter()
        .map(|(document, body)| {
            let body = body.join("\n");
            let text = (body.trim() != FAILED_BODY).then_some(body);
            DumpEntry { document, text }
        })
        .collect()
}

impl InMemorySource {
    /// Add every entry of a dump, keeping failed extractions as unreadable.
    pub fn add_dump(&mut self, text: &str) {
        for entry in split_dump(text) {
            match entry.text {
                Some(body) => self.add_text(entry.document, body),
                None => self.add_unreadable(entry.document, "text extraction failed"),
            }
        }
    }
}
