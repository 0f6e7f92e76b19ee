use extracto_core::SourceDocument;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Could not extract text from {document}: {reason}")]
    Unreadable {
        document: SourceDocument,
        reason: String,
    },
    #[error("Unknown document: {0}")]
    Unknown(SourceDocument),
}

/// Abstraction over whatever turns a statement document into plain text
/// (PDF text layer, OCR, a pre-extracted dump).
pub trait TextSource: Send + Sync {
    fn extract_text(&self, document: &SourceDocument) -> Result<String, SourceError>;
}

// ── In-memory source ─────────────────────────────────────────────────────────

/// Text already held in memory, keyed by document. Documents keep the order
/// they were added in; an entry may also record that extraction failed.
#[derive(Debug, Default)]
pub struct InMemorySource {
    entries: Vec<(SourceDocument, Result<String, String>)>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, document: impl Into<String>, text: impl Into<String>) -> Self {
        self.add_text(SourceDocument::new(document), text);
        self
    }

    pub fn with_unreadable(mut self, document: impl Into<String>, reason: impl Into<String>) -> Self {
        self.add_unreadable(SourceDocument::new(document), reason);
        self
    }

    pub fn add_text(&mut self, document: SourceDocument, text: impl Into<String>) {
        self.entries.push((document, Ok(text.into())));
    }

    pub fn add_unreadable(&mut self, document: SourceDocument, reason: impl Into<String>) {
        self.entries.push((document, Err(reason.into())));
    }

    pub fn documents(&self) -> Vec<SourceDocument> {
        self.entries.iter().map(|(d, _)| d.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TextSource for InMemorySource {
    fn extract_text(&self, document: &SourceDocument) -> Result<String, SourceError> {
        let (_, entry) = self
            .entries
            .iter()
            .find(|(d, _)| d == document)
            .ok_or_else(|| SourceError::Unknown(document.clone()))?;
        entry.clone().map_err(|reason| SourceError::Unreadable {
            document: document.clone(),
            reason,
        })
    }
}
