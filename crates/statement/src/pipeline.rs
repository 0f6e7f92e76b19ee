use std::collections::HashMap;

use extracto_categorize::Categorizer;
use extracto_core::SourceDocument;

use crate::assemble::RecordAssembler;
use crate::boundary::BoundaryDetector;
use crate::extract::Extractor;
use crate::hash;
use crate::normalize::Normalizer;
use crate::period::resolve_period;
use crate::source::TextSource;
use crate::types::{BatchOutcome, DocumentError, DocumentFailure, StatementOutcome};

/// Orchestrates: period → normalize → segment into blocks → extract →
/// categorize → assemble. The normalizer and categorizer are read-only, so
/// one pipeline can serve any number of documents.
pub struct StatementPipeline {
    normalizer: Normalizer,
    categorizer: Categorizer,
}

impl StatementPipeline {
    pub fn new(normalizer: Normalizer, categorizer: Categorizer) -> Self {
        Self { normalizer, categorizer }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn categorizer(&self) -> &Categorizer {
        &self.categorizer
    }

    /// Process one document's extracted text. Never fails as a whole:
    /// malformed blocks are reported in the outcome and skipped.
    pub fn process_document(&self, document: &SourceDocument, raw_text: &str) -> StatementOutcome {
        let period = resolve_period(raw_text);
        let lines: Vec<String> = raw_text
            .lines()
            .map(|l| self.normalizer.normalize(l))
            .collect();
        let blocks = BoundaryDetector::detect(&lines);

        let mut assembler = RecordAssembler::new(document.clone(), period);
        for block in &blocks {
            match Extractor::extract(block, &self.normalizer) {
                Ok(draft) => {
                    let categorization = self
                        .categorizer
                        .categorize(&draft.raw_operation_text, &draft.merchant_name);
                    assembler.accept(block, draft, categorization);
                }
                Err(e) => assembler.reject(block, e),
            }
        }

        let outcome = assembler.finish(hash::fingerprint(raw_text));
        tracing::info!(
            document = %document,
            period = %outcome.period,
            blocks = blocks.len(),
            records = outcome.records.len(),
            failed = outcome.failures.len(),
            "statement processed"
        );
        outcome
    }

    /// Process documents in the given order. A document that cannot be read,
    /// or whose text repeats an earlier document, is reported and skipped.
    pub fn process_batch<S: TextSource + ?Sized>(
        &self,
        source: &S,
        documents: &[SourceDocument],
    ) -> BatchOutcome {
        let mut batch = BatchOutcome::default();
        let mut seen: HashMap<String, SourceDocument> = HashMap::new();

        for document in documents {
            let text = match source.extract_text(document) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(document = %document, error = %e, "document skipped");
                    batch.failures.push(DocumentFailure {
                        document: document.clone(),
                        error: DocumentError::from(e),
                    });
                    continue;
                }
            };

            let fingerprint = hash::fingerprint(&text);
            if let Some(first_seen) = seen.get(&fingerprint) {
                tracing::warn!(document = %document, first_seen = %first_seen, "duplicate document skipped");
                batch.failures.push(DocumentFailure {
                    document: document.clone(),
                    error: DocumentError::Duplicate {
                        document: document.clone(),
                        first_seen: first_seen.clone(),
                    },
                });
                continue;
            }
            seen.insert(fingerprint, document.clone());

            batch.outcomes.push(self.process_document(document, &text));
        }

        tracing::info!(
            processed = batch.documents_processed(),
            failed = batch.documents_failed(),
            records = batch.record_count(),
            "batch finished"
        );
        batch
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
