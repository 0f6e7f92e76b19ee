use extracto_categorize::Categorization;
use extracto_core::{RecordParts, SourceDocument, StatementPeriod, TransactionRecord};

use crate::boundary::StatementBlock;
use crate::extract::DraftRecord;
use crate::types::{BlockError, BlockFailure, StatementOutcome};

/// Collects validated records and per-block failures for one document.
pub struct RecordAssembler {
    source_document: SourceDocument,
    period: StatementPeriod,
    records: Vec<TransactionRecord>,
    failures: Vec<BlockFailure>,
}

impl RecordAssembler {
    pub fn new(source_document: SourceDocument, period: StatementPeriod) -> Self {
        Self {
            source_document,
            period,
            records: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn accept(&mut self, block: &StatementBlock, draft: DraftRecord, categorization: Categorization) {
        if !self.period.covers(draft.operation_date) {
            tracing::debug!(
                line = draft.line_number,
                date = %draft.operation_date,
                period = %self.period,
                "row date outside statement period"
            );
        }

        let parts = RecordParts {
            operation_date: draft.operation_date,
            value_date: draft.value_date,
            raw_operation_text: draft.raw_operation_text,
            identifier: draft.identifier,
            merchant_name: draft.merchant_name,
            concept_detail: draft.concept_detail,
            signed_amount: draft.signed_amount,
            running_balance: draft.running_balance,
            category: categorization.category,
            subcategory: categorization.subcategory,
            period: self.period,
            source_document: self.source_document.clone(),
        };

        match TransactionRecord::validate(parts) {
            Ok(record) => {
                tracing::debug!(
                    line = block.line_number,
                    amount = %record.signed_amount(),
                    category = %record.category,
                    source = %categorization.source,
                    "record assembled"
                );
                self.records.push(record);
            }
            Err(e) => self.reject(block, BlockError::from(e)),
        }
    }

    pub fn reject(&mut self, block: &StatementBlock, error: BlockError) {
        tracing::warn!(
            document = %self.source_document,
            line = block.line_number,
            error = %error,
            "block skipped"
        );
        self.failures.push(BlockFailure {
            line_number: block.line_number,
            block_text: block.text(),
            error,
        });
    }

    pub fn finish(self, fingerprint: String) -> StatementOutcome {
        StatementOutcome {
            source_document: self.source_document,
            period: self.period,
            records: self.records,
            failures: self.failures,
            fingerprint,
        }
    }
}
