use extracto_core::{Money, RecordError, SourceDocument, StatementPeriod, TransactionRecord};
use serde::Serialize;
use thiserror::Error;

use crate::source::SourceError;

/// Why a single block produced no record. Other blocks are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("Line is not a transaction header: {line}")]
    NotAHeader { line: String },
    #[error("Invalid date '{token}' in: {line}")]
    InvalidDate { line: String, token: String },
    #[error("Amount '{amount}' or balance '{balance}' is not a number in: {line}")]
    InvalidAmount {
        line: String,
        amount: String,
        balance: String,
    },
    #[error("Record rejected: {0}")]
    Record(#[from] RecordError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockFailure {
    pub line_number: usize,
    pub block_text: String,
    pub error: BlockError,
}

/// Everything produced from one document.
#[derive(Debug, Clone)]
pub struct StatementOutcome {
    pub source_document: SourceDocument,
    pub period: StatementPeriod,
    pub records: Vec<TransactionRecord>,
    pub failures: Vec<BlockFailure>,
    /// SHA-256 of the document text, hex.
    pub fingerprint: String,
}

impl StatementOutcome {
    /// Sum of income magnitudes, `None` if it overflows.
    pub fn total_income(&self) -> Option<Money> {
        sum_amounts(self.records.iter().filter(|r| !r.is_expense()))
    }

    /// Sum of expense magnitudes, `None` if it overflows.
    pub fn total_expense(&self) -> Option<Money> {
        sum_amounts(self.records.iter().filter(|r| r.is_expense()))
    }

    pub fn summary(&self) -> OutcomeSummary {
        OutcomeSummary {
            source_document: self.source_document.clone(),
            period: self.period,
            records: self.records.len(),
            failed_blocks: self.failures.len(),
            total_income: self.total_income(),
            total_expense: self.total_expense(),
        }
    }
}

fn sum_amounts<'a>(mut records: impl Iterator<Item = &'a TransactionRecord>) -> Option<Money> {
    records.try_fold(Money::zero(), |acc, r| acc.checked_add(r.amount))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeSummary {
    pub source_document: SourceDocument,
    pub period: StatementPeriod,
    pub records: usize,
    pub failed_blocks: usize,
    /// `null` when the total overflowed.
    pub total_income: Option<Money>,
    pub total_expense: Option<Money>,
}

/// Why a whole document contributed no records.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("{document} has the same content as {first_seen}")]
    Duplicate {
        document: SourceDocument,
        first_seen: SourceDocument,
    },
}

#[derive(Debug)]
pub struct DocumentFailure {
    pub document: SourceDocument,
    pub error: DocumentError,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub outcomes: Vec<StatementOutcome>,
    pub failures: Vec<DocumentFailure>,
}

impl BatchOutcome {
    /// All records across documents, in document then row order.
    pub fn records(&self) -> impl Iterator<Item = &TransactionRecord> {
        self.outcomes.iter().flat_map(|o| o.records.iter())
    }

    pub fn record_count(&self) -> usize {
        self.outcomes.iter().map(|o| o.records.len()).sum()
    }

    pub fn failed_block_count(&self) -> usize {
        self.outcomes.iter().map(|o| o.failures.len()).sum()
    }

    pub fn documents_processed(&self) -> usize {
        self.outcomes.len()
    }

    pub fn documents_failed(&self) -> usize {
        self.failures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extracto_core::{DayMonth, RecordParts};

    fn record(cents: i64) -> TransactionRecord {
        record_of(Money::from_cents(cents))
    }

    fn record_of(signed_amount: Money) -> TransactionRecord {
        TransactionRecord::validate(RecordParts {
            operation_date: DayMonth::new(1, 9).unwrap(),
            value_date: DayMonth::new(1, 9).unwrap(),
            raw_operation_text: "X".into(),
            identifier: String::new(),
            merchant_name: String::new(),
            concept_detail: String::new(),
            signed_amount,
            running_balance: Money::zero(),
            category: "OTHER".into(),
            subcategory: "VARIOUS".into(),
            period: StatementPeriod::Unknown,
            source_document: SourceDocument::new("a"),
        })
        .unwrap()
    }

    #[test]
    fn totals_split_by_direction() {
        let outcome = StatementOutcome {
            source_document: SourceDocument::new("a"),
            period: StatementPeriod::Unknown,
            records: vec![record(-1250), record(150000), record(-250), record(0)],
            failures: vec![],
            fingerprint: String::new(),
        };
        assert_eq!(outcome.total_expense(), Some(Money::from_cents(1500)));
        assert_eq!(outcome.total_income(), Some(Money::from_cents(150000)));
        let summary = outcome.summary();
        assert_eq!(summary.records, 4);
        assert_eq!(summary.failed_blocks, 0);
    }

    #[test]
    fn overflowing_totals_are_none() {
        let huge = Money::parse_locale("79.228.162.514.264.337.593.543.950.335,00").unwrap();
        let outcome = StatementOutcome {
            source_document: SourceDocument::new("a"),
            period: StatementPeriod::Unknown,
            records: vec![record_of(huge), record(-100), record_of(huge), record(-250)],
            failures: vec![],
            fingerprint: String::new(),
        };
        assert_eq!(outcome.total_income(), None);
        assert_eq!(outcome.total_expense(), Some(Money::from_cents(350)));

        let summary = outcome.summary();
        assert_eq!(summary.total_income, None);
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json["total_income"].is_null());
    }

    #[test]
    fn duplicate_error_message() {
        let err = DocumentError::Duplicate {
            document: SourceDocument::new("b.pdf"),
            first_seen: SourceDocument::new("a.pdf"),
        };
        assert_eq!(err.to_string(), "b.pdf has the same content as a.pdf");
    }
}
