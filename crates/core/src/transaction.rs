use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::money::Money;
use super::period::StatementPeriod;

/// A calendar day without a year, as printed in statement rows (`dd/mm`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DayMonth {
    pub day: u32,
    pub month: u32,
}

impl DayMonth {
    /// Validated against a leap year so `29/02` is accepted.
    pub fn new(day: u32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(2024, month, day).map(|_| DayMonth { day, month })
    }

    pub fn parse(token: &str) -> Option<Self> {
        let (day, month) = token.trim().split_once('/')?;
        DayMonth::new(day.parse().ok()?, month.parse().ok()?)
    }

    pub fn with_year(self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

impl fmt::Display for DayMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.day, self.month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Income,
    Expense,
}

impl Direction {
    /// Expense iff the signed amount is negative; zero counts as income.
    pub fn from_signed(amount: Money) -> Self {
        if amount.is_negative() {
            Direction::Expense
        } else {
            Direction::Income
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Income => write!(f, "INCOME"),
            Direction::Expense => write!(f, "EXPENSE"),
        }
    }
}

/// Identity of the statement a record was extracted from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceDocument(pub String);

impl SourceDocument {
    pub fn new(id: impl Into<String>) -> Self {
        SourceDocument(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("Category must not be empty")]
    EmptyCategory,
    #[error("Subcategory must not be empty")]
    EmptySubcategory,
}

/// Every field of a record before its invariants are checked. The amount is
/// still signed as it appeared on the statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordParts {
    pub operation_date: DayMonth,
    pub value_date: DayMonth,
    pub raw_operation_text: String,
    pub identifier: String,
    pub merchant_name: String,
    pub concept_detail: String,
    pub signed_amount: Money,
    pub running_balance: Money,
    pub category: String,
    pub subcategory: String,
    pub period: StatementPeriod,
    pub source_document: SourceDocument,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub operation_date: DayMonth,
    pub value_date: DayMonth,
    pub raw_operation_text: String,
    pub identifier: String,
    pub merchant_name: String,
    pub concept_detail: String,
    /// Magnitude only; the sign lives in `direction`.
    pub amount: Money,
    pub direction: Direction,
    pub running_balance: Money,
    pub category: String,
    pub subcategory: String,
    pub period: StatementPeriod,
    pub source_document: SourceDocument,
}

impl TransactionRecord {
    pub fn validate(parts: RecordParts) -> Result<TransactionRecord, RecordError> {
        if parts.category.trim().is_empty() {
            return Err(RecordError::EmptyCategory);
        }
        if parts.subcategory.trim().is_empty() {
            return Err(RecordError::EmptySubcategory);
        }

        Ok(TransactionRecord {
            operation_date: parts.operation_date,
            value_date: parts.value_date,
            raw_operation_text: parts.raw_operation_text,
            identifier: parts.identifier,
            merchant_name: parts.merchant_name,
            concept_detail: parts.concept_detail,
            amount: parts.signed_amount.abs(),
            direction: Direction::from_signed(parts.signed_amount),
            running_balance: parts.running_balance,
            category: parts.category,
            subcategory: parts.subcategory,
            period: parts.period,
            source_document: parts.source_document,
        })
    }

    /// The amount with its statement sign restored.
    pub fn signed_amount(&self) -> Money {
        match self.direction {
            Direction::Income => self.amount,
            Direction::Expense => -self.amount,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.direction == Direction::Expense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(cents: i64) -> RecordParts {
        RecordParts {
            operation_date: DayMonth::new(1, 9).unwrap(),
            value_date: DayMonth::new(2, 9).unwrap(),
            raw_operation_text: "PAGO CON TARJETA EN RESTAURANTES".to_string(),
            identifier: String::new(),
            merchant_name: String::new(),
            concept_detail: String::new(),
            signed_amount: Money::from_cents(cents),
            running_balance: Money::from_cents(123456),
            category: "FOOD".to_string(),
            subcategory: "RESTAURANT".to_string(),
            period: StatementPeriod::known(2025, 9).unwrap(),
            source_document: SourceDocument::new("septiembre.pdf"),
        }
    }

    #[test]
    fn validate_negative_amount_is_expense() {
        let r = TransactionRecord::validate(parts(-1250)).unwrap();
        assert_eq!(r.amount, Money::from_cents(1250));
        assert_eq!(r.direction, Direction::Expense);
        assert_eq!(r.signed_amount(), Money::from_cents(-1250));
        assert!(r.is_expense());
    }

    #[test]
    fn validate_positive_amount_is_income() {
        let r = TransactionRecord::validate(parts(150000)).unwrap();
        assert_eq!(r.amount, Money::from_cents(150000));
        assert_eq!(r.direction, Direction::Income);
    }

    #[test]
    fn zero_amount_is_income() {
        assert_eq!(Direction::from_signed(Money::zero()), Direction::Income);
    }

    #[test]
    fn validate_rejects_blank_category() {
        let mut p = parts(-100);
        p.category = "  ".to_string();
        assert_eq!(TransactionRecord::validate(p), Err(RecordError::EmptyCategory));
    }

    #[test]
    fn validate_rejects_empty_subcategory() {
        let mut p = parts(-100);
        p.subcategory = String::new();
        assert_eq!(TransactionRecord::validate(p), Err(RecordError::EmptySubcategory));
    }

    #[test]
    fn day_month_parse() {
        assert_eq!(DayMonth::parse("01/09"), DayMonth::new(1, 9));
        assert_eq!(DayMonth::parse("29/02"), DayMonth::new(29, 2));
        assert!(DayMonth::parse("31/04").is_none());
        assert!(DayMonth::parse("0109").is_none());
        assert!(DayMonth::parse("aa/bb").is_none());
    }

    #[test]
    fn day_month_with_year() {
        let d = DayMonth::new(29, 2).unwrap();
        assert_eq!(d.with_year(2024), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(d.with_year(2025), None);
    }

    #[test]
    fn day_month_display_pads() {
        assert_eq!(DayMonth::new(1, 9).unwrap().to_string(), "01/09");
    }

    #[test]
    fn direction_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Direction::Expense).unwrap(), "\"EXPENSE\"");
    }
}
