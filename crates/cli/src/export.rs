use std::io::Write;

use extracto_core::TransactionRecord;
use serde::Serialize;

pub const COLUMNS: &[&str] = &[
    "operation_date",
    "value_date",
    "operation",
    "identifier",
    "merchant_name",
    "concept_detail",
    "amount",
    "direction",
    "balance",
    "category",
    "subcategory",
    "month",
    "year",
    "source_document",
];

/// One output row. Field order must match [`COLUMNS`].
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    operation_date: String,
    value_date: String,
    operation: &'a str,
    identifier: &'a str,
    merchant_name: &'a str,
    concept_detail: &'a str,
    amount: String,
    direction: String,
    balance: String,
    category: &'a str,
    subcategory: &'a str,
    /// Empty when the statement period is unknown.
    month: Option<u32>,
    year: Option<i32>,
    source_document: &'a str,
}

impl<'a> From<&'a TransactionRecord> for CsvRow<'a> {
    fn from(r: &'a TransactionRecord) -> Self {
        CsvRow {
            operation_date: r.operation_date.to_string(),
            value_date: r.value_date.to_string(),
            operation: &r.raw_operation_text,
            identifier: &r.identifier,
            merchant_name: &r.merchant_name,
            concept_detail: &r.concept_detail,
            amount: r.amount.to_string(),
            direction: r.direction.to_string(),
            balance: r.running_balance.to_string(),
            category: &r.category,
            subcategory: &r.subcategory,
            month: r.period.month(),
            year: r.period.year(),
            source_document: r.source_document.as_str(),
        }
    }
}

/// Write a header row followed by one row per record. Returns the number of
/// records written.
pub fn write_records<'a, W, I>(writer: W, records: I) -> Result<usize, csv::Error>
where
    W: Write,
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    out.write_record(COLUMNS)?;

    let mut written = 0;
    for record in records {
        out.serialize(CsvRow::from(record))?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use extracto_core::{DayMonth, Money, RecordParts, SourceDocument, StatementPeriod};

    fn record(period: StatementPeriod) -> TransactionRecord {
        TransactionRecord::validate(RecordParts {
            operation_date: DayMonth::new(1, 9).unwrap(),
            value_date: DayMonth::new(2, 9).unwrap(),
            raw_operation_text: "PAGO CON TARJETA EN SUPERMERCADOS".into(),
            identifier: "1234567890123456".into(),
            merchant_name: "MERCADONA, ELCHE".into(),
            concept_detail: String::new(),
            signed_amount: Money::from_cents(-4530),
            running_balance: Money::from_cents(118926),
            category: "FOOD".into(),
            subcategory: "SUPERMARKET".into(),
            period,
            source_document: SourceDocument::new("septiembre.pdf"),
        })
        .unwrap()
    }

    fn render(records: &[TransactionRecord]) -> String {
        let mut buf = Vec::new();
        let n = write_records(&mut buf, records).unwrap();
        assert_eq!(n, records.len());
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn header_only_without_records() {
        assert_eq!(render(&[]), format!("{}\n", COLUMNS.join(",")));
    }

    #[test]
    fn row_in_column_order() {
        let out = render(&[record(StatementPeriod::known(2025, 9).unwrap())]);
        let row = out.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "01/09,02/09,PAGO CON TARJETA EN SUPERMERCADOS,1234567890123456,\"MERCADONA, ELCHE\",,45.30,EXPENSE,1189.26,FOOD,SUPERMARKET,9,2025,septiembre.pdf"
        );
    }

    #[test]
    fn unknown_period_leaves_month_and_year_empty() {
        let out = render(&[record(StatementPeriod::Unknown)]);
        let row = out.lines().nth(1).unwrap();
        assert!(row.ends_with(",SUPERMARKET,,,septiembre.pdf"));
    }
}
