use extracto_core::{DayMonth, Money};

use crate::boundary::{header_captures, StatementBlock};
use crate::identifier::{find_known_merchant, separate_identifier};
use crate::normalize::Normalizer;
use crate::types::BlockError;

pub const BIZUM_MARKER: &str = "BIZUM";
/// Prefixes that introduce the sender's note on a Bizum detail line.
pub const BIZUM_NOTE_PREFIXES: &[&str] = &["RECIBIDO:", "ENVIADO:", "COMPRA:"];

/// Fields parsed from one block, before categorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftRecord {
    pub line_number: usize,
    pub operation_date: DayMonth,
    pub value_date: DayMonth,
    pub raw_operation_text: String,
    pub identifier: String,
    pub merchant_name: String,
    pub concept_detail: String,
    pub signed_amount: Money,
    pub running_balance: Money,
}

#[derive(Debug, Default)]
struct PayeeFields {
    raw_operation_text: String,
    identifier: String,
    merchant_name: String,
    concept_detail: String,
}

pub struct Extractor;

impl Extractor {
    pub fn extract(block: &StatementBlock, normalizer: &Normalizer) -> Result<DraftRecord, BlockError> {
        let caps = header_captures(&block.header).ok_or_else(|| BlockError::NotAHeader {
            line: block.header.clone(),
        })?;

        let operation_date = parse_date(&caps[1], &block.header)?;
        let value_date = parse_date(&caps[2], &block.header)?;

        let (signed_amount, running_balance) =
            match (Money::parse_locale(&caps[4]), Money::parse_locale(&caps[5])) {
                (Ok(amount), Ok(balance)) => (amount, balance),
                _ => {
                    return Err(BlockError::InvalidAmount {
                        line: block.header.clone(),
                        amount: caps[4].to_string(),
                        balance: caps[5].to_string(),
                    })
                }
            };

        let description = normalizer.normalize(&caps[3]);
        let fields = if description.to_uppercase().contains(BIZUM_MARKER) {
            bizum_fields(&block.details)
        } else {
            payee_fields(description, &block.details)
        };

        Ok(DraftRecord {
            line_number: block.line_number,
            operation_date,
            value_date,
            raw_operation_text: fields.raw_operation_text,
            identifier: fields.identifier,
            merchant_name: fields.merchant_name,
            concept_detail: fields.concept_detail,
            signed_amount,
            running_balance,
        })
    }
}

fn parse_date(token: &str, line: &str) -> Result<DayMonth, BlockError> {
    DayMonth::parse(token).ok_or_else(|| BlockError::InvalidDate {
        line: line.to_string(),
        token: token.to_string(),
    })
}

// ── Bizum ────────────────────────────────────────────────────────────────────

/// Bizum rows carry no merchant or identifier; the only payload is the note.
fn bizum_fields(details: &[String]) -> PayeeFields {
    PayeeFields {
        raw_operation_text: BIZUM_MARKER.to_string(),
        concept_detail: bizum_note(details).unwrap_or_default(),
        ..PayeeFields::default()
    }
}

fn bizum_note(details: &[String]) -> Option<String> {
    details.iter().find_map(|line| {
        BIZUM_NOTE_PREFIXES.iter().find_map(|prefix| {
            line.find(prefix)
                .map(|pos| line[pos + prefix.len()..].trim().to_string())
        })
    })
}

// ── Identifier / merchant ────────────────────────────────────────────────────

fn payee_fields(description: String, details: &[String]) -> PayeeFields {
    let payee = details.join(" ").trim().to_string();
    let from_description = payee.is_empty();
    let combined = if from_description { &description } else { &payee };

    if let Some(split) = find_known_merchant(combined) {
        let residual = separate_identifier(&split.before);
        let raw_operation_text = match (from_description, residual.merchant_name.is_empty()) {
            (_, true) => description,
            (true, false) => residual.merchant_name,
            (false, false) => format!("{description} {}", residual.merchant_name),
        };
        return PayeeFields {
            raw_operation_text,
            identifier: residual.identifier,
            merchant_name: split.merchant,
            concept_detail: String::new(),
        };
    }

    if from_description {
        return PayeeFields {
            raw_operation_text: description,
            ..PayeeFields::default()
        };
    }

    let separated = separate_identifier(&payee);
    PayeeFields {
        raw_operation_text: description,
        identifier: separated.identifier,
        merchant_name: separated.merchant_name,
        concept_detail: String::new(),
    }
}
