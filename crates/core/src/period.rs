use serde::{Deserialize, Serialize};
use std::fmt;

use crate::transaction::DayMonth;

/// The (year, month) a statement document covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementPeriod {
    Known { year: i32, month: u32 },
    /// No period header was found in the document.
    Unknown,
}

impl fmt::Display for StatementPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementPeriod::Known { year, month } => write!(f, "{year}-{month:02}"),
            StatementPeriod::Unknown => write!(f, "unknown"),
        }
    }
}

impl StatementPeriod {
    pub fn known(year: i32, month: u32) -> Option<Self> {
        (1..=12)
            .contains(&month)
            .then_some(StatementPeriod::Known { year, month })
    }

    pub fn year(self) -> Option<i32> {
        match self {
            StatementPeriod::Known { year, .. } => Some(year),
            StatementPeriod::Unknown => None,
        }
    }

    pub fn month(self) -> Option<u32> {
        match self {
            StatementPeriod::Known { month, .. } => Some(month),
            StatementPeriod::Unknown => None,
        }
    }

    /// Whether a row date falls inside this period. Always true when the
    /// period is unknown, since there is nothing to compare against. A
    /// `29/02` row is outside a known non-leap year.
    pub fn covers(self, date: DayMonth) -> bool {
        match self {
            StatementPeriod::Known { year, month } => {
                date.month == month && date.with_year(year).is_some()
            }
            StatementPeriod::Unknown => true,
        }
    }
}

/// Month number for a Spanish or English month name (case-insensitive).
pub fn month_from_name(name: &str) -> Option<u32> {
    let month = match name.to_uppercase().as_str() {
        "ENERO" | "JANUARY" => 1,
        "FEBRERO" | "FEBRUARY" => 2,
        "MARZO" | "MARCH" => 3,
        "ABRIL" | "APRIL" => 4,
        "MAYO" | "MAY" => 5,
        "JUNIO" | "JUNE" => 6,
        "JULIO" | "JULY" => 7,
        "AGOSTO" | "AUGUST" => 8,
        "SEPTIEMBRE" | "SETIEMBRE" | "SEPTEMBER" => 9,
        "OCTUBRE" | "OCTOBER" => 10,
        "NOVIEMBRE" | "NOVEMBER" => 11,
        "DICIEMBRE" | "DECEMBER" => 12,
        _ => return None,
    };
    Some(month)
}
