use extracto_core::{month_from_name, StatementPeriod};

// Matched against the upper-cased text with all whitespace removed, so
// "EXTRACTO DE SEPTIEMBRE 2025" and "ExtractodeSeptiembre2025" agree.
re!(re_period, r"(?:EXTRACTODE(?:LMESDE)?|STATEMENTOF)([A-Z]+?)(\d{4})");

/// Find the statement's month and year in its text. The first marker whose
/// month name is recognised wins; no guess is made when none is.
pub fn resolve_period(text: &str) -> StatementPeriod {
    let squashed: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    for caps in re_period().captures_iter(&squashed) {
        let Some(month) = month_from_name(&caps[1]) else {
            continue;
        };
        let Ok(year) = caps[2].parse::<i32>() else {
            continue;
        };
        if let Some(period) = StatementPeriod::known(year, month) {
            return period;
        }
    }

    tracing::warn!("statement period not found");
    StatementPeriod::Unknown
}
