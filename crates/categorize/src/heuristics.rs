//! Built-in operation tables consulted around the keyword table.
//!
//! Markers are matched as substrings of the upper-cased operation text.
//! Shortcut markers must also start a word.

/// `(marker, category, subcategory)`.
pub type OperationRule = (&'static str, &'static str, &'static str);

pub const FALLBACK_CATEGORY: &str = "OTHER";
pub const FALLBACK_SUBCATEGORY: &str = "VARIOUS";

/// Operations with no reliable merchant. Checked before the keyword table,
/// in this order: income credits usually also say TRANSFERENCIA.
pub const SHORTCUTS: &[OperationRule] = &[
    ("NOMINA", "INCOME", "PAYROLL"),
    ("DESEMPLEO", "INCOME", "UNEMPLOYMENT"),
    ("INEM", "INCOME", "UNEMPLOYMENT"),
    ("SUBSIDIO", "INCOME", "UNEMPLOYMENT"),
    ("PENSION", "INCOME", "PENSION"),
    ("BIZUM", "BIZUM", "BIZUM"),
    ("TRANSFERENCIA", "TRANSFERS", "TRANSFER"),
];

pub const CARD_PAYMENT_MARKERS: &[&str] = &["PAGO CON TARJETA", "CARGO POR COMPRA"];

/// Sub-keywords the bank embeds in generic card-payment descriptions.
pub const CARD_SECTORS: &[OperationRule] = &[
    ("RESTAURANTES", "FOOD", "RESTAURANT"),
    ("SUPERMERCADOS", "FOOD", "SUPERMARKET"),
    ("GASOLINERAS", "TRANSPORT", "FUEL"),
    ("MODA", "SHOPPING", "CLOTHING"),
    ("HOGAR", "SHOPPING", "HOME"),
    ("ESPECTACULOS", "LEISURE", "ENTERTAINMENT"),
    ("FARMACIA", "HEALTH", "PHARMACY"),
    ("COMPRAS", "SHOPPING", "VARIOUS"),
];

/// Non-card operation kinds.
pub const OPERATION_KINDS: &[OperationRule] = &[
    ("COMISION", "BANKING", "FEES"),
    ("RET EFECTIVO", "BANKING", "CASH_WITHDRAWAL"),
    ("RET.EFECTIVO", "BANKING", "CASH_WITHDRAWAL"),
    ("ADEUDO", "SERVICES", "DIRECT_DEBIT"),
];

pub fn shortcut(operation_upper: &str) -> Option<&'static OperationRule> {
    SHORTCUTS
        .iter()
        .find(|(marker, _, _)| starts_word(operation_upper, marker))
}

pub fn operation_heuristic(operation_upper: &str) -> Option<&'static OperationRule> {
    let is_card_payment = CARD_PAYMENT_MARKERS
        .iter()
        .any(|m| operation_upper.contains(m));
    if is_card_payment {
        return first_marker(CARD_SECTORS, operation_upper);
    }
    first_marker(OPERATION_KINDS, operation_upper)
}

fn first_marker(
    table: &'static [OperationRule],
    operation_upper: &str,
) -> Option<&'static OperationRule> {
    table
        .iter()
        .find(|(marker, _, _)| operation_upper.contains(marker))
}

/// `marker` occurs at the start of the text or right after a non-alphanumeric.
fn starts_word(text: &str, marker: &str) -> bool {
    text.match_indices(marker).any(|(i, _)| {
        text[..i]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric())
    })
}
