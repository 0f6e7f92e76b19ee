//! Splitting a payee string into a leading identifier and a merchant name.

use regex::Regex;

// Digit runs must end at a non-digit so a longer run is never cut short.
re!(re_card_number, r"^(\d{16,20})(\D.*|)$");
re!(re_letter_reference, r"^([A-Za-z]\d{13,20})(\D.*|)$");
re!(re_gateway_code, r"(?i)^(MONEYNET\*\d+|AMZN[A-Z]*\*[A-Z0-9]+|PAYPAL\*[A-Z0-9]+)(.*)$");
re!(re_reference_number, r"^(\d{9,15})(\D.*|)$");
re!(re_known_merchant, &known_merchant_pattern());

/// A named identifier shape. Group 1 is the identifier, group 2 the rest.
pub struct IdentifierMatcher {
    pub name: &'static str,
    regex: fn() -> &'static Regex,
}

/// Tried in order; the first that matches wins.
pub const MATCHERS: &[IdentifierMatcher] = &[
    IdentifierMatcher { name: "card_number", regex: re_card_number },
    IdentifierMatcher { name: "letter_reference", regex: re_letter_reference },
    IdentifierMatcher { name: "gateway_code", regex: re_gateway_code },
    IdentifierMatcher { name: "reference_number", regex: re_reference_number },
];

/// Merchants recognised anywhere in the detail text, even when glued to an
/// identifier or to other words.
pub const KNOWN_MERCHANTS: &[&str] = &[
    "SPOTIFY",
    "APPLE",
    "CONSUM",
    "LEROY MERLIN",
    "GLOVO",
    "AMAZON",
    "MERCADONA",
    "CARREFOUR",
    "ZARA",
    "BERSHKA",
    "STARBUCKS",
    "TICKETMASTER",
    "MYPROTEIN",
    "PLENOIL",
    "BALLENOIL",
    "LIDL",
    "NETFLIX",
    "REPSOL",
];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Separated {
    pub identifier: String,
    pub merchant_name: String,
    /// Name of the matcher that produced the identifier, if any.
    pub matcher: Option<&'static str>,
}

impl IdentifierMatcher {
    fn split(&self, payee: &str) -> Option<Separated> {
        let caps = (self.regex)().captures(payee)?;
        Some(Separated {
            identifier: caps[1].to_string(),
            merchant_name: clean_remainder(&caps[2]),
            matcher: Some(self.name),
        })
    }
}

fn clean_remainder(rest: &str) -> String {
    rest.trim_start_matches(|c: char| c.is_whitespace() || c == '-')
        .trim_end()
        .to_string()
}

/// Without a matching shape the whole string is the merchant name.
pub fn separate_identifier(payee: &str) -> Separated {
    let payee = payee.trim();
    MATCHERS
        .iter()
        .find_map(|m| m.split(payee))
        .unwrap_or_else(|| Separated {
            identifier: String::new(),
            merchant_name: payee.to_string(),
            matcher: None,
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantSplit {
    /// Text before the merchant name, trimmed of spaces and dashes.
    pub before: String,
    /// From the merchant name to the end of the text.
    pub merchant: String,
}

fn known_merchant_pattern() -> String {
    let names: Vec<String> = KNOWN_MERCHANTS.iter().map(|m| regex::escape(m)).collect();
    format!("(?i){}", names.join("|"))
}

/// Earliest occurrence of any known merchant; ties go to list order. Both
/// parts keep the case of `text`.
pub fn find_known_merchant(text: &str) -> Option<MerchantSplit> {
    let pos = re_known_merchant().find(text)?.start();

    Some(MerchantSplit {
        before: text[..pos]
            .trim_matches(|c: char| c.is_whitespace() || c == '-')
            .to_string(),
        merchant: text[pos..].trim_end().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_number_then_merchant() {
        let s = separate_identifier("1234567890123456MERCADONA ELCHE");
        assert_eq!(s.identifier, "1234567890123456");
        assert_eq!(s.merchant_name, "MERCADONA ELCHE");
        assert_eq!(s.matcher, Some("card_number"));
    }

    #[test]
    fn letter_reference() {
        let s = separate_identifier("N2025123456789012 - RECIBO LUZ");
        assert_eq!(s.identifier, "N2025123456789012");
        assert_eq!(s.merchant_name, "RECIBO LUZ");
        assert_eq!(s.matcher, Some("letter_reference"));
    }

    #[test]
    fn gateway_codes() {
        let s = separate_identifier("MONEYNET*12345 TIENDA");
        assert_eq!(s.identifier, "MONEYNET*12345");
        assert_eq!(s.merchant_name, "TIENDA");

        let s = separate_identifier("AMZNMKTPES*0Y44I4EL5 AMAZON.ES");
        assert_eq!(s.identifier, "AMZNMKTPES*0Y44I4EL5");
        assert_eq!(s.merchant_name, "AMAZON.ES");
        assert_eq!(s.matcher, Some("gateway_code"));

        let s = separate_identifier("PAYPAL*STEAMGAMES - STEAM");
        assert_eq!(s.identifier, "PAYPAL*STEAMGAMES");
        assert_eq!(s.merchant_name, "STEAM");
    }

    #[test]
    fn reference_number() {
        let s = separate_identifier("123456789012 GIMNASIO");
        assert_eq!(s.identifier, "123456789012");
        assert_eq!(s.merchant_name, "GIMNASIO");
        assert_eq!(s.matcher, Some("reference_number"));
    }

    #[test]
    fn twenty_digit_card_number_is_not_cut() {
        let s = separate_identifier("12345678901234567890 BAR PEPE");
        assert_eq!(s.identifier, "12345678901234567890");
        assert_eq!(s.merchant_name, "BAR PEPE");
        assert_eq!(s.matcher, Some("card_number"));
    }

    #[test]
    fn overlong_digit_runs_match_nothing() {
        let s = separate_identifier("123456789012345678901 BAR PEPE");
        assert_eq!(s.identifier, "");
        assert_eq!(s.merchant_name, "123456789012345678901 BAR PEPE");
        assert_eq!(s.matcher, None);
    }

    #[test]
    fn letter_reference_keeps_every_digit() {
        let s = separate_identifier("N123456789012345678901RECIBO");
        assert_eq!(s.matcher, None);

        let s = separate_identifier("N12345678901234567890RECIBO");
        assert_eq!(s.identifier, "N12345678901234567890");
        assert_eq!(s.merchant_name, "RECIBO");
    }

    #[test]
    fn bare_identifier_has_empty_merchant() {
        let s = separate_identifier("1234567890123456");
        assert_eq!(s.identifier, "1234567890123456");
        assert_eq!(s.merchant_name, "");
    }

    #[test]
    fn card_number_beats_reference_number() {
        let s = separate_identifier("4000123412341234 BAR");
        assert_eq!(s.matcher, Some("card_number"));
    }

    #[test]
    fn short_leading_digits_stay_in_merchant() {
        let s = separate_identifier("24 HORAS FITNESS");
        assert_eq!(s.identifier, "");
        assert_eq!(s.merchant_name, "24 HORAS FITNESS");
        assert_eq!(s.matcher, None);
    }

    #[test]
    fn empty_payee() {
        assert_eq!(separate_identifier("   "), Separated::default());
    }

    #[test]
    fn known_merchant_inside_glued_text() {
        let m = find_known_merchant("1234567890123456SPOTIFYP3A1B2C").unwrap();
        assert_eq!(m.before, "1234567890123456");
        assert_eq!(m.merchant, "SPOTIFYP3A1B2C");
    }

    #[test]
    fn earliest_known_merchant_wins() {
        // AMAZON is listed before MERCADONA but appears later.
        let m = find_known_merchant("MERCADONA PEDIDO AMAZON").unwrap();
        assert_eq!(m.before, "");
        assert_eq!(m.merchant, "MERCADONA PEDIDO AMAZON");
    }

    #[test]
    fn known_merchant_is_case_insensitive() {
        let m = find_known_merchant("compra - Lidl Alicante").unwrap();
        assert_eq!(m.before, "compra");
        assert_eq!(m.merchant, "Lidl Alicante");

        let m = find_known_merchant("1234567890123456Leroy Merlin Elche").unwrap();
        assert_eq!(m.before, "1234567890123456");
        assert_eq!(m.merchant, "Leroy Merlin Elche");
    }

    #[test]
    fn no_known_merchant() {
        assert!(find_known_merchant("GIMNASIO MUNICIPAL").is_none());
    }
}
