use std::collections::HashSet;

/// Fixed `(pattern → replacement)` repairs, applied in order, each to every
/// occurrence in the line. OCR misreads come first so the merged-word
/// expansions below them see the corrected spelling. No pattern contains a
/// space and no replacement re-creates a pattern, which keeps the pass stable.
pub const SUBSTITUTIONS: &[(&str, &str)] = &[
    // OCR misreads
    ("8TZUN", "BIZUM"),
    ("BTZUN", "BIZUM"),
    ("B1ZUM", "BIZUM"),
    ("RECISI00", "RECIBIDO"),
    ("ENVIA00", "ENVIADO"),
    ("NORINA", "NOMINA"),
    ("AGNOO", "ABONO"),
    ("AGENDO", "ADEUDO"),
    ("CONSUN", "CONSUM"),
    ("AQISTANCIA", "A DISTANCIA "),
    ("SINCENCEPTO", "SIN CONCEPTO"),
    ("PORTARUSFERENCIA", "POR TRANSFERENCIA "),
    ("PAGOCONTARJETAGN", "PAGO CON TARJETA EN "),
    // Merged words
    ("ORDENESPAGOEMITIDASENMONEDALOCAL", "ORDENES PAGO EMITIDAS EN MONEDA LOCAL "),
    ("COMPRAENCOMERCIOEXTRANJERO", "COMPRA EN COMERCIO EXTRANJERO "),
    ("COMISIONESPORSERVICIOS", "COMISIONES POR SERVICIOS "),
    ("CALZADOYCOMPLEMENTOS", "CALZADO Y COMPLEMENTOS "),
    ("COMISION3%INCLUIDA", "COMISION 3% INCLUIDA "),
    ("ABONODENOMINAPOR", "ABONO DE NOMINA POR "),
    ("ABONOBONIFICACION", "ABONO BONIFICACION "),
    ("PAGODEDESEMPLEO", "PAGO DE DESEMPLEO "),
    ("MUSEOSYDEPORTES", "MUSEOS Y DEPORTES "),
    ("FARMACIAYSANIDAD", "FARMACIA Y SANIDAD "),
    ("MUEBLESDECORACION", "MUEBLES DECORACION "),
    ("ENSUPERMERCADOS", "EN SUPERMERCADOS "),
    ("ENRESTAURANTES", "EN RESTAURANTES "),
    ("ENESPECTACULOS", "EN ESPECTACULOS "),
    ("ENGASOLINERAS", "EN GASOLINERAS "),
    ("ADEUDOASUCARGO", "ADEUDO A SU CARGO "),
    ("YSUSCRIPCIONES", "Y SUSCRIPCIONES "),
    ("PAGOCONTARJETA", "PAGO CON TARJETA "),
    ("CARGOPORCOMPRA", "CARGO POR COMPRA "),
    ("ADEBITOCONTARJ", "A DEBITO CON TARJ "),
    ("ENDROGUERIAS", "EN DROGUERIAS "),
    ("YPERFUMERIAS", "Y PERFUMERIAS "),
    ("ABONODELINEM", "ABONO DEL INEM "),
    ("ENSECTORDEL", "EN SECTOR DEL "),
    ("ENCAJEROAUT", "EN CAJERO AUT "),
    ("ENCOMERCIOS", "EN COMERCIOS "),
    ("YCAFETERIAS", "Y CAFETERIAS "),
    ("DESERVICIOS", "DE SERVICIOS "),
    ("LIBROSFOTOS", "LIBROS FOTOS "),
    ("RETEFECTIVO", "RET EFECTIVO "),
    ("ENMEDICINA", "EN MEDICINA "),
    ("CONTARJETA", "CON TARJETA "),
    ("ADISTANCIA", "A DISTANCIA "),
    ("ENDEPORTES", "EN DEPORTES "),
    ("PACKVIAJES", "PACK VIAJES "),
    ("DECOMPRAS", "DE COMPRAS "),
    ("YJUGUETES", "Y JUGUETES "),
    ("ENDISCOS", "EN DISCOS "),
    ("ENHOGAR", "EN HOGAR "),
    ("YELECTR", "Y ELECTR"),
    ("ENMODA", "EN MODA "),
    ("YPC", "Y PC "),
];

pub const MIN_WORD_LEN: usize = 3;
pub const MAX_WORD_LEN: usize = 10;
/// Lines shorter than this are never segmented.
const MIN_SEGMENT_LINE_LEN: usize = 4;

/// Known words for the segmentation fallback, stored upper-cased.
///
/// A dictionary that was never loaded and one that loaded zero words behave
/// the same: segmentation is skipped.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: HashSet<String>,
    loaded: bool,
}

impl Dictionary {
    pub fn not_loaded() -> Self {
        Self::default()
    }

    /// Single-character entries are ignored.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_uppercase())
            .filter(|w| w.chars().count() > 1)
            .collect();
        Self { words, loaded: true }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_usable(&self) -> bool {
        self.loaded && !self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}

/// Repairs text-extraction artifacts in single lines. Idempotent.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    dictionary: Dictionary,
}

impl Normalizer {
    pub fn new(dictionary: Dictionary) -> Self {
        Self { dictionary }
    }

    pub fn without_dictionary() -> Self {
        Self::default()
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Output is upper case; the table and the dictionary both match on
    /// upper-case text.
    pub fn normalize(&self, line: &str) -> String {
        let fixed = apply_substitutions(&line.to_uppercase());
        if fixed.contains(' ') || fixed.chars().count() < MIN_SEGMENT_LINE_LEN {
            return fixed;
        }
        if !self.dictionary.is_usable() {
            return fixed;
        }
        self.segment(&fixed).unwrap_or(fixed)
    }

    /// Greedy longest-match split against the dictionary. `None` when the
    /// very first position matches nothing, so the line stays as it was.
    fn segment(&self, token: &str) -> Option<String> {
        let chars: Vec<char> = token.chars().collect();
        let n = chars.len();
        let mut words: Vec<String> = Vec::new();
        let mut i = 0;

        while i < n {
            let longest = MAX_WORD_LEN.min(n - i);
            let hit = (MIN_WORD_LEN..=longest).rev().find_map(|len| {
                let candidate: String = chars[i..i + len].iter().collect();
                self.dictionary.contains(&candidate).then_some((candidate, len))
            });

            match hit {
                Some((word, len)) => {
                    words.push(word);
                    i += len;
                }
                None if words.is_empty() => return None,
                None => {
                    words.push(chars[i..].iter().collect());
                    break;
                }
            }
        }

        Some(words.join(" "))
    }
}

/// Runs the fixed table, then collapses whitespace runs and trims.
pub fn apply_substitutions(line: &str) -> String {
    let replaced = SUBSTITUTIONS
        .iter()
        .fold(line.to_string(), |acc, (pattern, replacement)| {
            if acc.contains(pattern) {
                acc.replace(pattern, replacement)
            } else {
                acc
            }
        });
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}
