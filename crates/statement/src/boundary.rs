use regex::Captures;
use serde::{Deserialize, Serialize};

/// Detail lines a single block may collect.
pub const MAX_DETAIL_LINES: usize = 4;
/// Detail lines must be strictly longer than this.
const MIN_DETAIL_LEN: usize = 5;

re!(re_header,
    r"^(\d{2}/\d{2})\s+(\d{2}/\d{2})\s+(\S.*?)\s+(-?[\w.]*,\w{2})\s+(-?[\w.]*,\w{2})$");

// Matched against the upper-cased line with every whitespace removed.
re!(re_boilerplate,
    r"^(?:SALDO|ARCHIVO:|F\d{4,}|Q\d{6}|-+P[AÁ]GINA\d*|EUROS?$|-?\d{1,3}(?:\.\d{3})*,\d{2}$|-?\d+,\d{2}$)");

const BOILERPLATE_MARKERS: &[&str] = &[
    "TODOSLOSIMPORTESDEESTEEXTRACTO",
    "SALDOANTERIOR",
    "SALDOANUESTROFAVOR",
    "SALDOASUFAVOR",
];

/// One transaction header plus the detail lines that followed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementBlock {
    /// 1-based position of the header in the document.
    pub line_number: usize,
    pub header: String,
    pub details: Vec<String>,
}

impl StatementBlock {
    pub fn new(line_number: usize, header: impl Into<String>) -> Self {
        Self {
            line_number,
            header: header.into(),
            details: Vec::new(),
        }
    }

    /// Header and details joined with newlines, as reported on failure.
    pub fn text(&self) -> String {
        std::iter::once(self.header.as_str())
            .chain(self.details.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub(crate) fn header_captures(line: &str) -> Option<Captures<'_>> {
    re_header().captures(line.trim())
}

pub fn is_header(line: &str) -> bool {
    re_header().is_match(line.trim())
}

/// Page furniture, running-balance summaries and stray amount lines.
pub fn is_boilerplate(line: &str) -> bool {
    let squashed: String = line
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    if squashed.is_empty() {
        return false;
    }
    BOILERPLATE_MARKERS.iter().any(|m| squashed.contains(m)) || re_boilerplate().is_match(&squashed)
}

fn is_detail(line: &str) -> bool {
    !line.is_empty()
        && line.chars().count() > MIN_DETAIL_LEN
        && !is_header(line)
        && !is_boilerplate(line)
}

enum State {
    Scanning,
    Collecting(StatementBlock),
}

pub struct BoundaryDetector;

impl BoundaryDetector {
    /// Group normalized lines into blocks. Every block starts at a header;
    /// lines before the first header and lines between a finished block and
    /// the next header are dropped.
    pub fn detect<S: AsRef<str>>(lines: &[S]) -> Vec<StatementBlock> {
        let mut blocks = Vec::new();
        let mut state = State::Scanning;
        let mut idx = 0;

        while idx < lines.len() {
            let line = lines[idx].as_ref().trim();
            state = match state {
                State::Scanning => {
                    idx += 1;
                    if !is_boilerplate(line) && is_header(line) {
                        State::Collecting(StatementBlock::new(idx, line))
                    } else {
                        State::Scanning
                    }
                }
                State::Collecting(mut block) => {
                    if block.details.len() < MAX_DETAIL_LINES && is_detail(line) {
                        block.details.push(line.to_string());
                        idx += 1;
                        State::Collecting(block)
                    } else {
                        // The current line is looked at again while scanning.
                        tracing::trace!(line = block.line_number, details = block.details.len(), "block closed");
                        blocks.push(block);
                        State::Scanning
                    }
                }
            };
        }

        if let State::Collecting(block) = state {
            blocks.push(block);
        }
        blocks
    }
}
