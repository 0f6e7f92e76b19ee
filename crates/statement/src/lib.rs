//! Statement text → categorized transaction records.
//!
//! Stages: [`normalize`] repairs extraction artifacts line by line,
//! [`boundary`] groups header and detail lines into blocks, [`extract`]
//! parses a block into draft fields, categorization runs through
//! [`extracto_categorize::Categorizer`], and [`assemble`] produces the final
//! records. [`pipeline`] drives the stages for one document or a batch.

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static ::regex::Regex {
            static R: ::std::sync::OnceLock<::regex::Regex> = ::std::sync::OnceLock::new();
            R.get_or_init(|| ::regex::Regex::new($pat).expect("invalid regex"))
        }
    };
}

pub mod assemble;
pub mod boundary;
pub mod dump;
pub mod extract;
pub mod hash;
pub mod identifier;
pub mod normalize;
pub mod period;
pub mod pipeline;
pub mod source;
pub mod types;

pub use assemble::RecordAssembler;
pub use boundary::{BoundaryDetector, StatementBlock};
pub use dump::{is_dump, split_dump, DumpEntry};
pub use extract::{DraftRecord, Extractor};
pub use hash::fingerprint;
pub use identifier::{separate_identifier, Separated};
pub use normalize::{Dictionary, Normalizer};
pub use period::resolve_period;
pub use pipeline::StatementPipeline;
pub use source::{InMemorySource, SourceError, TextSource};
pub use types::{
    BatchOutcome, BlockError, BlockFailure, DocumentError, DocumentFailure, OutcomeSummary,
    StatementOutcome,
};
