pub mod heuristics;
pub mod rules;

pub use heuristics::{FALLBACK_CATEGORY, FALLBACK_SUBCATEGORY};
pub use rules::{Categorization, CategoryRule, Categorizer, MatchSource};
