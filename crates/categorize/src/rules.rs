use serde::{Deserialize, Serialize};
use std::fmt;

use crate::heuristics::{self, FALLBACK_CATEGORY, FALLBACK_SUBCATEGORY};

/// One keyword → (category, subcategory) entry of the user's keyword table.
/// Field names also accept the Spanish spellings used by existing
/// configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    #[serde(alias = "palabra_clave")]
    pub keyword: String,
    #[serde(alias = "categoria")]
    pub category: String,
    #[serde(alias = "subcategoria")]
    pub subcategory: String,
}

impl CategoryRule {
    pub fn new(keyword: &str, category: &str, subcategory: &str) -> Self {
        CategoryRule {
            keyword: keyword.to_string(),
            category: category.to_string(),
            subcategory: subcategory.to_string(),
        }
    }
}

/// Which step of the precedence chain produced a categorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    Shortcut,
    MerchantKeyword,
    OperationKeyword,
    Heuristic,
    Fallback,
}

impl fmt::Display for MatchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchSource::Shortcut => write!(f, "shortcut"),
            MatchSource::MerchantKeyword => write!(f, "merchant_keyword"),
            MatchSource::OperationKeyword => write!(f, "operation_keyword"),
            MatchSource::Heuristic => write!(f, "heuristic"),
            MatchSource::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Categorization {
    pub category: String,
    pub subcategory: String,
    pub source: MatchSource,
}

impl Categorization {
    fn new(category: &str, subcategory: &str, source: MatchSource) -> Self {
        Categorization {
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            source,
        }
    }

    pub fn fallback() -> Self {
        Categorization::new(FALLBACK_CATEGORY, FALLBACK_SUBCATEGORY, MatchSource::Fallback)
    }
}

/// Internal pairing of a rule with its upper-cased keyword.
struct CompiledRule {
    rule: CategoryRule,
    needle: String,
}

/// Deterministic categorizer. Precedence, first hit wins:
/// operation shortcuts, keyword table against the merchant, keyword table
/// against the operation text, operation-type heuristics, fallback.
pub struct Categorizer {
    rules: Vec<CompiledRule>,
}

impl Categorizer {
    /// Rules keep the order they were supplied in. Blank keywords are
    /// dropped since they would match every input.
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        let total = rules.len();
        let rules: Vec<CompiledRule> = rules
            .into_iter()
            .filter(|rule| !rule.keyword.trim().is_empty())
            .map(|rule| CompiledRule {
                needle: rule.keyword.trim().to_uppercase(),
                rule,
            })
            .collect();
        if rules.len() < total {
            tracing::warn!(
                dropped = total - rules.len(),
                "Ignoring category rules with a blank keyword"
            );
        }
        Self { rules }
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> impl Iterator<Item = &CategoryRule> {
        self.rules.iter().map(|cr| &cr.rule)
    }

    /// First rule whose keyword occurs in `text`, case-insensitively.
    pub fn find_keyword_rule(&self, text: &str) -> Option<&CategoryRule> {
        if text.trim().is_empty() {
            return None;
        }
        let haystack = text.to_uppercase();
        self.rules
            .iter()
            .find(|cr| haystack.contains(&cr.needle))
            .map(|cr| &cr.rule)
    }

    pub fn categorize(&self, operation_text: &str, merchant_name: &str) -> Categorization {
        let operation = operation_text.to_uppercase();

        if let Some((_, category, subcategory)) = heuristics::shortcut(&operation) {
            return Categorization::new(category, subcategory, MatchSource::Shortcut);
        }

        if let Some(rule) = self.find_keyword_rule(merchant_name) {
            return from_rule(rule, MatchSource::MerchantKeyword);
        }

        if let Some(rule) = self.find_keyword_rule(&operation) {
            return from_rule(rule, MatchSource::OperationKeyword);
        }

        if let Some((_, category, subcategory)) = heuristics::operation_heuristic(&operation) {
            return Categorization::new(category, subcategory, MatchSource::Heuristic);
        }

        Categorization::fallback()
    }
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<CategoryRule> for Categorizer {
    fn from_iter<I: IntoIterator<Item = CategoryRule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A rule with a blank category or subcategory still wins the match, but
/// the blank side is filled from the fallback pair so results stay complete.
fn from_rule(rule: &CategoryRule, source: MatchSource) -> Categorization {
    let category = non_blank(&rule.category).unwrap_or(FALLBACK_CATEGORY);
    let subcategory = non_blank(&rule.subcategory).unwrap_or(FALLBACK_SUBCATEGORY);
    Categorization::new(category, subcategory, source)
}

fn non_blank(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}
