//! Loading the keyword table and the segmentation dictionary from disk.
//!
//! Both inputs are optional. A missing path yields an empty table or an
//! unloaded dictionary, never an error; a file that exists but cannot be
//! parsed is an error.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use extracto_categorize::CategoryRule;
use extracto_statement::Dictionary;
use serde::Deserialize;

/// Accepted shapes: `{"mapeo_categorias": [...]}`, `{"rules": [...]}`,
/// a bare JSON array, or TOML `[[rules]]` tables.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RulesDocument {
    Table {
        #[serde(alias = "mapeo_categorias")]
        rules: Vec<CategoryRule>,
    },
    List(Vec<CategoryRule>),
}

impl RulesDocument {
    fn into_rules(self) -> Vec<CategoryRule> {
        match self {
            RulesDocument::Table { rules } | RulesDocument::List(rules) => rules,
        }
    }
}

pub fn load_rules(path: Option<&Path>) -> Result<Vec<CategoryRule>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    if !path.exists() {
        tracing::warn!(path = %path.display(), "rules file not found, using empty table");
        return Ok(Vec::new());
    }

    let text = fs::read_to_string(path)
        .with_context(|| format!("read rules file {}", path.display()))?;
    let rules = parse_rules(&text, is_toml(path))
        .with_context(|| format!("parse rules file {}", path.display()))?;
    tracing::info!(path = %path.display(), count = rules.len(), "loaded category rules");
    Ok(rules)
}

pub fn parse_rules(text: &str, toml_format: bool) -> Result<Vec<CategoryRule>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let document: RulesDocument = if toml_format {
        toml::from_str(text)?
    } else {
        serde_json::from_str(text)?
    };
    Ok(document.into_rules())
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"))
}

/// `path` may be a single word list or a directory of `*.txt` word lists,
/// one word per line. Unreadable lists are skipped with a warning.
pub fn load_dictionary(path: Option<&Path>) -> Result<Dictionary> {
    let Some(path) = path else {
        return Ok(Dictionary::not_loaded());
    };
    if !path.exists() {
        tracing::warn!(path = %path.display(), "dictionary not found, segmentation disabled");
        return Ok(Dictionary::not_loaded());
    }

    let files = if path.is_dir() {
        word_lists_in(path)?
    } else {
        vec![path.to_path_buf()]
    };

    let mut words = Vec::new();
    for file in &files {
        match fs::read(file) {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes);
                words.extend(text.lines().map(str::to_string));
            }
            Err(e) => tracing::warn!(path = %file.display(), error = %e, "skipping word list"),
        }
    }

    let dictionary = Dictionary::from_words(words);
    tracing::info!(files = files.len(), words = dictionary.len(), "loaded dictionary");
    Ok(dictionary)
}

fn word_lists_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("read dictionary directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("txt"))
        })
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn spanish_json_table() {
        let rules = parse_rules(
            r#"{"mapeo_categorias": [
                {"palabra_clave": "MERCADONA", "categoria": "Alimentacion", "subcategoria": "Supermercado"}
            ]}"#,
            false,
        )
        .unwrap();
        assert_eq!(rules, vec![CategoryRule::new("MERCADONA", "Alimentacion", "Supermercado")]);
    }

    #[test]
    fn bare_json_array() {
        let rules = parse_rules(
            r#"[{"keyword": "LIDL", "category": "FOOD", "subcategory": "SUPERMARKET"}]"#,
            false,
        )
        .unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].keyword, "LIDL");
    }

    #[test]
    fn toml_rules() {
        let rules = parse_rules(
            r#"
[[rules]]
keyword = "NETFLIX"
category = "LEISURE"
subcategory = "STREAMING"

[[rules]]
keyword = "REPSOL"
category = "TRANSPORT"
subcategory = "FUEL"
"#,
            true,
        )
        .unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[1], CategoryRule::new("REPSOL", "TRANSPORT", "FUEL"));
    }

    #[test]
    fn empty_text_is_empty_table() {
        assert!(parse_rules("  \n", false).unwrap().is_empty());
    }

    #[test]
    fn malformed_rules_are_an_error() {
        assert!(parse_rules("{not json", false).is_err());
    }

    #[test]
    fn missing_rules_file_is_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let rules = load_rules(Some(&dir.path().join("absent.json"))).unwrap();
        assert!(rules.is_empty());
        assert!(load_rules(None).unwrap().is_empty());
    }

    #[test]
    fn rules_file_format_follows_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reglas.toml");
        fs::write(
            &path,
            "[[rules]]\nkeyword = \"GLOVO\"\ncategory = \"FOOD\"\nsubcategory = \"DELIVERY\"\n",
        )
        .unwrap();
        let rules = load_rules(Some(&path)).unwrap();
        assert_eq!(rules, vec![CategoryRule::new("GLOVO", "FOOD", "DELIVERY")]);
    }

    #[test]
    fn dictionary_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = fs::File::create(dir.path().join("a.txt")).unwrap();
        writeln!(a, "casa\nperro\nx").unwrap();
        fs::write(dir.path().join("b.txt"), "Mundo\n").unwrap();
        fs::write(dir.path().join("notas.md"), "ignorada\n").unwrap();

        let dictionary = load_dictionary(Some(dir.path())).unwrap();
        assert!(dictionary.is_loaded());
        assert_eq!(dictionary.len(), 3);
        assert!(dictionary.contains("PERRO"));
        assert!(dictionary.contains("MUNDO"));
        assert!(!dictionary.contains("IGNORADA"));
    }

    #[test]
    fn dictionary_from_single_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "hola\n").unwrap();
        let dictionary = load_dictionary(Some(file.path())).unwrap();
        assert!(dictionary.contains("HOLA"));
    }

    #[test]
    fn missing_dictionary_is_not_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let dictionary = load_dictionary(Some(&dir.path().join("nada"))).unwrap();
        assert!(!dictionary.is_loaded());
        assert!(!load_dictionary(None).unwrap().is_loaded());
    }
}
