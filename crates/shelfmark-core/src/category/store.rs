//! Keyword Store
//!
//! Keyword sets per category name used by the classifier.
//! Built from the builtin seeds and merged with `config.toml` overrides.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::builtin::walk_builtin;

/// Split text into lowercase alphanumeric tokens.
///
/// Whitespace and punctuation separate tokens, so `"Sci-Fi!"` becomes
/// `["sci", "fi"]`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Canonical form of a keyword: its tokens joined by single spaces
fn normalize_keyword(keyword: &str) -> Option<String> {
    let tokens = tokenize(keyword);
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" "))
    }
}

fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Keyword sets keyed by category name (case-insensitive)
#[derive(Debug, Clone, Default)]
pub struct KeywordStore {
    sets: HashMap<String, BTreeSet<String>>,
}

impl KeywordStore {
    /// Store with no keywords at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Store seeded from the builtin categories
    pub fn builtin() -> Self {
        let mut store = Self::empty();
        walk_builtin(|cat| store.extend(cat.name, cat.keywords.iter().copied()));
        store
    }

    /// Apply configuration overrides.
    ///
    /// - `replace = true` swaps the whole set for the configured one
    /// - otherwise configured keywords are added to the existing set
    pub fn with_config(mut self, config: &KeywordsConfig) -> Self {
        for (name, entry) in &config.categories {
            if entry.replace {
                self.sets.remove(&normalize_key(name));
            }
            self.extend(name, entry.keywords.iter().map(String::as_str));
        }
        self
    }

    /// Add keywords to a category's set, creating it if needed.
    pub fn extend<'k>(&mut self, category: &str, keywords: impl IntoIterator<Item = &'k str>) {
        let set = self.sets.entry(normalize_key(category)).or_default();
        set.extend(keywords.into_iter().filter_map(normalize_keyword));
    }

    pub fn keywords_for(&self, category: &str) -> Option<&BTreeSet<String>> {
        self.sets.get(&normalize_key(category))
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Category names with keyword sets, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl FromIterator<(String, Vec<String>)> for KeywordStore {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        let mut store = Self::empty();
        for (name, keywords) in iter {
            store.extend(&name, keywords.iter().map(String::as_str));
        }
        store
    }
}

/// `[classifier.keywords]` section of `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordsConfig {
    #[serde(flatten)]
    pub categories: HashMap<String, KeywordConfigEntry>,
}

/// Keyword override for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordConfigEntry {
    pub keywords: Vec<String>,
    /// Replace the builtin set instead of extending it
    #[serde(default)]
    pub replace: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_normalizes_case_and_punctuation() {
        assert_eq!(tokenize("Dune, by Frank HERBERT!"), vec!["dune", "by", "frank", "herbert"]);
        assert_eq!(tokenize("Sci-Fi"), vec!["sci", "fi"]);
        assert!(tokenize("  ... ").is_empty());
    }

    #[test]
    fn test_builtin_store_lookup_is_case_insensitive() {
        let store = KeywordStore::builtin();
        let scifi = store.keywords_for("sci-fi").unwrap();
        assert!(scifi.contains("dune"));
        assert!(scifi.contains("science fiction"));
        // "sci-fi" keyword is stored in token form
        assert!(scifi.contains("sci fi"));
        assert!(store.keywords_for("Unknown").is_none());
    }

    #[test]
    fn test_config_extends_or_replaces() {
        let config = KeywordsConfig {
            categories: [
                (
                    "Sci-Fi".to_string(),
                    KeywordConfigEntry {
                        keywords: vec!["Cyberpunk".to_string()],
                        replace: false,
                    },
                ),
                (
                    "Horror".to_string(),
                    KeywordConfigEntry {
                        keywords: vec!["zombie".to_string()],
                        replace: true,
                    },
                ),
            ]
            .into_iter()
            .collect(),
        };

        let store = KeywordStore::builtin().with_config(&config);
        let scifi = store.keywords_for("Sci-Fi").unwrap();
        assert!(scifi.contains("cyberpunk"));
        assert!(scifi.contains("dune"));

        let horror = store.keywords_for("horror").unwrap();
        assert_eq!(horror.iter().collect::<Vec<_>>(), vec!["zombie"]);
    }

    #[test]
    fn test_from_iter_skips_blank_keywords() {
        let keywords = vec!["verse".to_string(), "  ".to_string()];
        let store: KeywordStore = [("Poetry".to_string(), keywords)].into_iter().collect();
        assert_eq!(store.keywords_for("poetry").unwrap().len(), 1);
        assert_eq!(store.names(), vec!["poetry"]);
    }
}
