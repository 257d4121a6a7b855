//! Category Classifier
//!
//! Ranks categories for a book by keyword overlap with its title, author and
//! genre. Scoring is a pure function of the tree and the input text.

use super::store::{tokenize, KeywordStore};
use super::tree::{CategoryTree, NodeRef};

/// A ranked category recommendation
#[derive(Debug, Clone)]
pub struct Suggestion<'a> {
    pub category: NodeRef<'a>,
    /// Number of distinct keywords found in the input
    pub score: usize,
}

/// Keyword-based classification engine
#[derive(Debug, Clone)]
pub struct ClassificationEngine {
    keywords: KeywordStore,
    top_k: Option<usize>,
}

impl ClassificationEngine {
    /// Engine over an explicit keyword table, returning every non-zero match
    pub fn new(keywords: KeywordStore) -> Self {
        Self {
            keywords,
            top_k: None,
        }
    }

    /// Engine over the builtin keyword table
    pub fn builtin() -> Self {
        Self::new(KeywordStore::builtin())
    }

    /// Cap the number of suggestions. `0` means no cap.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = (top_k > 0).then_some(top_k);
        self
    }

    pub fn top_k(&self) -> Option<usize> {
        self.top_k
    }

    pub fn keywords(&self) -> &KeywordStore {
        &self.keywords
    }

    /// Rank categories of `tree` for a book.
    ///
    /// Highest score first; ties keep DFS pre-order. Categories scoring zero
    /// are dropped, so an empty result means "no suggestion".
    pub fn suggest<'a>(
        &self,
        tree: &'a CategoryTree,
        title: &str,
        author: &str,
        genre: &str,
    ) -> Vec<Suggestion<'a>> {
        let tokens = tokenize(&format!("{} {} {}", title, author, genre));
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut ranked: Vec<Suggestion<'a>> = tree
            .all_categories()
            .filter_map(|category| {
                let score = self.score(&tokens, category.name());
                (score > 0).then_some(Suggestion { category, score })
            })
            .collect();

        // Stable sort keeps DFS order among equal scores.
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        if let Some(k) = self.top_k {
            ranked.truncate(k);
        }
        ranked
    }

    fn score(&self, tokens: &[String], category: &str) -> usize {
        self.keywords
            .keywords_for(category)
            .map(|set| set.iter().filter(|kw| contains_phrase(tokens, kw)).count())
            .unwrap_or(0)
    }
}

impl Default for ClassificationEngine {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Whether the space-separated `phrase` occurs as a contiguous token run
fn contains_phrase(tokens: &[String], phrase: &str) -> bool {
    let words: Vec<&str> = phrase.split(' ').collect();
    if words.is_empty() || words.len() > tokens.len() {
        return false;
    }
    tokens
        .windows(words.len())
        .any(|window| window.iter().zip(&words).all(|(t, w)| t.as_str() == *w))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: Vec<(&str, Vec<&str>)>) -> KeywordStore {
        entries
            .into_iter()
            .map(|(name, kws)| {
                (
                    name.to_string(),
                    kws.into_iter().map(str::to_string).collect::<Vec<_>>(),
                )
            })
            .collect()
    }

    fn tree() -> CategoryTree {
        let mut tree = CategoryTree::new();
        let fiction = tree.add_category("Fiction", "", None).unwrap();
        tree.add_category("Sci-Fi", "", Some(fiction)).unwrap();
        tree.add_category("Fantasy", "", Some(fiction)).unwrap();
        tree.add_category("History", "", None).unwrap();
        tree
    }

    #[test]
    fn test_suggest_dune() {
        let tree = tree();
        let engine = ClassificationEngine::new(table(vec![("Sci-Fi", vec!["dune", "space"])]));
        let result = engine.suggest(&tree, "Dune", "Frank Herbert", "");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].category.name(), "Sci-Fi");
        assert!(result[0].score >= 1);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let tree = tree();
        let engine = ClassificationEngine::new(table(vec![("Sci-Fi", vec!["dune"])]));
        assert!(engine.suggest(&tree, "Cooking at Home", "", "").is_empty());
        assert!(engine.suggest(&tree, "", "", "").is_empty());
    }

    #[test]
    fn test_ranking_and_ties_follow_preorder() {
        let tree = tree();
        let engine = ClassificationEngine::new(table(vec![
            ("Fiction", vec!["novel"]),
            ("Sci-Fi", vec!["novel", "robot"]),
            ("Fantasy", vec!["novel"]),
            ("History", vec!["novel"]),
        ]));
        let result = engine.suggest(&tree, "A Robot Novel", "", "");
        let names: Vec<&str> = result.iter().map(|s| s.category.name()).collect();
        assert_eq!(names, vec!["Sci-Fi", "Fiction", "Fantasy", "History"]);
        assert_eq!(result[0].score, 2);
    }

    #[test]
    fn test_top_k_caps_results() {
        let tree = tree();
        let engine = ClassificationEngine::new(table(vec![
            ("Fiction", vec!["novel"]),
            ("History", vec!["novel"]),
        ]))
        .with_top_k(1);
        let result = engine.suggest(&tree, "novel", "", "");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].category.name(), "Fiction");
        assert_eq!(ClassificationEngine::builtin().with_top_k(0).top_k(), None);
    }

    #[test]
    fn test_matching_is_case_and_punctuation_insensitive() {
        let tree = tree();
        let engine = ClassificationEngine::new(table(vec![("Sci-Fi", vec!["Science Fiction"])]));
        let result = engine.suggest(&tree, "", "", "SCIENCE-fiction");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].score, 1);
    }

    #[test]
    fn test_repeated_keyword_counts_once() {
        let tree = tree();
        let engine = ClassificationEngine::new(table(vec![("History", vec!["war"])]));
        let result = engine.suggest(&tree, "War and War", "", "war");
        assert_eq!(result[0].score, 1);
    }

    #[test]
    fn test_builtin_table_against_default_tree() {
        let tree = CategoryTree::with_defaults();
        let engine = ClassificationEngine::builtin();
        let result = engine.suggest(&tree, "Dune", "Frank Herbert", "Science Fiction");
        assert_eq!(result[0].category.name(), "Sci-Fi");
    }

    #[test]
    fn test_suggest_does_not_mutate_tree() {
        let tree = tree();
        let before = tree.render(true);
        let engine = ClassificationEngine::builtin();
        let _ = engine.suggest(&tree, "Dune", "", "");
        assert_eq!(tree.render(true), before);
    }

    #[test]
    fn test_contains_phrase() {
        let tokens = tokenize("the science of fiction");
        assert!(contains_phrase(&tokens, "science"));
        assert!(!contains_phrase(&tokens, "science fiction"));
        assert!(contains_phrase(&tokens, "of fiction"));
    }
}
