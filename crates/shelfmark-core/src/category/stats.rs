//! Category Statistics
//!
//! Aggregates computed fresh on every call by walking the tree.

use std::collections::HashSet;

use serde::Serialize;

use crate::book::{AllBooks, BookId, BookLookup};
use crate::error::Result;

use super::node::CategoryId;
use super::tree::{CategoryTree, NodeRef};

/// The category with the most directly filed books
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularCategory {
    pub id: CategoryId,
    pub name: String,
    pub book_count: usize,
}

/// System-wide aggregates
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    pub total_categories: usize,
    pub categories_with_books: usize,
    pub categories_empty: usize,
    /// `categories_with_books / total_categories * 100`, or 0 for an empty tree
    pub utilization_percent: f64,
    pub most_popular_category: Option<PopularCategory>,
    /// Distinct book ids filed anywhere
    pub total_books_categorized: usize,
}

/// Aggregates for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub path: Vec<String>,
    pub direct_book_count: usize,
    pub total_book_count: usize,
    /// Immediate children only
    pub subcategory_count: usize,
    pub subcategory_names: Vec<String>,
}

/// Read-only statistics over a [`CategoryTree`].
///
/// Book ids the lookup reports as missing are left out of every count.
pub struct StatisticsCollector<'a> {
    tree: &'a CategoryTree,
    books: &'a dyn BookLookup,
}

impl<'a> StatisticsCollector<'a> {
    pub fn new(tree: &'a CategoryTree) -> Self {
        Self {
            tree,
            books: &AllBooks,
        }
    }

    /// Only count books that `books` still knows about.
    pub fn with_catalog(mut self, books: &'a dyn BookLookup) -> Self {
        self.books = books;
        self
    }

    fn live_books<'n>(&'n self, node: NodeRef<'n>) -> impl Iterator<Item = BookId> + 'n {
        node.book_ids().filter(move |b| self.books.contains(*b))
    }

    fn direct(&self, node: NodeRef<'_>) -> usize {
        self.live_books(node).count()
    }

    fn total(&self, node: NodeRef<'_>) -> usize {
        node.descendants().map(|n| self.direct(n)).sum()
    }

    pub fn system_stats(&self) -> SystemStats {
        let mut total_categories = 0;
        let mut categories_with_books = 0;
        let mut most_popular: Option<PopularCategory> = None;
        let mut distinct = HashSet::new();

        for node in self.tree.all_categories() {
            total_categories += 1;
            let direct = self.direct(node);
            if direct > 0 {
                categories_with_books += 1;
            }
            distinct.extend(self.live_books(node));

            // Strictly greater keeps the first node in DFS order on ties.
            let beats = most_popular
                .as_ref()
                .map_or(true, |best| direct > best.book_count);
            if beats {
                most_popular = Some(PopularCategory {
                    id: node.id(),
                    name: node.name().to_string(),
                    book_count: direct,
                });
            }
        }

        let utilization_percent = if total_categories == 0 {
            0.0
        } else {
            categories_with_books as f64 / total_categories as f64 * 100.0
        };

        SystemStats {
            total_categories,
            categories_with_books,
            categories_empty: total_categories - categories_with_books,
            utilization_percent,
            most_popular_category: most_popular,
            total_books_categorized: distinct.len(),
        }
    }

    pub fn category_stats(&self, id: CategoryId) -> Result<CategoryStats> {
        let node = self.tree.require(id)?;
        Ok(self.stats_for(node))
    }

    /// Per-category stats for every node, DFS pre-order
    pub fn all_category_stats(&self) -> Vec<CategoryStats> {
        self.tree
            .all_categories()
            .map(|node| self.stats_for(node))
            .collect()
    }

    fn stats_for(&self, node: NodeRef<'_>) -> CategoryStats {
        CategoryStats {
            id: node.id(),
            name: node.name().to_string(),
            description: node.description().to_string(),
            path: node.path().into_iter().map(str::to_string).collect(),
            direct_book_count: self.direct(node),
            total_book_count: self.total(node),
            subcategory_count: node.child_ids().len(),
            subcategory_names: node.children().map(|c| c.name().to_string()).collect(),
        }
    }
}
