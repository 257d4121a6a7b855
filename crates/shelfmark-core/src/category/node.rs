//! Category Node
//!
//! A single entry in the category arena. Parent and children are stored as ids;
//! the owning [`CategoryTree`](super::CategoryTree) keeps the two links in sync.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::book::BookId;
use crate::error::{Result, ShelfmarkError};

/// Process-assigned category identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(u64);

impl CategoryId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for CategoryId {
    type Err = std::num::ParseIntError;

    /// Accepts `12` or `#12`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .strip_prefix('#')
            .unwrap_or(trimmed)
            .parse::<u64>()
            .map(Self)
    }
}

/// Category node stored in the tree arena
#[derive(Debug, Clone)]
pub struct CategoryNode {
    id: CategoryId,
    name: String,
    description: String,
    parent: Option<CategoryId>,
    children: Vec<CategoryId>,
    books: BTreeSet<BookId>,
}

impl CategoryNode {
    /// Build a detached node. Sibling uniqueness is checked by the tree.
    pub(crate) fn create(
        id: CategoryId,
        name: &str,
        description: &str,
        parent: Option<CategoryId>,
    ) -> Result<Self> {
        let name = normalize_name(name)?;
        Ok(Self {
            id,
            name,
            description: description.trim().to_string(),
            parent,
            children: Vec::new(),
            books: BTreeSet::new(),
        })
    }

    pub fn id(&self) -> CategoryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parent_id(&self) -> Option<CategoryId> {
        self.parent
    }

    pub fn child_ids(&self) -> &[CategoryId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Book ids filed directly here, ascending
    pub fn book_ids(&self) -> impl Iterator<Item = BookId> + '_ {
        self.books.iter().copied()
    }

    pub fn has_book(&self, book: BookId) -> bool {
        self.books.contains(&book)
    }

    pub fn direct_book_count(&self) -> usize {
        self.books.len()
    }

    /// Case-insensitive name comparison used for lookups and sibling checks.
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }

    pub(crate) fn add_book(&mut self, book: BookId) -> Result<()> {
        if !self.books.insert(book) {
            return Err(ShelfmarkError::DuplicateBook {
                book,
                category: self.name.clone(),
            });
        }
        Ok(())
    }

    pub(crate) fn remove_book(&mut self, book: BookId) -> Result<()> {
        if !self.books.remove(&book) {
            return Err(ShelfmarkError::BookNotInCategory {
                book,
                category: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Drop a book if present; returns whether it was filed here.
    pub(crate) fn discard_book(&mut self, book: BookId) -> bool {
        self.books.remove(&book)
    }

    pub(crate) fn take_books(&mut self) -> BTreeSet<BookId> {
        std::mem::take(&mut self.books)
    }

    pub(crate) fn push_child(&mut self, child: CategoryId) {
        self.children.push(child);
    }

    pub(crate) fn detach_child(&mut self, child: CategoryId) {
        self.children.retain(|c| *c != child);
    }
}

/// Trim and reject empty names
fn normalize_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ShelfmarkError::EmptyName);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str) -> CategoryNode {
        CategoryNode::create(CategoryId::new(1), name, "", None).unwrap()
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let err = CategoryNode::create(CategoryId::new(1), "   ", "desc", None).unwrap_err();
        assert!(matches!(err, ShelfmarkError::EmptyName));
    }

    #[test]
    fn test_create_trims_fields() {
        let n = CategoryNode::create(CategoryId::new(3), "  Poetry ", " Verse ", None).unwrap();
        assert_eq!(n.name(), "Poetry");
        assert_eq!(n.description(), "Verse");
        assert!(n.is_root());
        assert_eq!(n.direct_book_count(), 0);
    }

    #[test]
    fn test_duplicate_book_is_rejected_without_change() {
        let mut n = node("Fiction");
        n.add_book(10).unwrap();
        let err = n.add_book(10).unwrap_err();
        assert!(matches!(err, ShelfmarkError::DuplicateBook { book: 10, .. }));
        assert_eq!(n.direct_book_count(), 1);
    }

    #[test]
    fn test_remove_missing_book() {
        let mut n = node("Fiction");
        let err = n.remove_book(4).unwrap_err();
        assert!(matches!(err, ShelfmarkError::BookNotInCategory { book: 4, .. }));
    }

    #[test]
    fn test_discard_book_reports_presence() {
        let mut n = node("Fiction");
        n.add_book(4).unwrap();
        assert!(n.discard_book(4));
        assert!(!n.discard_book(4));
        assert_eq!(n.direct_book_count(), 0);
    }

    #[test]
    fn test_name_matches_ignores_case() {
        let n = node("Sci-Fi");
        assert!(n.name_matches("sci-fi"));
        assert!(n.name_matches(" SCI-FI "));
        assert!(!n.name_matches("Fantasy"));
    }

    #[test]
    fn test_category_id_parse() {
        assert_eq!("12".parse::<CategoryId>().unwrap(), CategoryId::new(12));
        assert_eq!("#7".parse::<CategoryId>().unwrap(), CategoryId::new(7));
        assert!("Fiction".parse::<CategoryId>().is_err());
        assert_eq!(CategoryId::new(5).to_string(), "#5");
    }
}
