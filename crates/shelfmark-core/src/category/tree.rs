//! Category Tree
//!
//! Arena of [`CategoryNode`]s forming a forest. Roots and child lists keep
//! creation order, which fixes the DFS pre-order every query relies on.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::book::BookId;
use crate::error::{Result, ShelfmarkError};

use super::builtin::{BuiltinCategory, DEFAULT_CATEGORIES};
use super::node::{CategoryId, CategoryNode};

/// What to do when removing a category that still has subcategories
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovePolicy {
    /// Refuse to remove a category with children.
    #[default]
    Reject,
    /// Remove the whole subtree and detach every book filed in it.
    Cascade,
}

impl FromStr for RemovePolicy {
    type Err = ShelfmarkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "cascade" => Ok(Self::Cascade),
            _ => Err(ShelfmarkError::InvalidPolicy {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for RemovePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => f.write_str("reject"),
            Self::Cascade => f.write_str("cascade"),
        }
    }
}

/// Outcome of [`CategoryTree::remove_category`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    /// Removed categories in DFS pre-order, the target first
    pub removed: Vec<CategoryId>,
    /// Distinct books that were filed anywhere in the removed subtree
    pub detached_books: Vec<BookId>,
    /// Detached books that are no longer filed under any category
    pub orphaned_books: Vec<BookId>,
}

/// Result of [`CategoryTree::search`]
#[derive(Debug, Clone)]
pub struct SearchHit<'a> {
    /// Categories whose name contains the term, DFS pre-order
    pub categories: Vec<NodeRef<'a>>,
    /// Distinct books filed in those categories or below them
    pub books: Vec<BookId>,
}

/// Forest of categories
#[derive(Debug, Clone)]
pub struct CategoryTree {
    nodes: HashMap<CategoryId, CategoryNode>,
    roots: Vec<CategoryId>,
    next_id: u64,
}

impl Default for CategoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryTree {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            roots: Vec::new(),
            next_id: 1,
        }
    }

    /// Tree seeded with the default category forest
    pub fn with_defaults() -> Self {
        let mut tree = Self::new();
        for seed in DEFAULT_CATEGORIES {
            tree.seed(seed, None);
        }
        tree
    }

    fn seed(&mut self, seed: &BuiltinCategory, parent: Option<CategoryId>) {
        // Builtin names are non-empty and unique among siblings.
        if let Ok(id) = self.add_category(seed.name, seed.description, parent) {
            for child in seed.children {
                self.seed(child, Some(id));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.roots.iter().filter_map(move |id| self.get(*id))
    }

    /// Create a category, as a root when `parent` is `None`.
    pub fn add_category(
        &mut self,
        name: &str,
        description: &str,
        parent: Option<CategoryId>,
    ) -> Result<CategoryId> {
        let id = CategoryId::new(self.next_id);
        let next_id = self
            .next_id
            .checked_add(1)
            .ok_or(ShelfmarkError::IdsExhausted)?;
        let node = CategoryNode::create(id, name, description, parent)?;

        let siblings = match parent {
            Some(parent_id) => self.require(parent_id)?.child_ids(),
            None => &self.roots[..],
        };
        self.ensure_unique_sibling(siblings, node.name(), parent)?;

        match parent {
            Some(parent_id) => {
                if let Some(p) = self.nodes.get_mut(&parent_id) {
                    p.push_child(id);
                }
            }
            None => self.roots.push(id),
        }
        self.nodes.insert(id, node);
        self.next_id = next_id;
        Ok(id)
    }

    fn ensure_unique_sibling(
        &self,
        siblings: &[CategoryId],
        name: &str,
        parent: Option<CategoryId>,
    ) -> Result<()> {
        let taken = siblings
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .any(|sibling| sibling.name_matches(name));
        if taken {
            return Err(ShelfmarkError::DuplicateCategory {
                name: name.to_string(),
                parent: self.parent_label(parent),
            });
        }
        Ok(())
    }

    fn parent_label(&self, parent: Option<CategoryId>) -> String {
        parent
            .and_then(|id| self.nodes.get(&id))
            .map(|p| format!("'{}'", p.name()))
            .unwrap_or_else(|| "the root level".to_string())
    }

    pub fn get(&self, id: CategoryId) -> Option<NodeRef<'_>> {
        self.nodes.get(&id).map(|node| NodeRef { tree: self, node })
    }

    /// Same result as a DFS over all roots; the arena makes it a map lookup.
    pub fn find_by_id(&self, id: CategoryId) -> Option<NodeRef<'_>> {
        self.get(id)
    }

    /// First category in DFS pre-order whose name matches, ignoring case
    pub fn find_by_name(&self, name: &str) -> Option<NodeRef<'_>> {
        self.all_categories().find(|n| n.name_matches(name))
    }

    pub fn require(&self, id: CategoryId) -> Result<NodeRef<'_>> {
        self.get(id).ok_or(ShelfmarkError::CategoryNotFound { id })
    }

    /// Resolve a user-supplied category key to an id.
    ///
    /// `#12` always means id 12. Any other key is matched as a name first and
    /// only then read as a bare id, so a category named `1` stays reachable.
    pub fn resolve(&self, key: &str) -> Result<CategoryId> {
        let key = key.trim();
        if key.starts_with('#') {
            if let Ok(id) = key.parse::<CategoryId>() {
                return self.require(id).map(|n| n.id());
            }
        }
        if let Some(node) = self.find_by_name(key) {
            return Ok(node.id());
        }
        key.parse::<CategoryId>()
            .ok()
            .filter(|id| self.nodes.contains_key(id))
            .ok_or_else(|| ShelfmarkError::CategoryNameNotFound {
                name: key.to_string(),
            })
    }

    /// Lazy DFS pre-order over every category, re-walked on each call
    pub fn all_categories(&self) -> Dfs<'_> {
        Dfs {
            tree: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    pub fn categories_with_books(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.all_categories().filter(|n| n.direct_book_count() > 0)
    }

    pub fn empty_categories(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.all_categories().filter(|n| n.direct_book_count() == 0)
    }

    pub fn add_book(&mut self, id: CategoryId, book: BookId) -> Result<()> {
        self.node_mut(id)?.add_book(book)
    }

    pub fn remove_book(&mut self, id: CategoryId, book: BookId) -> Result<()> {
        self.node_mut(id)?.remove_book(book)
    }

    fn node_mut(&mut self, id: CategoryId) -> Result<&mut CategoryNode> {
        self.nodes
            .get_mut(&id)
            .ok_or(ShelfmarkError::CategoryNotFound { id })
    }

    /// Names from the root down to `id`
    pub fn path(&self, id: CategoryId) -> Result<Vec<&str>> {
        Ok(self.require(id)?.path())
    }

    /// Remove a category according to `policy`.
    ///
    /// Validation happens before any mutation, so a rejected call leaves the
    /// tree untouched.
    pub fn remove_category(
        &mut self,
        id: CategoryId,
        policy: RemovePolicy,
    ) -> Result<RemovalReport> {
        let target = self.require(id)?;
        let children = target.child_ids().len();
        if children > 0 && policy == RemovePolicy::Reject {
            return Err(ShelfmarkError::HasChildren { id, children });
        }

        let removed: Vec<CategoryId> = target.descendants().map(|n| n.id()).collect();
        let parent = target.parent_id();

        match parent {
            Some(parent_id) => {
                if let Some(p) = self.nodes.get_mut(&parent_id) {
                    p.detach_child(id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }

        let mut detached = BTreeSet::new();
        for removed_id in &removed {
            if let Some(mut node) = self.nodes.remove(removed_id) {
                detached.extend(node.take_books());
            }
        }

        let orphaned_books = detached
            .iter()
            .copied()
            .filter(|book| self.nodes.values().all(|n| !n.has_book(*book)))
            .collect();

        Ok(RemovalReport {
            removed,
            detached_books: detached.into_iter().collect(),
            orphaned_books,
        })
    }

    /// Every category filing `book` directly, DFS pre-order
    pub fn categories_of_book(&self, book: BookId) -> Vec<NodeRef<'_>> {
        self.all_categories().filter(|n| n.has_book(book)).collect()
    }

    /// Books in a category, optionally including its subtree.
    ///
    /// Ids are distinct, in DFS order of first appearance.
    pub fn books_in(&self, id: CategoryId, include_subcategories: bool) -> Result<Vec<BookId>> {
        let node = self.require(id)?;
        if !include_subcategories {
            return Ok(node.book_ids().collect());
        }
        let mut seen = HashSet::new();
        Ok(node
            .descendants()
            .flat_map(|n| n.book_ids())
            .filter(|book| seen.insert(*book))
            .collect())
    }

    /// Detach a book deleted from the catalog from every category.
    ///
    /// Returns the categories it was removed from.
    pub fn forget_book(&mut self, book: BookId) -> Vec<CategoryId> {
        let order: Vec<CategoryId> = self.all_categories().map(|n| n.id()).collect();
        order
            .into_iter()
            .filter(|id| {
                self.nodes
                    .get_mut(id)
                    .is_some_and(|node| node.discard_book(book))
            })
            .collect()
    }

    /// Categories whose name contains `term` (case-insensitive) and the books below them
    pub fn search(&self, term: &str) -> SearchHit<'_> {
        let needle = term.trim().to_lowercase();
        let categories: Vec<NodeRef<'_>> = self
            .all_categories()
            .filter(|n| n.name().to_lowercase().contains(&needle))
            .collect();

        let mut seen = HashSet::new();
        let books = categories
            .iter()
            .flat_map(|c| c.descendants())
            .flat_map(|n| n.book_ids())
            .filter(|book| seen.insert(*book))
            .collect();

        SearchHit { categories, books }
    }

    /// All category names, sorted
    pub fn category_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.all_categories().map(|n| n.name()).collect();
        names.sort_unstable();
        names
    }

    /// Indented outline of the forest with book counts.
    pub fn render(&self, show_books: bool) -> String {
        let mut out = String::new();
        for node in self.all_categories() {
            let depth = node.depth();
            out.push_str(&"  ".repeat(depth));
            if depth > 0 {
                out.push_str("├─ ");
            }
            out.push_str(node.name());

            let direct = node.direct_book_count();
            let total = node.total_book_count();
            if total > 0 {
                if direct > 0 && direct != total {
                    out.push_str(&format!(" ({} direct, {} total)", direct, total));
                } else {
                    let noun = if total == 1 { "book" } else { "books" };
                    out.push_str(&format!(" ({} {})", total, noun));
                }
            }
            if show_books && direct > 0 {
                let ids: Vec<String> = node.book_ids().map(|b| b.to_string()).collect();
                out.push_str(&format!(" - IDs: [{}]", ids.join(", ")));
            }
            out.push('\n');
        }
        out
    }

    /// Insert a node with a known id while restoring from a snapshot.
    pub(crate) fn insert_restored(&mut self, node: CategoryNode) -> Result<()> {
        let id = node.id();
        let after = id
            .get()
            .checked_add(1)
            .ok_or_else(|| ShelfmarkError::InvalidSnapshot {
                message: format!("category id {} out of range", id),
            })?;
        if self.nodes.contains_key(&id) {
            return Err(ShelfmarkError::InvalidSnapshot {
                message: format!("category id {} appears more than once", id),
            });
        }
        let siblings = match node.parent_id() {
            Some(parent_id) => self.require(parent_id)?.child_ids(),
            None => &self.roots[..],
        };
        self.ensure_unique_sibling(siblings, node.name(), node.parent_id())?;

        match node.parent_id() {
            Some(parent_id) => {
                if let Some(p) = self.nodes.get_mut(&parent_id) {
                    p.push_child(id);
                }
            }
            None => self.roots.push(id),
        }
        self.next_id = self.next_id.max(after);
        self.nodes.insert(id, node);
        Ok(())
    }
}

/// Borrowed view of a node inside its tree.
///
/// Borrowing accessors return data tied to the tree, not to the view, so
/// `n.name()` can outlive a temporary `NodeRef`. Everything else derefs to
/// [`CategoryNode`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a CategoryTree,
    node: &'a CategoryNode,
}

impl<'a> NodeRef<'a> {
    pub fn node(&self) -> &'a CategoryNode {
        self.node
    }

    pub fn name(&self) -> &'a str {
        self.node.name()
    }

    pub fn description(&self) -> &'a str {
        self.node.description()
    }

    pub fn child_ids(&self) -> &'a [CategoryId] {
        self.node.child_ids()
    }

    pub fn book_ids(&self) -> impl Iterator<Item = BookId> + 'a {
        self.node.book_ids()
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node.parent_id().and_then(|id| self.tree.get(id))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        self.node
            .child_ids()
            .iter()
            .filter_map(move |id| tree.get(*id))
    }

    /// This node and everything below it, DFS pre-order
    pub fn descendants(&self) -> Dfs<'a> {
        Dfs {
            tree: self.tree,
            stack: vec![self.node.id()],
        }
    }

    /// Names from the root down to this node, recomputed on every call
    pub fn path(&self) -> Vec<&'a str> {
        let mut path = vec![self.node.name()];
        let mut current = self.parent();
        while let Some(p) = current {
            path.push(p.name());
            current = p.parent();
        }
        path.reverse();
        path
    }

    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent();
        while let Some(p) = current {
            depth += 1;
            current = p.parent();
        }
        depth
    }

    /// Direct books here plus the direct books of every descendant.
    pub fn total_book_count(&self) -> usize {
        self.descendants().map(|n| n.direct_book_count()).sum()
    }
}

impl Deref for NodeRef<'_> {
    type Target = CategoryNode;

    fn deref(&self) -> &Self::Target {
        self.node
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.node.id())
            .field("name", &self.node.name())
            .finish()
    }
}

/// DFS pre-order iterator, children left to right
pub struct Dfs<'a> {
    tree: &'a CategoryTree,
    stack: Vec<CategoryId>,
}

impl<'a> Iterator for Dfs<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if let Some(node) = self.tree.get(id) {
                self.stack.extend(node.child_ids().iter().rev().copied());
                return Some(node);
            }
        }
        None
    }
}
