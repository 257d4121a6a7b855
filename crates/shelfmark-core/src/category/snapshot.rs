//! Category Snapshot
//!
//! Plain nested form of the forest exchanged with the persistence layer:
//! `{id, name, description, bookIds: [..], children: [..]}`.

use serde::{Deserialize, Serialize};

use crate::book::BookId;
use crate::error::{Result, ShelfmarkError};

use super::node::{CategoryId, CategoryNode};
use super::tree::{CategoryTree, NodeRef};

/// One category and its subtree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySnapshot {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub book_ids: Vec<BookId>,
    #[serde(default)]
    pub children: Vec<CategorySnapshot>,
}

impl CategorySnapshot {
    fn capture(node: NodeRef<'_>) -> Self {
        Self {
            id: node.id(),
            name: node.name().to_string(),
            description: node.description().to_string(),
            book_ids: node.book_ids().collect(),
            children: node.children().map(Self::capture).collect(),
        }
    }
}

impl CategoryTree {
    /// Nested snapshot of every root, in creation order
    pub fn to_snapshot(&self) -> Vec<CategorySnapshot> {
        self.roots().map(CategorySnapshot::capture).collect()
    }

    /// Rebuild a tree, keeping the snapshot's ids.
    ///
    /// Rejects duplicate ids, empty names, duplicate sibling names and books
    /// listed twice in one category. New ids continue after the largest one seen.
    pub fn from_snapshot(roots: &[CategorySnapshot]) -> Result<Self> {
        let mut tree = CategoryTree::new();
        for root in roots {
            restore(&mut tree, root, None)?;
        }
        Ok(tree)
    }
}

fn restore(
    tree: &mut CategoryTree,
    snapshot: &CategorySnapshot,
    parent: Option<CategoryId>,
) -> Result<()> {
    let mut node = CategoryNode::create(
        snapshot.id,
        &snapshot.name,
        &snapshot.description,
        parent,
    )
    .map_err(|_| ShelfmarkError::InvalidSnapshot {
        message: format!("category {} has an empty name", snapshot.id),
    })?;

    for book in &snapshot.book_ids {
        node.add_book(*book)?;
    }
    tree.insert_restored(node)?;

    for child in &snapshot.children {
        restore(tree, child, Some(snapshot.id))?;
    }
    Ok(())
}
