//! # Category Module
//!
//! The category tree at the heart of the catalog: an n-ary forest of named
//! categories, each holding references to books owned by the external book
//! catalog.
//!
//! ## Module layout
//!
//! - `node`: a single category and its direct book references
//! - `tree`: the arena that owns every node and keeps parent/child links in sync
//! - `builtin`: the default category forest and its seed keywords
//! - `store`: keyword sets per category, merged from builtins and config
//! - `classifier`: keyword-scored category suggestions for a book
//! - `stats`: per-category and system-wide aggregates
//! - `snapshot`: nested plain form used by the persistence layer
//!
//! ## Example
//!
//! ```rust
//! use shelfmark_core::category::{CategoryTree, ClassificationEngine, StatisticsCollector};
//!
//! let mut tree = CategoryTree::new();
//! let fiction = tree.add_category("Fiction", "Imaginative prose", None).unwrap();
//! let scifi = tree.add_category("Sci-Fi", "", Some(fiction)).unwrap();
//!
//! let engine = ClassificationEngine::builtin();
//! let suggestions = engine.suggest(&tree, "Dune", "Frank Herbert", "science fiction");
//! assert_eq!(suggestions[0].category.id(), scifi);
//!
//! tree.add_book(scifi, 1).unwrap();
//! let stats = StatisticsCollector::new(&tree).category_stats(fiction).unwrap();
//! assert_eq!(stats.total_book_count, 1);
//! ```

mod builtin;
mod classifier;
mod node;
mod snapshot;
mod stats;
mod store;
mod tree;

// Re-exports
pub use builtin::{walk_builtin, BuiltinCategory, DEFAULT_CATEGORIES};
pub use classifier::{ClassificationEngine, Suggestion};
pub use node::{CategoryId, CategoryNode};
pub use snapshot::CategorySnapshot;
pub use stats::{CategoryStats, PopularCategory, StatisticsCollector, SystemStats};
pub use store::{tokenize, KeywordConfigEntry, KeywordStore, KeywordsConfig};
pub use tree::{CategoryTree, Dfs, NodeRef, RemovalReport, RemovePolicy, SearchHit};
