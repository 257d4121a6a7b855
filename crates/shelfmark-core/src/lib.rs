pub mod book;
pub mod catalog;
pub mod category;
pub mod config;
pub mod error;

pub use book::{AllBooks, BookId, BookLookup};
pub use catalog::{load_tree, save_tree, CatalogFile};
pub use config::{CatalogConfig, ClassifierConfig, Config};
pub use error::{ErrorKind, Result, ShelfmarkError};

// Category system
pub use category::{
    CategoryId, CategoryNode, CategorySnapshot, CategoryStats, CategoryTree,
    ClassificationEngine, KeywordStore, KeywordsConfig, NodeRef, RemovalReport, RemovePolicy,
    StatisticsCollector, Suggestion, SystemStats,
};
