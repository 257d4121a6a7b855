use std::path::PathBuf;
use thiserror::Error;

use crate::book::BookId;
use crate::category::CategoryId;

#[derive(Debug, Error)]
pub enum ShelfmarkError {
    #[error("Category name must not be empty")]
    EmptyName,

    #[error("Category not found: {id}")]
    CategoryNotFound { id: CategoryId },

    #[error("Category not found: '{name}'")]
    CategoryNameNotFound { name: String },

    #[error("Category '{name}' already exists under {parent}")]
    DuplicateCategory { name: String, parent: String },

    #[error("Book {book} is already filed under '{category}'")]
    DuplicateBook { book: BookId, category: String },

    #[error("Book {book} is not filed under '{category}'")]
    BookNotInCategory { book: BookId, category: String },

    #[error("Category {id} has {children} subcategories - remove them first or cascade")]
    HasChildren { id: CategoryId, children: usize },

    #[error("No category ids left to assign")]
    IdsExhausted,

    #[error("Invalid removal policy: '{value}' - expected 'reject' or 'cascade'")]
    InvalidPolicy { value: String },

    #[error("Invalid category snapshot: {message}")]
    InvalidSnapshot { message: String },

    #[error("Config parse error in {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Config key not found: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Home directory not found")]
    HomeNotFound,
}

pub type Result<T> = std::result::Result<T, ShelfmarkError>;

/// Coarse error classes callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or empty input.
    Validation,
    /// An id, name or book reference did not resolve.
    NotFound,
    /// Duplicate sibling name or duplicate book reference within one category.
    Duplicate,
    /// The removal policy refused the operation.
    Conflict,
    Io,
    Config,
}

impl ShelfmarkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyName | Self::InvalidPolicy { .. } | Self::InvalidSnapshot { .. } => {
                ErrorKind::Validation
            }
            Self::CategoryNotFound { .. }
            | Self::CategoryNameNotFound { .. }
            | Self::BookNotInCategory { .. } => ErrorKind::NotFound,
            Self::DuplicateCategory { .. } | Self::DuplicateBook { .. } => ErrorKind::Duplicate,
            Self::HasChildren { .. } | Self::IdsExhausted => ErrorKind::Conflict,
            Self::Io(_) | Self::Json(_) | Self::HomeNotFound => ErrorKind::Io,
            Self::ConfigParse { .. }
            | Self::ConfigKeyNotFound { .. }
            | Self::TomlSer(_)
            | Self::TomlDe(_) => ErrorKind::Config,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::NotFound => 2,
            ErrorKind::Duplicate => 3,
            ErrorKind::Conflict => 4,
            ErrorKind::Validation => 5,
            ErrorKind::Config => 6,
            ErrorKind::Io => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_taxonomy() {
        assert_eq!(ShelfmarkError::EmptyName.kind(), ErrorKind::Validation);
        assert_eq!(
            ShelfmarkError::CategoryNotFound {
                id: CategoryId::new(7)
            }
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ShelfmarkError::DuplicateBook {
                book: 1,
                category: "Fiction".into()
            }
            .kind(),
            ErrorKind::Duplicate
        );
    }

    #[test]
    fn test_exit_codes_are_distinct_per_kind() {
        let not_found = ShelfmarkError::CategoryNameNotFound { name: "x".into() };
        let conflict = ShelfmarkError::HasChildren {
            id: CategoryId::new(1),
            children: 2,
        };
        assert_eq!(not_found.exit_code(), 2);
        assert_eq!(conflict.exit_code(), 4);
    }

    #[test]
    fn test_display_mentions_names() {
        let err = ShelfmarkError::DuplicateCategory {
            name: "Sci-Fi".into(),
            parent: "'Fiction'".into(),
        };
        assert_eq!(
            err.to_string(),
            "Category 'Sci-Fi' already exists under 'Fiction'"
        );
    }
}
