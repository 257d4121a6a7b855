//! Catalog file
//!
//! Persists the category forest as pretty-printed JSON under the base
//! directory. The tree itself knows nothing about files; this module only
//! moves [`CategorySnapshot`]s in and out.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::{CategorySnapshot, CategoryTree};
use crate::config::Config;
use crate::error::Result;

const CATALOG_FILE: &str = "categories.json";
const CATALOG_VERSION: u32 = 1;

/// On-disk envelope around the category snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFile {
    /// Format version for future migrations
    pub version: u32,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub categories: Vec<CategorySnapshot>,
}

impl CatalogFile {
    pub fn from_tree(tree: &CategoryTree) -> Self {
        Self {
            version: CATALOG_VERSION,
            saved_at: Some(Utc::now()),
            categories: tree.to_snapshot(),
        }
    }

    pub fn into_tree(self) -> Result<CategoryTree> {
        CategoryTree::from_snapshot(&self.categories)
    }

    /// Catalog file path under `base_dir`
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CATALOG_FILE)
    }

    /// Read the catalog file, `None` when it does not exist yet
    pub fn load(base_dir: &Path) -> Result<Option<Self>> {
        let path = Self::path(base_dir);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no catalog file");
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        let file: Self = serde_json::from_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            version = file.version,
            roots = file.categories.len(),
            "loaded catalog file"
        );
        Ok(Some(file))
    }

    /// Write the catalog file, creating `base_dir` when needed
    pub fn save(&self, base_dir: &Path) -> Result<PathBuf> {
        let path = Self::path(base_dir);
        fs::create_dir_all(base_dir)?;

        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;
        tracing::debug!(
            path = %path.display(),
            roots = self.categories.len(),
            "saved catalog file"
        );
        Ok(path)
    }
}

/// Load the tree from `base_dir`.
///
/// Without a catalog file, the tree is seeded with the default forest when
/// `catalog.seed_defaults` is set, and empty otherwise.
pub fn load_tree(base_dir: &Path, config: &Config) -> Result<CategoryTree> {
    match CatalogFile::load(base_dir)? {
        Some(file) => file.into_tree(),
        None if config.catalog.seed_defaults => {
            tracing::debug!("seeding default categories");
            Ok(CategoryTree::with_defaults())
        }
        None => Ok(CategoryTree::new()),
    }
}

/// Persist the tree under `base_dir`
pub fn save_tree(base_dir: &Path, tree: &CategoryTree) -> Result<PathBuf> {
    CatalogFile::from_tree(tree).save(base_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShelfmarkError;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_seeds_defaults() -> Result<()> {
        let temp = TempDir::new()?;
        let tree = load_tree(temp.path(), &Config::default())?;
        assert!(tree.find_by_name("Sci-Fi").is_some());

        let mut config = Config::default();
        config.catalog.seed_defaults = false;
        assert!(load_tree(temp.path(), &config)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_save_and_reload_tree() -> Result<()> {
        let temp = TempDir::new()?;
        let mut tree = CategoryTree::new();
        let fiction = tree.add_category("Fiction", "", None)?;
        tree.add_book(fiction, 12)?;

        let path = save_tree(temp.path(), &tree)?;
        assert!(path.ends_with("categories.json"));

        let loaded = load_tree(temp.path(), &Config::default())?;
        assert_eq!(loaded.to_snapshot(), tree.to_snapshot());
        assert!(loaded.get(fiction).unwrap().has_book(12));
        Ok(())
    }

    #[test]
    fn test_envelope_json_shape() -> Result<()> {
        let file = CatalogFile::from_tree(&CategoryTree::new());
        let json = serde_json::to_value(&file)?;
        assert_eq!(json["version"], 1);
        assert!(json.get("savedAt").is_some());
        assert!(json["categories"].as_array().unwrap().is_empty());
        Ok(())
    }

    #[test]
    fn test_corrupt_file_is_an_error() -> Result<()> {
        let temp = TempDir::new()?;
        fs::write(CatalogFile::path(temp.path()), "{not json")?;
        let err = CatalogFile::load(temp.path()).unwrap_err();
        assert!(matches!(err, ShelfmarkError::Json(_)));
        Ok(())
    }
}
