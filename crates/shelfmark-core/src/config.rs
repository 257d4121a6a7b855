use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::category::{ClassificationEngine, KeywordStore, KeywordsConfig, RemovePolicy};
use crate::error::{Result, ShelfmarkError};

const CONFIG_FILE: &str = "config.toml";

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# shelfmark configuration file
# Location: ~/.shelfmark/config.toml

[catalog]
# Seed the default category forest when no catalog file exists yet
# Default: true
seed_defaults = true

# What happens when removing a category that has subcategories
# "reject"  - refuse, subcategories must be removed first
# "cascade" - remove the whole subtree and detach its books
remove_policy = "reject"

[classifier]
# Maximum number of suggestions (0 = every category with a match)
top_k = 0

# Extra keywords per category name. Set replace = true to drop the builtin set.
# [classifier.keywords."Sci-Fi"]
# keywords = ["cyberpunk", "space opera"]
# replace = false
"#;

/// Global configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// Catalog-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_seed")]
    pub seed_defaults: bool,

    #[serde(default)]
    pub remove_policy: RemovePolicy,
}

fn default_seed() -> bool {
    true
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            seed_defaults: default_seed(),
            remove_policy: RemovePolicy::default(),
        }
    }
}

/// Classifier configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// 0 = no cap
    #[serde(default)]
    pub top_k: usize,

    #[serde(default)]
    pub keywords: KeywordsConfig,
}

impl Config {
    /// Load config from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content).map_err(|e| ShelfmarkError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Save config to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "catalog.seed_defaults" => Some(self.catalog.seed_defaults.to_string()),
            "catalog.remove_policy" => Some(self.catalog.remove_policy.to_string()),
            "classifier.top_k" => Some(self.classifier.top_k.to_string()),
            _ => None,
        }
    }

    /// Set a config value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "catalog.seed_defaults" => {
                self.catalog.seed_defaults = parse_bool(key, value)?;
                Ok(())
            }
            "catalog.remove_policy" => {
                self.catalog.remove_policy = value.parse()?;
                Ok(())
            }
            "classifier.top_k" => {
                self.classifier.top_k =
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ShelfmarkError::ConfigParse {
                            path: PathBuf::from(CONFIG_FILE),
                            message: format!("{} expects a number, got '{}'", key, value),
                        })?;
                Ok(())
            }
            _ => Err(ShelfmarkError::ConfigKeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        ["catalog.seed_defaults", "catalog.remove_policy", "classifier.top_k"]
            .into_iter()
            .filter_map(|key| self.get(key).map(|value| (key.to_string(), value)))
            .collect()
    }

    /// Builtin keywords merged with the configured overrides
    pub fn keyword_store(&self) -> KeywordStore {
        KeywordStore::builtin().with_config(&self.classifier.keywords)
    }

    /// Classification engine as configured
    pub fn classification_engine(&self) -> ClassificationEngine {
        ClassificationEngine::new(self.keyword_store()).with_top_k(self.classifier.top_k)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(ShelfmarkError::ConfigParse {
            path: PathBuf::from(CONFIG_FILE),
            message: format!("{} expects true or false, got '{}'", key, value),
        }),
    }
}
