//! Configuration types for TermMeta
//!
//! This module defines configuration structures used across components.
//! Every section tolerates being absent from a config file.

use crate::types::{Labels, MetaKey};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder rendered in the list table for terms without a value (em-dash)
pub const DEFAULT_NO_VALUE: &str = "&#8212;";

/// Schema version compiled into a field unless configured otherwise
pub const DEFAULT_DB_VERSION: i64 = 201_501_010_001;

/// Root configuration for TermMeta
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Site layout used to derive field identities
    #[serde(default)]
    pub site: SiteConfig,
    /// Persistent store configuration
    #[serde(default)]
    pub store: StoreConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// One entry per metadata field
    #[serde(default, rename = "field")]
    pub fields: Vec<FieldConfig>,
}

impl Config {
    /// Look up a configured field by meta key
    #[must_use]
    pub fn field(&self, meta_key: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|f| f.meta_key == *meta_key)
    }
}

/// Where extension modules live on disk and on the web
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Directory containing extension modules
    #[serde(default = "default_plugins_dir")]
    pub plugins_dir: PathBuf,
    /// Public URL of `plugins_dir`
    #[serde(default = "default_plugins_url")]
    pub plugins_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            plugins_dir: default_plugins_dir(),
            plugins_url: default_plugins_url(),
        }
    }
}

fn default_plugins_dir() -> PathBuf {
    PathBuf::from("/var/www/wp-content/plugins")
}

fn default_plugins_url() -> String {
    "http://localhost/wp-content/plugins".to_string()
}

/// Persistent store configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the redb database file
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./termmeta-data/termmeta.redb")
}

/// Logging configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Configuration of one metadata field
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Storage slot and form input namespace
    pub meta_key: MetaKey,
    /// User-visible labels
    #[serde(default)]
    pub labels: Labels,
    /// Markup shown for terms without a value
    #[serde(default = "default_no_value")]
    pub no_value: String,
    /// Target schema version
    #[serde(default = "default_db_version")]
    pub db_version: i64,
    /// Option key holding the persisted schema version
    #[serde(default)]
    pub db_version_key: Option<String>,
    /// Release version of the field's module
    #[serde(default = "default_version")]
    pub version: String,
    /// Path of the module defining the field
    #[serde(default)]
    pub file: PathBuf,
}

impl FieldConfig {
    /// Create a field configuration with defaults for everything but key and labels
    #[must_use]
    pub fn new(meta_key: MetaKey, labels: Labels) -> Self {
        Self {
            meta_key,
            labels,
            no_value: default_no_value(),
            db_version: default_db_version(),
            db_version_key: None,
            version: default_version(),
            file: PathBuf::new(),
        }
    }

    /// Option key for the schema version, derived from the meta key unless set
    #[must_use]
    pub fn db_version_key(&self) -> String {
        self.db_version_key
            .clone()
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| format!("term_meta_{}_db_version", self.meta_key))
    }
}

fn default_no_value() -> String {
    DEFAULT_NO_VALUE.to_string()
}

const fn default_db_version() -> i64 {
    DEFAULT_DB_VERSION
}

fn default_version() -> String {
    "0.0.0".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.fields.is_empty());
        assert_eq!(config.logging.level, "info");
        assert!(config.store.path.ends_with("termmeta.redb"));
    }

    #[test]
    fn test_field_defaults() {
        let field = FieldConfig::new(MetaKey::new("rank").unwrap(), Labels::new("Rank", "Ranks"));
        assert_eq!(field.no_value, "&#8212;");
        assert_eq!(field.db_version, 201_501_010_001);
        assert_eq!(field.db_version_key(), "term_meta_rank_db_version");
        assert_eq!(field.version, "0.0.0");
    }

    #[test]
    fn test_parse_fields_from_toml() {
        let config: Config = toml::from_str(
            r#"
            [site]
            plugins_url = "https://example.org/wp-content/plugins"

            [[field]]
            meta_key = "rank"
            db_version = 2
            labels = { singular = "Rank", plural = "Ranks" }

            [[field]]
            meta_key = "color"
            db_version_key = "wp_term_color_version"
            "#,
        )
        .unwrap();

        assert_eq!(config.fields.len(), 2);
        let rank = config.field("rank").unwrap();
        assert_eq!(rank.db_version, 2);
        assert_eq!(rank.labels.singular, "Rank");
        assert_eq!(config.field("color").unwrap().db_version_key(), "wp_term_color_version");
        assert!(config.field("missing").is_none());
    }

    #[test]
    fn test_invalid_meta_key_rejected() {
        let parsed: Result<Config, _> = toml::from_str(
            r#"
            [[field]]
            meta_key = "has space"
            "#,
        );
        assert!(parsed.is_err());
    }
}
