//! Core type definitions for TermMeta
//!
//! This module defines the term identifiers, metadata keys, labels and
//! taxonomy descriptors shared by the store and the controller.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a metadata key
pub const META_KEY_MAX_LEN: usize = 64;

/// Identifier of a term in the host's categorization system
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, From, Into,
    Display,
)]
#[display("{_0}")]
pub struct TermId(u64);

impl TermId {
    /// Create from a raw id
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TermId({})", self.0)
    }
}

/// A term addressed by id plus taxonomy
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub term_id: TermId,
    pub taxonomy: String,
}

impl Term {
    #[must_use]
    pub fn new(term_id: impl Into<TermId>, taxonomy: impl Into<String>) -> Self {
        Self {
            term_id: term_id.into(),
            taxonomy: taxonomy.into(),
        }
    }
}

/// Metadata key naming one field's storage slot and form input
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(try_from = "String", into = "String")]
#[display("{_0}")]
pub struct MetaKey(String);

impl MetaKey {
    /// Create a new metadata key (validates the character set)
    pub fn new(key: impl Into<String>) -> Result<Self, MetaKeyError> {
        let key = key.into();
        Self::validate(&key)?;
        Ok(Self(key))
    }

    /// Get the key as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the posted form input, `term-<key>`
    #[must_use]
    pub fn input_name(&self) -> String {
        format!("term-{}", self.0)
    }

    fn validate(key: &str) -> Result<(), MetaKeyError> {
        if key.is_empty() {
            return Err(MetaKeyError::Empty);
        }
        if key.len() > META_KEY_MAX_LEN {
            return Err(MetaKeyError::TooLong);
        }
        if let Some(c) = key
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '_' && *c != '-')
        {
            return Err(MetaKeyError::InvalidChar(c));
        }
        Ok(())
    }
}

impl fmt::Debug for MetaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MetaKey({:?})", self.0)
    }
}

impl TryFrom<String> for MetaKey {
    type Error = MetaKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MetaKey> for String {
    fn from(key: MetaKey) -> Self {
        key.0
    }
}

impl PartialEq<str> for MetaKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Errors that can occur when creating a metadata key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetaKeyError {
    #[error("meta key must not be empty")]
    Empty,
    #[error("meta key must be at most 64 characters")]
    TooLong,
    #[error("meta key contains invalid character: {0:?}")]
    InvalidChar(char),
}

/// User-visible labels of a metadata field
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    #[serde(default)]
    pub singular: String,
    #[serde(default)]
    pub plural: String,
    #[serde(default)]
    pub description: String,
}

impl Labels {
    #[must_use]
    pub fn new(singular: impl Into<String>, plural: impl Into<String>) -> Self {
        Self {
            singular: singular.into(),
            plural: plural.into(),
            description: String::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A taxonomy as registered with the host
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyInfo {
    pub name: String,
    /// Whether the host exposes an admin UI for this taxonomy
    pub show_ui: bool,
    #[serde(default)]
    pub hierarchical: bool,
}

impl TaxonomyInfo {
    #[must_use]
    pub fn new(name: impl Into<String>, show_ui: bool) -> Self {
        Self {
            name: name.into(),
            show_ui,
            hierarchical: false,
        }
    }

    #[must_use]
    pub const fn hierarchical(mut self) -> Self {
        self.hierarchical = true;
        self
    }
}

/// Filter arguments for taxonomy enumeration; `None` matches anything
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaxonomyQuery {
    pub show_ui: Option<bool>,
    pub hierarchical: Option<bool>,
}

impl TaxonomyQuery {
    /// The query used for list-table and form wiring: UI-visible taxonomies
    #[must_use]
    pub const fn visible() -> Self {
        Self {
            show_ui: Some(true),
            hierarchical: None,
        }
    }

    /// Overlay `other` on top of `self`; set fields in `other` win
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            show_ui: other.show_ui.or(self.show_ui),
            hierarchical: other.hierarchical.or(self.hierarchical),
        }
    }

    #[must_use]
    pub fn matches(&self, info: &TaxonomyInfo) -> bool {
        self.show_ui.is_none_or(|v| v == info.show_ui)
            && self.hierarchical.is_none_or(|v| v == info.hierarchical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_key_valid() {
        assert!(MetaKey::new("rank").is_ok());
        assert!(MetaKey::new("term_color").is_ok());
        assert!(MetaKey::new("order-2").is_ok());
    }

    #[test]
    fn test_meta_key_invalid() {
        assert_eq!(MetaKey::new(""), Err(MetaKeyError::Empty));
        assert_eq!(MetaKey::new("a b"), Err(MetaKeyError::InvalidChar(' ')));
        assert_eq!(MetaKey::new("x\"y"), Err(MetaKeyError::InvalidChar('"')));
        assert_eq!(MetaKey::new("k".repeat(65)), Err(MetaKeyError::TooLong));
    }

    #[test]
    fn test_meta_key_input_name() {
        let key = MetaKey::new("rank").unwrap();
        assert_eq!(key.input_name(), "term-rank");
        assert_eq!(key.to_string(), "rank");
    }

    #[test]
    fn test_term_id_display() {
        let id = TermId::from(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(format!("{id:?}"), "TermId(42)");
        assert_eq!(u64::from(id), 42);
    }

    #[test]
    fn test_taxonomy_query_merge() {
        let merged = TaxonomyQuery::visible().merge(TaxonomyQuery {
            show_ui: None,
            hierarchical: Some(true),
        });
        assert_eq!(merged.show_ui, Some(true));
        assert_eq!(merged.hierarchical, Some(true));

        let overridden = TaxonomyQuery::visible().merge(TaxonomyQuery {
            show_ui: Some(false),
            hierarchical: None,
        });
        assert_eq!(overridden.show_ui, Some(false));
    }

    #[test]
    fn test_taxonomy_query_matches() {
        let tag = TaxonomyInfo::new("tag", true);
        let hidden = TaxonomyInfo::new("nav_menu", false);
        let query = TaxonomyQuery::visible();
        assert!(query.matches(&tag));
        assert!(!query.matches(&hidden));
        assert!(TaxonomyQuery::default().matches(&hidden));
    }
}
