//! Host collaborator interfaces
//!
//! The controller never owns entity storage, the term cache, taxonomy
//! registration or the option store. It reaches them only through these
//! traits, so a persistent store and an in-memory fake are interchangeable.

use crate::error::Result;
use crate::types::{TaxonomyInfo, TaxonomyQuery, TermId};

/// Per-term metadata key-value storage
pub trait TermMetaStore: Send + Sync {
    /// Read one metadata slot; `None` when absent
    fn get_term_meta(&self, term_id: TermId, key: &str) -> Result<Option<String>>;

    /// Insert or replace one metadata slot
    fn update_term_meta(&self, term_id: TermId, key: &str, value: &str) -> Result<()>;

    /// Remove one metadata slot; removing an absent slot is not an error
    fn delete_term_meta(&self, term_id: TermId, key: &str) -> Result<()>;

    /// Every `(term, value)` pair stored under `key`, ordered by term id
    fn list_term_meta(&self, key: &str) -> Result<Vec<(TermId, String)>>;
}

/// Invalidation of the host's cached term objects
pub trait TermCache: Send + Sync {
    fn clean_term_cache(&self, term_id: TermId, taxonomy: &str) -> Result<()>;
}

/// Enumeration of registered taxonomies
pub trait TaxonomySource: Send + Sync {
    /// Taxonomies matching `query`, in registration order
    fn taxonomies(&self, query: &TaxonomyQuery) -> Result<Vec<TaxonomyInfo>>;
}

/// Global integer option storage, used for schema versions
pub trait OptionStore: Send + Sync {
    fn get_option(&self, key: &str) -> Result<Option<i64>>;

    fn set_option(&self, key: &str, value: i64) -> Result<()>;
}
