//! TermMeta Common - Shared types and host interfaces
//!
//! This crate provides the term types, the host collaborator traits, error
//! definitions and configuration used across all TermMeta components.

pub mod config;
pub mod error;
pub mod host;
pub mod types;

pub use config::{Config, FieldConfig, SiteConfig, StoreConfig};
pub use error::{Error, Result};
pub use host::{OptionStore, TaxonomySource, TermCache, TermMetaStore};
pub use types::*;
