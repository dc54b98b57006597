//! Error types for TermMeta
//!
//! Absence is never an error here: missing metadata, a missing schema
//! version or a missing posted field all resolve to defaults. What remains
//! are host storage faults and misconfiguration.

use crate::types::MetaKeyError;
use thiserror::Error;

/// Common result type for TermMeta operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for TermMeta
#[derive(Debug, Error)]
pub enum Error {
    // Host errors
    #[error("storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Field errors
    #[error("invalid meta key: {0}")]
    InvalidMetaKey(#[from] MetaKeyError),

    #[error("meta key already registered: {0}")]
    DuplicateMetaKey(String),

    // Dispatch errors
    #[error("handler kind does not match hook {hook}")]
    HandlerMismatch { hook: String },

    // Internal errors
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
