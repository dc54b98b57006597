//! TermMeta Store - host storage for term metadata
//!
//! This crate implements the host collaborator traits twice: a persistent
//! store backed by redb and an in-memory store for tests and embedding.

pub mod memory;
pub mod store;
mod tables;

// Re-exports
pub use memory::MemoryStore;
pub use store::{MetaStore, MetaStoreError, MetaStoreResult};
