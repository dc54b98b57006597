//! TermMeta UI - metadata lifecycle controller for taxonomy terms
//!
//! One [`TermMetaUi`] manages exactly one scalar metadata field: it binds
//! the field's key to term create/edit events, renders it as a list-table
//! column and as add, edit and quick-edit form inputs, and keeps the field's
//! persisted schema version current.
//!
//! The host is reached only through injected collaborators ([`Host`]), the
//! typed [`HookRegistry`] dispatcher and an explicit [`Request`] context.

pub mod columns;
pub mod controller;
pub mod field;
pub mod hooks;
pub mod markup;
pub mod request;
pub mod schema;
pub mod strategy;

mod render;
mod storage;
mod taxonomy;

#[cfg(test)]
mod test_support;

// Re-exports
pub use columns::ColumnSet;
pub use controller::{Host, TermMetaUi};
pub use field::{FieldIdentity, FieldSpec};
pub use hooks::{ColumnCell, Handler, Hook, HookRegistry, QuickEditBox};
pub use request::Request;
pub use schema::SchemaState;
pub use strategy::{FieldStrategy, PlainText, UpgradeContext};
