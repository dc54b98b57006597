//! Redb table definitions for persistent term metadata.

use redb::TableDefinition;

// Key: "<meta_key>\x00<zero-padded term_id>", Value: metadata value
pub const TERM_META: TableDefinition<&str, &str> = TableDefinition::new("term_meta");

// Key: option name, Value: integer option
pub const OPTIONS: TableDefinition<&str, i64> = TableDefinition::new("options");

// Key: taxonomy name, Value: bincode-encoded StoredTaxonomy
pub const TAXONOMIES: TableDefinition<&str, &[u8]> = TableDefinition::new("taxonomies");
