//! Persistent term metadata store backed by redb.
//!
//! Provides typed get/put/delete/list methods for term metadata, integer
//! options and taxonomy registrations. Every write is its own write txn +
//! commit. Failures are returned to the caller; the host collaborator trait
//! impls at the bottom convert them into `termmeta_common::Error::Storage`.

use crate::tables;
use redb::{Database, ReadableTable};
use serde::{Deserialize, Serialize};
use std::path::Path;
use termmeta_common::{
    OptionStore, TaxonomyInfo, TaxonomyQuery, TaxonomySource, TermCache, TermId, TermMetaStore,
};
use tracing::{debug, error};

/// Option bumped whenever a term cache is cleaned
pub const LAST_CHANGED_OPTION: &str = "terms_last_changed";

/// Separator between meta key and term id in a metadata slot key
const SLOT_SEPARATOR: char = '\x00';

/// Error type for metadata store operations
#[derive(Debug, thiserror::Error)]
pub enum MetaStoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::DatabaseError),
    #[error("redb storage error: {0}")]
    Storage(#[from] redb::StorageError),
    #[error("redb table error: {0}")]
    Table(#[from] redb::TableError),
    #[error("redb transaction error: {0}")]
    Transaction(Box<redb::TransactionError>),
    #[error("redb commit error: {0}")]
    Commit(#[from] redb::CommitError),
    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<redb::TransactionError> for MetaStoreError {
    fn from(e: redb::TransactionError) -> Self {
        Self::Transaction(Box::new(e))
    }
}

impl From<MetaStoreError> for termmeta_common::Error {
    fn from(e: MetaStoreError) -> Self {
        match e {
            MetaStoreError::Io(io) => Self::Io(io),
            MetaStoreError::Bincode(b) => Self::Serialization(b.to_string()),
            other => Self::storage(other.to_string()),
        }
    }
}

pub type MetaStoreResult<T> = Result<T, MetaStoreError>;

/// Taxonomy registration with its insertion sequence
#[derive(Debug, Serialize, Deserialize)]
struct StoredTaxonomy {
    seq: u64,
    info: TaxonomyInfo,
}

/// Persistent term metadata store backed by redb.
pub struct MetaStore {
    db: Database,
}

impl MetaStore {
    /// Open (or create) the redb database at the given path.
    pub fn open(path: impl AsRef<Path>) -> MetaStoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Create all tables eagerly so later read txns don't fail
        let write_txn = db.begin_write()?;
        {
            let _t = write_txn.open_table(tables::TERM_META)?;
            let _t = write_txn.open_table(tables::OPTIONS)?;
            let _t = write_txn.open_table(tables::TAXONOMIES)?;
        }
        write_txn.commit()?;

        debug!("Opened term metadata store at {}", path.display());
        Ok(Self { db })
    }

    // ---- Term metadata (string values) ----

    pub fn get_meta(&self, term_id: TermId, key: &str) -> MetaStoreResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(tables::TERM_META)?;
        let slot = slot_key(term_id, key);
        Ok(table.get(slot.as_str())?.map(|v| v.value().to_string()))
    }

    pub fn put_meta(&self, term_id: TermId, key: &str, value: &str) -> MetaStoreResult<()> {
        let slot = slot_key(term_id, key);
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(tables::TERM_META)?;
            table.insert(slot.as_str(), value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn delete_meta(&self, term_id: TermId, key: &str) -> MetaStoreResult<()> {
        let slot = slot_key(term_id, key);
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(tables::TERM_META)?;
            table.remove(slot.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn list_meta(&self, key: &str) -> MetaStoreResult<Vec<(TermId, String)>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(tables::TERM_META)?;
        let prefix = format!("{key}{SLOT_SEPARATOR}");
        let mut result = Vec::new();
        // Slots of one key are contiguous; stop at the first foreign key
        for entry in table.range(prefix.as_str()..)? {
            let entry = entry?;
            let slot = entry.0.value();
            let Some(id_str) = slot.strip_prefix(prefix.as_str()) else {
                break;
            };
            match id_str.parse::<u64>() {
                Ok(id) => result.push((TermId::new(id), entry.1.value().to_string())),
                Err(e) => error!("Failed to decode metadata slot '{}': {}", slot.escape_debug(), e),
            }
        }
        // Zero-padded ids keep lexical order equal to numeric order
        Ok(result)
    }

    // ---- Options (integer values) ----

    pub fn get_option(&self, key: &str) -> MetaStoreResult<Option<i64>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(tables::OPTIONS)?;
        Ok(table.get(key)?.map(|v| v.value()))
    }

    pub fn put_option(&self, key: &str, value: i64) -> MetaStoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(tables::OPTIONS)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Increment the term cache generation, returning the new value.
    pub fn bump_last_changed(&self) -> MetaStoreResult<i64> {
        let write_txn = self.db.begin_write()?;
        let next = {
            let mut table = write_txn.open_table(tables::OPTIONS)?;
            // Read, then drop the guard before mutating
            let next = table.get(LAST_CHANGED_OPTION)?.map_or(0, |v| v.value()) + 1;
            table.insert(LAST_CHANGED_OPTION, next)?;
            next
        };
        write_txn.commit()?;
        Ok(next)
    }

    // ---- Taxonomies (bincode) ----

    /// Register or update a taxonomy; re-registration keeps its position.
    pub fn put_taxonomy(&self, info: &TaxonomyInfo) -> MetaStoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(tables::TAXONOMIES)?;
            let mut existing_seq = None;
            let mut max_seq = 0;
            for entry in table.iter()? {
                let entry = entry?;
                let stored: StoredTaxonomy = bincode::deserialize(entry.1.value())?;
                if entry.0.value() == info.name {
                    existing_seq = Some(stored.seq);
                }
                max_seq = max_seq.max(stored.seq + 1);
            }
            let stored = StoredTaxonomy {
                seq: existing_seq.unwrap_or(max_seq),
                info: info.clone(),
            };
            let bytes = bincode::serialize(&stored)?;
            table.insert(info.name.as_str(), bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn delete_taxonomy(&self, name: &str) -> MetaStoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(tables::TAXONOMIES)?;
            table.remove(name)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// All registered taxonomies in registration order.
    pub fn load_taxonomies(&self) -> MetaStoreResult<Vec<TaxonomyInfo>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(tables::TAXONOMIES)?;
        let mut result = Vec::new();
        for entry in table.iter()? {
            let entry = entry?;
            let name = entry.0.value().to_string();
            match bincode::deserialize::<StoredTaxonomy>(entry.1.value()) {
                Ok(stored) => result.push(stored),
                Err(e) => error!("Failed to decode taxonomy '{}': {}", name, e),
            }
        }
        result.sort_by_key(|s| s.seq);
        Ok(result.into_iter().map(|s| s.info).collect())
    }
}

fn slot_key(term_id: TermId, key: &str) -> String {
    format!("{key}{SLOT_SEPARATOR}{:020}", term_id.get())
}

// ---- Host collaborator impls ----

impl TermMetaStore for MetaStore {
    fn get_term_meta(&self, term_id: TermId, key: &str) -> termmeta_common::Result<Option<String>> {
        Ok(self.get_meta(term_id, key)?)
    }

    fn update_term_meta(&self, term_id: TermId, key: &str, value: &str) -> termmeta_common::Result<()> {
        Ok(self.put_meta(term_id, key, value)?)
    }

    fn delete_term_meta(&self, term_id: TermId, key: &str) -> termmeta_common::Result<()> {
        Ok(self.delete_meta(term_id, key)?)
    }

    fn list_term_meta(&self, key: &str) -> termmeta_common::Result<Vec<(TermId, String)>> {
        Ok(self.list_meta(key)?)
    }
}

impl TermCache for MetaStore {
    fn clean_term_cache(&self, term_id: TermId, taxonomy: &str) -> termmeta_common::Result<()> {
        let generation = self.bump_last_changed()?;
        debug!(%term_id, taxonomy, generation, "Cleaned term cache");
        Ok(())
    }
}

impl TaxonomySource for MetaStore {
    fn taxonomies(&self, query: &TaxonomyQuery) -> termmeta_common::Result<Vec<TaxonomyInfo>> {
        Ok(self
            .load_taxonomies()?
            .into_iter()
            .filter(|t| query.matches(t))
            .collect())
    }
}

impl OptionStore for MetaStore {
    fn get_option(&self, key: &str) -> termmeta_common::Result<Option<i64>> {
        Ok(Self::get_option(self, key)?)
    }

    fn set_option(&self, key: &str, value: i64) -> termmeta_common::Result<()> {
        Ok(self.put_option(key, value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, MetaStore) {
        let dir = TempDir::new().unwrap();
        let store = MetaStore::open(dir.path().join("meta").join("termmeta.redb")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_meta_put_get_delete() {
        let (_dir, store) = open_store();
        let term = TermId::new(42);

        assert_eq!(store.get_meta(term, "rank").unwrap(), None);
        store.put_meta(term, "rank", "gold").unwrap();
        assert_eq!(store.get_meta(term, "rank").unwrap().as_deref(), Some("gold"));

        store.put_meta(term, "rank", "silver").unwrap();
        assert_eq!(store.get_meta(term, "rank").unwrap().as_deref(), Some("silver"));

        store.delete_meta(term, "rank").unwrap();
        assert_eq!(store.get_meta(term, "rank").unwrap(), None);

        // Deleting an absent slot is fine
        store.delete_meta(term, "rank").unwrap();
    }

    #[test]
    fn test_meta_keys_are_isolated() {
        let (_dir, store) = open_store();
        store.put_meta(TermId::new(1), "rank", "gold").unwrap();
        store.put_meta(TermId::new(1), "rank_extra", "x").unwrap();
        store.put_meta(TermId::new(1), "color", "red").unwrap();

        assert_eq!(store.get_meta(TermId::new(1), "color").unwrap().as_deref(), Some("red"));
        assert_eq!(
            store.list_meta("rank").unwrap(),
            vec![(TermId::new(1), "gold".to_string())]
        );
    }

    #[test]
    fn test_list_meta_orders_by_term_id() {
        let (_dir, store) = open_store();
        for id in [100, 9, 42] {
            store.put_meta(TermId::new(id), "rank", &format!("v{id}")).unwrap();
        }
        let ids: Vec<u64> = store
            .list_meta("rank")
            .unwrap()
            .into_iter()
            .map(|(id, _)| id.get())
            .collect();
        assert_eq!(ids, vec![9, 42, 100]);
    }

    #[test]
    fn test_list_meta_between_neighbouring_keys() {
        let (_dir, store) = open_store();
        // "ran" < "rank" < "rank-x" < "rank_extra" < "rankz" in slot order
        for key in ["ran", "rank-x", "rank_extra", "rankz", "a", "z"] {
            store.put_meta(TermId::new(1), key, key).unwrap();
        }
        store.put_meta(TermId::new(2), "rank", "gold").unwrap();
        store.put_meta(TermId::new(1), "rank", "silver").unwrap();

        assert_eq!(
            store.list_meta("rank").unwrap(),
            vec![(TermId::new(1), "silver".to_string()), (TermId::new(2), "gold".to_string())]
        );
        assert_eq!(store.list_meta("ran").unwrap(), vec![(TermId::new(1), "ran".to_string())]);
        assert!(store.list_meta("missing").unwrap().is_empty());
        assert_eq!(store.list_meta("z").unwrap().len(), 1);
    }

    #[test]
    fn test_options_and_last_changed() {
        let (_dir, store) = open_store();
        assert_eq!(store.get_option("term_meta_rank_db_version").unwrap(), None);
        store.put_option("term_meta_rank_db_version", 2).unwrap();
        assert_eq!(store.get_option("term_meta_rank_db_version").unwrap(), Some(2));

        assert_eq!(store.bump_last_changed().unwrap(), 1);
        store.clean_term_cache(TermId::new(3), "tag").unwrap();
        assert_eq!(store.get_option(LAST_CHANGED_OPTION).unwrap(), Some(2));
    }

    #[test]
    fn test_taxonomies_keep_registration_order() {
        let (_dir, store) = open_store();
        store.put_taxonomy(&TaxonomyInfo::new("tag", true)).unwrap();
        store.put_taxonomy(&TaxonomyInfo::new("genre", true)).unwrap();
        store.put_taxonomy(&TaxonomyInfo::new("nav_menu", false)).unwrap();
        // Re-registering keeps the original position
        store.put_taxonomy(&TaxonomyInfo::new("tag", true).hierarchical()).unwrap();

        let visible: Vec<String> = store
            .taxonomies(&TaxonomyQuery::visible())
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(visible, vec!["tag", "genre"]);
        assert!(store.load_taxonomies().unwrap()[0].hierarchical);

        store.delete_taxonomy("genre").unwrap();
        assert_eq!(store.load_taxonomies().unwrap().len(), 2);
    }

    #[test]
    fn test_reopen_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("termmeta.redb");
        {
            let store = MetaStore::open(&path).unwrap();
            store.put_meta(TermId::new(7), "rank", "bronze").unwrap();
            store.put_option("v", 5).unwrap();
        }
        let store = MetaStore::open(&path).unwrap();
        assert_eq!(store.get_meta(TermId::new(7), "rank").unwrap().as_deref(), Some("bronze"));
        assert_eq!(OptionStore::get_option(&store, "v").unwrap(), Some(5));
    }
}
