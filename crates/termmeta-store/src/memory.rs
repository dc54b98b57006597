//! In-memory host store
//!
//! Implements every host collaborator trait over `parking_lot` locks. Used
//! as the substitutable fake in controller tests and by embedders that
//! keep term metadata elsewhere.

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use termmeta_common::{
    OptionStore, Result, TaxonomyInfo, TaxonomyQuery, TaxonomySource, TermCache, TermId,
    TermMetaStore,
};

/// In-memory term metadata, option and taxonomy store
pub struct MemoryStore {
    /// Metadata indexed by meta key, then term id
    meta: RwLock<HashMap<String, BTreeMap<TermId, String>>>,
    /// Integer options
    options: RwLock<HashMap<String, i64>>,
    /// Taxonomies in registration order
    taxonomies: RwLock<Vec<TaxonomyInfo>>,
    /// Every cache invalidation requested, in order
    invalidations: RwLock<Vec<(TermId, String)>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            meta: RwLock::new(HashMap::new()),
            options: RwLock::new(HashMap::new()),
            taxonomies: RwLock::new(Vec::new()),
            invalidations: RwLock::new(Vec::new()),
        }
    }

    /// Create a store with the given taxonomies registered
    #[must_use]
    pub fn with_taxonomies(taxonomies: impl IntoIterator<Item = TaxonomyInfo>) -> Self {
        let store = Self::new();
        for info in taxonomies {
            store.register_taxonomy(info);
        }
        store
    }

    /// Register or replace a taxonomy; replacing keeps its position
    pub fn register_taxonomy(&self, info: TaxonomyInfo) {
        let mut taxonomies = self.taxonomies.write();
        if let Some(existing) = taxonomies.iter_mut().find(|t| t.name == info.name) {
            *existing = info;
        } else {
            taxonomies.push(info);
        }
    }

    /// Cache invalidations requested so far
    #[must_use]
    pub fn invalidations(&self) -> Vec<(TermId, String)> {
        self.invalidations.read().clone()
    }

    /// Number of stored slots under `key`
    #[must_use]
    pub fn meta_count(&self, key: &str) -> usize {
        self.meta.read().get(key).map_or(0, BTreeMap::len)
    }
}

impl TermMetaStore for MemoryStore {
    fn get_term_meta(&self, term_id: TermId, key: &str) -> Result<Option<String>> {
        Ok(self
            .meta
            .read()
            .get(key)
            .and_then(|slots| slots.get(&term_id))
            .cloned())
    }

    fn update_term_meta(&self, term_id: TermId, key: &str, value: &str) -> Result<()> {
        self.meta
            .write()
            .entry(key.to_string())
            .or_default()
            .insert(term_id, value.to_string());
        Ok(())
    }

    fn delete_term_meta(&self, term_id: TermId, key: &str) -> Result<()> {
        let mut meta = self.meta.write();
        if let Some(slots) = meta.get_mut(key) {
            slots.remove(&term_id);
            if slots.is_empty() {
                meta.remove(key);
            }
        }
        Ok(())
    }

    fn list_term_meta(&self, key: &str) -> Result<Vec<(TermId, String)>> {
        Ok(self
            .meta
            .read()
            .get(key)
            .map(|slots| slots.iter().map(|(id, v)| (*id, v.clone())).collect())
            .unwrap_or_default())
    }
}

impl TermCache for MemoryStore {
    fn clean_term_cache(&self, term_id: TermId, taxonomy: &str) -> Result<()> {
        self.invalidations
            .write()
            .push((term_id, taxonomy.to_string()));
        Ok(())
    }
}

impl TaxonomySource for MemoryStore {
    fn taxonomies(&self, query: &TaxonomyQuery) -> Result<Vec<TaxonomyInfo>> {
        Ok(self
            .taxonomies
            .read()
            .iter()
            .filter(|t| query.matches(t))
            .cloned()
            .collect())
    }
}

impl OptionStore for MemoryStore {
    fn get_option(&self, key: &str) -> Result<Option<i64>> {
        Ok(self.options.read().get(key).copied())
    }

    fn set_option(&self, key: &str, value: i64) -> Result<()> {
        self.options.write().insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_roundtrip_and_delete() {
        let store = MemoryStore::new();
        let term = TermId::new(42);
        store.update_term_meta(term, "rank", "gold").unwrap();
        assert_eq!(store.get_term_meta(term, "rank").unwrap().as_deref(), Some("gold"));
        assert_eq!(store.meta_count("rank"), 1);

        store.delete_term_meta(term, "rank").unwrap();
        assert_eq!(store.get_term_meta(term, "rank").unwrap(), None);
        assert_eq!(store.meta_count("rank"), 0);
    }

    #[test]
    fn test_list_term_meta_sorted() {
        let store = MemoryStore::new();
        store.update_term_meta(TermId::new(5), "rank", "b").unwrap();
        store.update_term_meta(TermId::new(2), "rank", "a").unwrap();
        store.update_term_meta(TermId::new(2), "color", "red").unwrap();
        assert_eq!(
            store.list_term_meta("rank").unwrap(),
            vec![(TermId::new(2), "a".into()), (TermId::new(5), "b".into())]
        );
        assert!(store.list_term_meta("missing").unwrap().is_empty());
    }

    #[test]
    fn test_taxonomy_filter() {
        let store = MemoryStore::with_taxonomies([
            TaxonomyInfo::new("tag", true),
            TaxonomyInfo::new("link_category", false),
            TaxonomyInfo::new("genre", true),
        ]);
        let names: Vec<String> = store
            .taxonomies(&TaxonomyQuery::visible())
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["tag", "genre"]);
        assert_eq!(store.taxonomies(&TaxonomyQuery::default()).unwrap().len(), 3);

        store.register_taxonomy(TaxonomyInfo::new("tag", false));
        assert_eq!(store.taxonomies(&TaxonomyQuery::visible()).unwrap().len(), 1);
    }

    #[test]
    fn test_options_and_invalidations() {
        let store = MemoryStore::new();
        assert_eq!(store.get_option("v").unwrap(), None);
        store.set_option("v", 3).unwrap();
        assert_eq!(store.get_option("v").unwrap(), Some(3));

        store.clean_term_cache(TermId::new(1), "tag").unwrap();
        assert_eq!(store.invalidations(), vec![(TermId::new(1), "tag".to_string())]);
    }
}
