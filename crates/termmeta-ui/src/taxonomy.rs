//! Taxonomy enumeration

use crate::controller::TermMetaUi;
use termmeta_common::{Result, TaxonomyQuery};

impl TermMetaUi {
    /// Names of taxonomies matching `query`, in host registration order.
    ///
    /// Unset criteria fall back to "shown in the admin UI"; explicit
    /// criteria in `query` win.
    ///
    /// # Errors
    /// Propagates host enumeration faults.
    pub fn get_taxonomies(&self, query: TaxonomyQuery) -> Result<Vec<String>> {
        let query = TaxonomyQuery::visible().merge(query);
        Ok(self
            .host
            .taxonomies
            .taxonomies(&query)?
            .into_iter()
            .map(|info| info.name)
            .collect())
    }

    pub(crate) fn visible_taxonomies(&self) -> Result<Vec<String>> {
        self.get_taxonomies(TaxonomyQuery::default())
    }

    pub(crate) fn is_visible_taxonomy(&self, taxonomy: &str) -> Result<bool> {
        Ok(self.visible_taxonomies()?.iter().any(|name| name == taxonomy))
    }
}
