//! Storage mediation for the field's metadata slot

use crate::controller::TermMetaUi;
use crate::request::Request;
use termmeta_common::{Result, TermId};
use tracing::debug;

impl TermMetaUi {
    /// Current value of the field for a term; empty when unset
    ///
    /// # Errors
    /// Propagates host storage faults.
    pub fn get_value(&self, term_id: TermId) -> Result<String> {
        Ok(self
            .host
            .meta
            .get_term_meta(term_id, self.meta_key())?
            .unwrap_or_default())
    }

    /// Store `value` for a term, deleting the slot when `value` is empty.
    ///
    /// An empty value always means "clear the field"; there is no way to
    /// store an empty string. With `clean_cache`, the host's cached copy of
    /// the term is invalidated afterwards.
    ///
    /// # Errors
    /// Propagates host storage faults.
    pub fn set_value(&self, term_id: TermId, taxonomy: &str, value: &str, clean_cache: bool) -> Result<()> {
        if value.is_empty() {
            self.host.meta.delete_term_meta(term_id, self.meta_key())?;
            debug!(meta_key = self.meta_key(), %term_id, "Deleted term meta");
        } else {
            self.host.meta.update_term_meta(term_id, self.meta_key(), value)?;
            debug!(meta_key = self.meta_key(), %term_id, "Updated term meta");
        }

        if clean_cache {
            self.host.cache.clean_term_cache(term_id, taxonomy)?;
        }
        Ok(())
    }

    /// Term create/edit handler: persist the posted `term-<key>` field.
    ///
    /// A missing field is treated as empty and clears the stored value.
    ///
    /// # Errors
    /// Propagates host storage faults.
    pub fn on_save(&self, term_id: TermId, taxonomy: &str, request: &Request) -> Result<()> {
        let value = request.posted(&self.spec.input_name()).unwrap_or_default();
        self.set_value(term_id, taxonomy, value, false)
    }
}
