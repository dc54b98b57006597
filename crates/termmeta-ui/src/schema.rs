//! Schema version maintenance
//!
//! Each field records the schema version of its stored values in a host
//! option named by `FieldSpec::db_version_key`. When the recorded version is
//! missing or behind the field's target, the strategy's upgrade step runs
//! and the target is recorded. Stored term values are only touched by the
//! strategy itself.

use crate::controller::TermMetaUi;
use crate::strategy::UpgradeContext;
use termmeta_common::Result;
use tracing::{debug, info, warn};

/// Recorded schema version relative to the field's target
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaState {
    /// Recorded version is at or past the target
    Current { version: i64 },
    /// Nothing recorded, or recorded below the target
    Stale { recorded: Option<i64> },
}

impl SchemaState {
    #[must_use]
    pub const fn is_current(&self) -> bool {
        matches!(self, Self::Current { .. })
    }
}

impl TermMetaUi {
    /// Compare the recorded schema version with the target
    ///
    /// # Errors
    /// Propagates option store faults.
    pub fn schema_state(&self) -> Result<SchemaState> {
        let recorded = self.host.options.get_option(&self.spec.db_version_key)?;
        Ok(match recorded {
            Some(version) if version >= self.spec.db_version => SchemaState::Current { version },
            recorded => SchemaState::Stale { recorded },
        })
    }

    /// Run the upgrade step and record the target version if the recorded one is stale.
    ///
    /// Returns the state found before any upgrade. A recorded version above
    /// the target is left alone.
    ///
    /// # Errors
    /// Propagates option store faults and upgrade step failures; on failure
    /// the recorded version is not changed.
    pub fn maybe_upgrade_database(&self) -> Result<SchemaState> {
        let state = self.schema_state()?;
        let SchemaState::Stale { recorded } = state else {
            debug!(meta_key = self.meta_key(), "Schema version current");
            return Ok(state);
        };

        let old_version = recorded.unwrap_or(0);
        info!(
            meta_key = self.meta_key(),
            from = old_version,
            to = self.spec.db_version,
            "Upgrading term meta schema"
        );

        let ctx = UpgradeContext {
            spec: &self.spec,
            meta: self.host.meta.as_ref(),
        };
        if let Err(e) = self.strategy.upgrade(old_version, &ctx) {
            warn!(meta_key = self.meta_key(), error = %e, "Schema upgrade failed");
            return Err(e);
        }

        self.host
            .options
            .set_option(&self.spec.db_version_key, self.spec.db_version)?;
        Ok(state)
    }
}
