//! Per-field capability interface
//!
//! A controller holds one [`FieldStrategy`]. Every method has a default, so
//! a plain text field needs nothing beyond [`PlainText`]; richer fields
//! override value formatting, the schema upgrade step or the admin screen
//! extension points.

use crate::field::{FieldIdentity, FieldSpec};
use crate::markup::esc_html;
use crate::request::Request;
use termmeta_common::{Result, TermMetaStore};

/// What an upgrade step may touch
pub struct UpgradeContext<'a> {
    pub spec: &'a FieldSpec,
    pub meta: &'a dyn TermMetaStore,
}

pub trait FieldStrategy: Send + Sync {
    /// Markup for a non-empty value in the list table
    fn format_value(&self, value: &str) -> String {
        esc_html(value).into_owned()
    }

    /// Migrate stored values recorded under `old_version` (`0` when none was recorded)
    ///
    /// # Errors
    /// A failed migration leaves the recorded version unchanged.
    fn upgrade(&self, _old_version: i64, _ctx: &UpgradeContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Handle the field's `ajax_<key>_terms` action
    ///
    /// # Errors
    /// Propagated to the host's AJAX dispatch.
    fn ajax_update(&self, _spec: &FieldSpec, _request: &Request, _out: &mut String) -> Result<()> {
        Ok(())
    }

    /// Emit asset tags for the term screens
    ///
    /// # Errors
    /// Propagated to the host.
    fn enqueue_scripts(&self, _identity: &FieldIdentity, _out: &mut String) -> Result<()> {
        Ok(())
    }

    /// Emit contextual help for the term screens
    ///
    /// # Errors
    /// Propagated to the host.
    fn help_tabs(&self, _spec: &FieldSpec, _out: &mut String) -> Result<()> {
        Ok(())
    }

    /// Emit extra `<head>` markup for the term screens
    ///
    /// # Errors
    /// Propagated to the host.
    fn admin_head(&self, _spec: &FieldSpec, _out: &mut String) -> Result<()> {
        Ok(())
    }
}

/// Escaped plain text, no migrations
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainText;

impl FieldStrategy for PlainText {}
