//! The CLI's host: one redb store, one dispatcher, one controller per field

use anyhow::{Result, anyhow};
use std::sync::Arc;
use termmeta_common::Config;
use termmeta_store::MetaStore;
use termmeta_ui::{Host, HookRegistry, PlainText, Request, TermMetaUi};
use tracing::debug;

pub struct Admin {
    hooks: HookRegistry,
    fields: Vec<Arc<TermMetaUi>>,
}

impl Admin {
    /// Register every configured field against `store` for one request
    pub fn new(config: &Config, store: Arc<MetaStore>, request: &Request) -> Result<Self> {
        let hooks = HookRegistry::new();
        let mut fields = Vec::with_capacity(config.fields.len());
        for field in &config.fields {
            let ui = TermMetaUi::register(
                field,
                &config.site,
                Host::shared(Arc::clone(&store)),
                Arc::new(PlainText),
                &hooks,
                request,
            )?;
            fields.push(ui);
        }
        debug!("Registered {} field(s), {} hook(s)", fields.len(), hooks.hooks().len());
        Ok(Self { hooks, fields })
    }

    pub const fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn fields(&self) -> &[Arc<TermMetaUi>] {
        &self.fields
    }

    pub fn field(&self, meta_key: &str) -> Result<&TermMetaUi> {
        self.fields
            .iter()
            .find(|ui| ui.meta_key() == meta_key)
            .map(|ui| &**ui)
            .ok_or_else(|| anyhow!("No field configured with meta key '{meta_key}'"))
    }
}
