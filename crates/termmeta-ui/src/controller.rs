//! Metadata lifecycle controller
//!
//! [`TermMetaUi::register`] builds the controller for one field and
//! subscribes it to the host's lifecycle events. Storage mediation,
//! presentation, schema maintenance and taxonomy enumeration live in their
//! own modules as further `impl TermMetaUi` blocks.

use crate::field::{FieldIdentity, FieldSpec};
use crate::hooks::{Handler, Hook, HookRegistry};
use crate::request::Request;
use crate::strategy::FieldStrategy;
use std::sync::Arc;
use termmeta_common::{
    FieldConfig, OptionStore, Result, SiteConfig, TaxonomySource, TermCache, TermMetaStore,
};
use tracing::{debug, info};

/// Host collaborators the controller reads from and writes to
#[derive(Clone)]
pub struct Host {
    pub meta: Arc<dyn TermMetaStore>,
    pub cache: Arc<dyn TermCache>,
    pub taxonomies: Arc<dyn TaxonomySource>,
    pub options: Arc<dyn OptionStore>,
}

impl Host {
    /// Use one store for every collaborator
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: TermMetaStore + TermCache + TaxonomySource + OptionStore + 'static,
    {
        Self {
            meta: Arc::clone(&store) as Arc<dyn TermMetaStore>,
            cache: Arc::clone(&store) as Arc<dyn TermCache>,
            taxonomies: Arc::clone(&store) as Arc<dyn TaxonomySource>,
            options: store as Arc<dyn OptionStore>,
        }
    }
}

/// Controller for one term metadata field
pub struct TermMetaUi {
    pub(crate) spec: FieldSpec,
    pub(crate) identity: FieldIdentity,
    pub(crate) host: Host,
    pub(crate) strategy: Arc<dyn FieldStrategy>,
}

impl TermMetaUi {
    /// Build the controller for `config` and subscribe it to `hooks`.
    ///
    /// Term create/edit, per-taxonomy column and form hooks and the field's
    /// AJAX action are always wired. Schema maintenance and the term screen
    /// bootstrap are wired only for blog-admin requests and quick-edit saves.
    /// No term data is touched.
    ///
    /// # Errors
    /// Returns `Error::DuplicateMetaKey` if the key is already claimed on
    /// `hooks`, or a storage error if taxonomies cannot be enumerated. On
    /// error `hooks` is left as it was.
    pub fn register(
        config: &FieldConfig,
        site: &SiteConfig,
        host: Host,
        strategy: Arc<dyn FieldStrategy>,
        hooks: &HookRegistry,
        request: &Request,
    ) -> Result<Arc<Self>> {
        let fancy = hooks.apply_bool_filter(&FieldSpec::fancy_filter_name(&config.meta_key), true);
        let ui = Arc::new(Self {
            spec: FieldSpec::from_config(config, fancy),
            identity: FieldIdentity::derive(&config.file, site),
            host,
            strategy,
        });

        // Host faults must surface before the dispatcher is touched
        let taxonomies = ui.visible_taxonomies()?;
        hooks.claim_meta_key(&config.meta_key)?;
        ui.subscribe(hooks, request, &taxonomies)?;

        info!(
            meta_key = %ui.spec.meta_key(),
            version = %ui.spec.version,
            fancy,
            "Registered term meta field"
        );
        Ok(ui)
    }

    #[must_use]
    pub const fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    #[must_use]
    pub const fn identity(&self) -> &FieldIdentity {
        &self.identity
    }

    #[must_use]
    pub fn meta_key(&self) -> &str {
        self.spec.meta_key().as_str()
    }

    #[must_use]
    pub const fn is_fancy(&self) -> bool {
        self.spec.fancy
    }

    fn handler_id(&self, name: &str) -> String {
        format!("{}::{name}", self.spec.meta_key())
    }

    fn subscribe(self: &Arc<Self>, hooks: &HookRegistry, request: &Request, taxonomies: &[String]) -> Result<()> {
        // Queries
        for hook in [Hook::CreateTerm, Hook::EditTerm] {
            let this = Arc::clone(self);
            hooks.add(
                hook,
                self.handler_id("save_meta"),
                Handler::term(move |term_id, taxonomy, req| this.on_save(term_id, taxonomy, req)),
            )?;
        }

        // Wired on every request so AJAX row refreshes render the column too
        for taxonomy in taxonomies {
            self.subscribe_taxonomy(hooks, taxonomy)?;
        }

        let this = Arc::clone(self);
        hooks.add(
            Hook::ajax(self.spec.ajax_action()),
            self.handler_id("ajax_update"),
            Handler::action(move |_, req, out| this.strategy.ajax_update(&this.spec, req, out)),
        )?;

        if request.wants_admin_hooks() {
            let this = Arc::clone(self);
            hooks.add(
                Hook::AdminInit,
                self.handler_id("admin_init"),
                Handler::action(move |_, _, _| this.admin_init()),
            )?;
            let this = Arc::clone(self);
            hooks.add(
                Hook::LoadEditTags,
                self.handler_id("edit_tags"),
                Handler::action(move |hooks, _, _| this.edit_tags(hooks)),
            )?;
        } else {
            debug!(meta_key = %self.spec.meta_key(), "Skipping admin-only hooks");
        }

        Ok(())
    }

    fn subscribe_taxonomy(self: &Arc<Self>, hooks: &HookRegistry, taxonomy: &str) -> Result<()> {
        let this = Arc::clone(self);
        hooks.add(
            Hook::manage_columns(taxonomy),
            self.handler_id("add_column_header"),
            Handler::columns(move |columns| this.add_column_header(columns)),
        )?;

        let this = Arc::clone(self);
        hooks.add(
            Hook::custom_column(taxonomy),
            self.handler_id("add_column_value"),
            Handler::cell(move |prior, cell, req, out| this.add_column_value(prior, cell, req, out)),
        )?;

        let this = Arc::clone(self);
        hooks.add(
            Hook::sortable_columns(taxonomy),
            self.handler_id("sortable_columns"),
            Handler::columns(move |columns| this.sortable_columns(columns)),
        )?;

        let this = Arc::clone(self);
        hooks.add(
            Hook::add_form_fields(taxonomy),
            self.handler_id("add_form_field"),
            Handler::form(move |_, _, out| {
                this.add_form_field(out);
                Ok(())
            }),
        )?;

        let this = Arc::clone(self);
        hooks.add(
            Hook::edit_form_fields(taxonomy),
            self.handler_id("edit_form_field"),
            Handler::form(move |term, _, out| this.edit_form_field(term, out)),
        )?;

        Ok(())
    }

    /// Admin bootstrap: bring the recorded schema version up to date
    ///
    /// # Errors
    /// Propagates option store and upgrade step failures.
    pub fn admin_init(&self) -> Result<()> {
        self.maybe_upgrade_database().map(|_| ())
    }

    /// Term screen bootstrap: wire assets, help, head markup and quick edit
    ///
    /// # Errors
    /// Propagates registration failures.
    pub fn edit_tags(self: &Arc<Self>, hooks: &HookRegistry) -> Result<()> {
        let this = Arc::clone(self);
        hooks.add(
            Hook::AdminEnqueueScripts,
            self.handler_id("enqueue_scripts"),
            Handler::action(move |_, _, out| this.strategy.enqueue_scripts(&this.identity, out)),
        )?;

        let this = Arc::clone(self);
        hooks.add(
            Hook::AdminHead,
            self.handler_id("help_tabs"),
            Handler::action(move |_, _, out| this.strategy.help_tabs(&this.spec, out)),
        )?;

        let this = Arc::clone(self);
        hooks.add(
            Hook::AdminHead,
            self.handler_id("admin_head"),
            Handler::action(move |_, _, out| this.strategy.admin_head(&this.spec, out)),
        )?;

        let this = Arc::clone(self);
        hooks.add(
            Hook::QuickEditCustomBox,
            self.handler_id("quick_edit_meta"),
            Handler::quick_edit(move |quick_edit, _, out| this.quick_edit_meta(quick_edit, out)),
        )?;

        debug!(meta_key = %self.spec.meta_key(), "Wired term screen hooks");
        Ok(())
    }
}
