//! Typed lifecycle event dispatcher
//!
//! The host fires named events (term saved, column rendered, admin screen
//! loaded, ...). Each [`Hook`] accepts exactly one [`Handler`] shape, checked
//! at registration. Handlers run synchronously in registration order, and
//! registering the same handler id twice on a hook is a no-op.
//!
//! Handlers are cloned out of the lock before they run, so a handler may
//! register further hooks while being dispatched.

use crate::columns::ColumnSet;
use crate::request::Request;
use derive_more::Display;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use termmeta_common::{Error, MetaKey, Result, Term, TermId};
use tracing::{debug, trace};

/// Generic action: may emit markup and register further hooks
pub type ActionFn = Arc<dyn Fn(&HookRegistry, &Request, &mut String) -> Result<()> + Send + Sync>;
/// Term lifecycle action: `(term_id, taxonomy, request)`
pub type TermFn = Arc<dyn Fn(TermId, &str, &Request) -> Result<()> + Send + Sync>;
/// Column definition filter
pub type ColumnsFn = Arc<dyn Fn(ColumnSet) -> ColumnSet + Send + Sync>;
/// Cell renderer: `(output so far, cell, request, out)`
pub type CellFn =
    Arc<dyn Fn(&str, &ColumnCell<'_>, &Request, &mut String) -> Result<()> + Send + Sync>;
/// Form field renderer; `None` on the add form
pub type FormFn = Arc<dyn Fn(Option<&Term>, &Request, &mut String) -> Result<()> + Send + Sync>;
/// Quick-edit renderer; returns whether it produced a field
pub type QuickEditFn =
    Arc<dyn Fn(&QuickEditBox<'_>, &Request, &mut String) -> Result<bool> + Send + Sync>;
/// Boolean filter
pub type BoolFilterFn = Arc<dyn Fn(bool) -> bool + Send + Sync>;

/// Host lifecycle events
#[derive(Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum Hook {
    #[display("create_term")]
    CreateTerm,
    #[display("edit_term")]
    EditTerm,
    #[display("manage_edit-{taxonomy}_columns")]
    ManageColumns { taxonomy: String },
    #[display("manage_{taxonomy}_custom_column")]
    CustomColumn { taxonomy: String },
    #[display("manage_edit-{taxonomy}_sortable_columns")]
    SortableColumns { taxonomy: String },
    #[display("{taxonomy}_add_form_fields")]
    AddFormFields { taxonomy: String },
    #[display("{taxonomy}_edit_form_fields")]
    EditFormFields { taxonomy: String },
    #[display("wp_{action}")]
    Ajax { action: String },
    #[display("admin_init")]
    AdminInit,
    #[display("load-edit-tags.php")]
    LoadEditTags,
    #[display("admin_enqueue_scripts")]
    AdminEnqueueScripts,
    #[display("admin_head")]
    AdminHead,
    #[display("quick_edit_custom_box")]
    QuickEditCustomBox,
}

impl Hook {
    pub fn manage_columns(taxonomy: impl Into<String>) -> Self {
        Self::ManageColumns { taxonomy: taxonomy.into() }
    }

    pub fn custom_column(taxonomy: impl Into<String>) -> Self {
        Self::CustomColumn { taxonomy: taxonomy.into() }
    }

    pub fn sortable_columns(taxonomy: impl Into<String>) -> Self {
        Self::SortableColumns { taxonomy: taxonomy.into() }
    }

    pub fn add_form_fields(taxonomy: impl Into<String>) -> Self {
        Self::AddFormFields { taxonomy: taxonomy.into() }
    }

    pub fn edit_form_fields(taxonomy: impl Into<String>) -> Self {
        Self::EditFormFields { taxonomy: taxonomy.into() }
    }

    pub fn ajax(action: impl Into<String>) -> Self {
        Self::Ajax { action: action.into() }
    }

    const fn kind(&self) -> HandlerKind {
        match self {
            Self::CreateTerm | Self::EditTerm => HandlerKind::Term,
            Self::ManageColumns { .. } | Self::SortableColumns { .. } => HandlerKind::Columns,
            Self::CustomColumn { .. } => HandlerKind::Cell,
            Self::AddFormFields { .. } | Self::EditFormFields { .. } => HandlerKind::Form,
            Self::QuickEditCustomBox => HandlerKind::QuickEdit,
            Self::Ajax { .. }
            | Self::AdminInit
            | Self::LoadEditTags
            | Self::AdminEnqueueScripts
            | Self::AdminHead => HandlerKind::Action,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HandlerKind {
    Action,
    Term,
    Columns,
    Cell,
    Form,
    QuickEdit,
}

/// A subscribed callback, one variant per hook shape
#[derive(Clone)]
pub enum Handler {
    Action(ActionFn),
    Term(TermFn),
    Columns(ColumnsFn),
    Cell(CellFn),
    Form(FormFn),
    QuickEdit(QuickEditFn),
}

impl Handler {
    pub fn action<F>(f: F) -> Self
    where
        F: Fn(&HookRegistry, &Request, &mut String) -> Result<()> + Send + Sync + 'static,
    {
        Self::Action(Arc::new(f))
    }

    pub fn term<F>(f: F) -> Self
    where
        F: Fn(TermId, &str, &Request) -> Result<()> + Send + Sync + 'static,
    {
        Self::Term(Arc::new(f))
    }

    pub fn columns<F>(f: F) -> Self
    where
        F: Fn(ColumnSet) -> ColumnSet + Send + Sync + 'static,
    {
        Self::Columns(Arc::new(f))
    }

    pub fn cell<F>(f: F) -> Self
    where
        F: Fn(&str, &ColumnCell<'_>, &Request, &mut String) -> Result<()> + Send + Sync + 'static,
    {
        Self::Cell(Arc::new(f))
    }

    pub fn form<F>(f: F) -> Self
    where
        F: Fn(Option<&Term>, &Request, &mut String) -> Result<()> + Send + Sync + 'static,
    {
        Self::Form(Arc::new(f))
    }

    pub fn quick_edit<F>(f: F) -> Self
    where
        F: Fn(&QuickEditBox<'_>, &Request, &mut String) -> Result<bool> + Send + Sync + 'static,
    {
        Self::QuickEdit(Arc::new(f))
    }

    const fn kind(&self) -> HandlerKind {
        match self {
            Self::Action(_) => HandlerKind::Action,
            Self::Term(_) => HandlerKind::Term,
            Self::Columns(_) => HandlerKind::Columns,
            Self::Cell(_) => HandlerKind::Cell,
            Self::Form(_) => HandlerKind::Form,
            Self::QuickEdit(_) => HandlerKind::QuickEdit,
        }
    }
}

/// One list-table cell being rendered
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnCell<'a> {
    pub column_name: &'a str,
    pub term_id: TermId,
    pub taxonomy: &'a str,
}

/// One quick-edit box being rendered
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuickEditBox<'a> {
    pub column_name: &'a str,
    pub screen: &'a str,
    pub taxonomy: &'a str,
}

struct Subscription {
    id: String,
    handler: Handler,
}

/// The host's event dispatcher
#[derive(Default)]
pub struct HookRegistry {
    hooks: RwLock<HashMap<Hook, Vec<Subscription>>>,
    bool_filters: RwLock<HashMap<String, Vec<(String, BoolFilterFn)>>>,
    meta_keys: RwLock<HashSet<String>>,
}

impl HookRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a metadata key for one controller
    ///
    /// # Errors
    /// Returns `Error::DuplicateMetaKey` if another controller holds the key.
    pub fn claim_meta_key(&self, key: &MetaKey) -> Result<()> {
        if self.meta_keys.write().insert(key.to_string()) {
            Ok(())
        } else {
            Err(Error::DuplicateMetaKey(key.to_string()))
        }
    }

    /// Subscribe `handler` to `hook` under `id`.
    ///
    /// Returns `false` when `id` is already subscribed to this hook.
    ///
    /// # Errors
    /// Returns `Error::HandlerMismatch` if the handler shape does not fit the hook.
    pub fn add(&self, hook: Hook, id: impl Into<String>, handler: Handler) -> Result<bool> {
        if hook.kind() != handler.kind() {
            return Err(Error::HandlerMismatch { hook: hook.to_string() });
        }
        let id = id.into();
        let mut hooks = self.hooks.write();
        let subs = hooks.entry(hook).or_default();
        if subs.iter().any(|s| s.id == id) {
            return Ok(false);
        }
        trace!(handler = %id, "Subscribed handler");
        subs.push(Subscription { id, handler });
        Ok(true)
    }

    /// Subscribe a boolean filter; duplicate ids are ignored.
    pub fn add_bool_filter<F>(&self, name: impl Into<String>, id: impl Into<String>, filter: F)
    where
        F: Fn(bool) -> bool + Send + Sync + 'static,
    {
        let id = id.into();
        let filter: BoolFilterFn = Arc::new(filter);
        let mut filters = self.bool_filters.write();
        let subs = filters.entry(name.into()).or_default();
        if !subs.iter().any(|(existing, _)| *existing == id) {
            subs.push((id, filter));
        }
    }

    /// Run `value` through every filter subscribed under `name`
    #[must_use]
    pub fn apply_bool_filter(&self, name: &str, value: bool) -> bool {
        let filters: Vec<BoolFilterFn> = self
            .bool_filters
            .read()
            .get(name)
            .map(|subs| subs.iter().map(|(_, f)| Arc::clone(f)).collect())
            .unwrap_or_default();
        filters.iter().fold(value, |acc, f| f(acc))
    }

    #[must_use]
    pub fn has_hook(&self, hook: &Hook) -> bool {
        self.handler_count(hook) > 0
    }

    #[must_use]
    pub fn handler_count(&self, hook: &Hook) -> usize {
        self.hooks.read().get(hook).map_or(0, Vec::len)
    }

    /// Every hook with at least one subscriber
    #[must_use]
    pub fn hooks(&self) -> Vec<Hook> {
        self.hooks
            .read()
            .iter()
            .filter(|(_, subs)| !subs.is_empty())
            .map(|(hook, _)| hook.clone())
            .collect()
    }

    fn handlers(&self, hook: &Hook) -> Vec<Handler> {
        self.hooks
            .read()
            .get(hook)
            .map(|subs| subs.iter().map(|s| s.handler.clone()).collect())
            .unwrap_or_default()
    }

    /// Fire a generic action, returning the markup its handlers emitted
    ///
    /// # Errors
    /// Propagates the first handler error.
    pub fn do_action(&self, hook: &Hook, request: &Request) -> Result<String> {
        debug!(%hook, "Firing action");
        let mut out = String::new();
        for handler in self.handlers(hook) {
            if let Handler::Action(f) = handler {
                f(self, request, &mut out)?;
            }
        }
        Ok(out)
    }

    /// Fire a term lifecycle action
    ///
    /// # Errors
    /// Propagates the first handler error.
    pub fn do_term_action(&self, hook: &Hook, term_id: TermId, taxonomy: &str, request: &Request) -> Result<()> {
        debug!(%hook, %term_id, taxonomy, "Firing term action");
        for handler in self.handlers(hook) {
            if let Handler::Term(f) = handler {
                f(term_id, taxonomy, request)?;
            }
        }
        Ok(())
    }

    /// Run a column definition filter chain
    #[must_use]
    pub fn apply_columns(&self, hook: &Hook, columns: ColumnSet) -> ColumnSet {
        self.handlers(hook)
            .into_iter()
            .fold(columns, |acc, handler| match handler {
                Handler::Columns(f) => f(acc),
                _ => acc,
            })
    }

    /// Render one custom list-table cell
    ///
    /// Each handler sees the output produced by the handlers before it.
    ///
    /// # Errors
    /// Propagates the first handler error.
    pub fn render_column(&self, cell: &ColumnCell<'_>, request: &Request) -> Result<String> {
        let hook = Hook::custom_column(cell.taxonomy);
        let mut out = String::new();
        for handler in self.handlers(&hook) {
            if let Handler::Cell(f) = handler {
                let prior = out.clone();
                f(&prior, cell, request, &mut out)?;
            }
        }
        Ok(out)
    }

    /// Render the add (`term == None`) or edit form fields of a taxonomy
    ///
    /// # Errors
    /// Propagates the first handler error.
    pub fn render_form(&self, taxonomy: &str, term: Option<&Term>, request: &Request) -> Result<String> {
        let hook = match term {
            Some(_) => Hook::edit_form_fields(taxonomy),
            None => Hook::add_form_fields(taxonomy),
        };
        let mut out = String::new();
        for handler in self.handlers(&hook) {
            if let Handler::Form(f) = handler {
                f(term, request, &mut out)?;
            }
        }
        Ok(out)
    }

    /// Render quick-edit boxes; returns the markup and how many handlers produced a field
    ///
    /// # Errors
    /// Propagates the first handler error.
    pub fn render_quick_edit(&self, quick_edit: &QuickEditBox<'_>, request: &Request) -> Result<(String, usize)> {
        let mut out = String::new();
        let mut produced = 0;
        for handler in self.handlers(&Hook::QuickEditCustomBox) {
            if let Handler::QuickEdit(f) = handler
                && f(quick_edit, request, &mut out)?
            {
                produced += 1;
            }
        }
        Ok((out, produced))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn noop_action() -> Handler {
        Handler::action(|_, _, _| Ok(()))
    }

    #[test]
    fn test_hook_names() {
        assert_eq!(Hook::manage_columns("tag").to_string(), "manage_edit-tag_columns");
        assert_eq!(Hook::custom_column("tag").to_string(), "manage_tag_custom_column");
        assert_eq!(Hook::sortable_columns("genre").to_string(), "manage_edit-genre_sortable_columns");
        assert_eq!(Hook::add_form_fields("tag").to_string(), "tag_add_form_fields");
        assert_eq!(Hook::ajax("ajax_rank_terms").to_string(), "wp_ajax_rank_terms");
        assert_eq!(Hook::LoadEditTags.to_string(), "load-edit-tags.php");
    }

    #[test]
    fn test_add_is_idempotent() {
        let hooks = HookRegistry::new();
        assert!(hooks.add(Hook::AdminInit, "a", noop_action()).unwrap());
        assert!(!hooks.add(Hook::AdminInit, "a", noop_action()).unwrap());
        assert!(hooks.add(Hook::AdminInit, "b", noop_action()).unwrap());
        assert_eq!(hooks.handler_count(&Hook::AdminInit), 2);
    }

    #[test]
    fn test_add_rejects_mismatched_handler() {
        let hooks = HookRegistry::new();
        let result = hooks.add(Hook::CreateTerm, "x", noop_action());
        assert!(matches!(result, Err(Error::HandlerMismatch { .. })));
        assert!(!hooks.has_hook(&Hook::CreateTerm));
    }

    #[test]
    fn test_actions_run_in_order() {
        let hooks = HookRegistry::new();
        for label in ["first", "second"] {
            hooks
                .add(
                    Hook::AdminHead,
                    label,
                    Handler::action(move |_, _, out| {
                        out.push_str(label);
                        Ok(())
                    }),
                )
                .unwrap();
        }
        assert_eq!(hooks.do_action(&Hook::AdminHead, &Request::admin()).unwrap(), "firstsecond");
    }

    #[test]
    fn test_action_can_register_during_dispatch() {
        let hooks = HookRegistry::new();
        hooks
            .add(
                Hook::LoadEditTags,
                "loader",
                Handler::action(|hooks, _, _| {
                    hooks.add(Hook::AdminHead, "late", noop_action())?;
                    Ok(())
                }),
            )
            .unwrap();
        hooks.do_action(&Hook::LoadEditTags, &Request::admin()).unwrap();
        assert!(hooks.has_hook(&Hook::AdminHead));
    }

    #[test]
    fn test_bool_filter_chain() {
        let hooks = HookRegistry::new();
        assert!(hooks.apply_bool_filter("wp_fancy_term_rank", true));
        hooks.add_bool_filter("wp_fancy_term_rank", "off", |_| false);
        hooks.add_bool_filter("wp_fancy_term_rank", "off", |_| true);
        assert!(!hooks.apply_bool_filter("wp_fancy_term_rank", true));
        assert!(hooks.apply_bool_filter("wp_fancy_term_color", true));
    }

    #[test]
    fn test_cell_handlers_see_prior_output() {
        let hooks = HookRegistry::new();
        let seen_prior = Arc::new(AtomicUsize::new(0));
        hooks
            .add(
                Hook::custom_column("tag"),
                "writer",
                Handler::cell(|_, _, _, out| {
                    out.push_str("taken");
                    Ok(())
                }),
            )
            .unwrap();
        let seen = Arc::clone(&seen_prior);
        hooks
            .add(
                Hook::custom_column("tag"),
                "reader",
                Handler::cell(move |prior, _, _, _| {
                    seen.store(prior.len(), Ordering::SeqCst);
                    Ok(())
                }),
            )
            .unwrap();
        let cell = ColumnCell { column_name: "rank", term_id: TermId::new(1), taxonomy: "tag" };
        let out = hooks.render_column(&cell, &Request::admin()).unwrap();
        assert_eq!(out, "taken");
        assert_eq!(seen_prior.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_claim_meta_key() {
        let hooks = HookRegistry::new();
        let key = MetaKey::new("rank").unwrap();
        hooks.claim_meta_key(&key).unwrap();
        assert!(matches!(hooks.claim_meta_key(&key), Err(Error::DuplicateMetaKey(k)) if k == "rank"));
    }
}
