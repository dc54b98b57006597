//! Explicit request context
//!
//! Posted form fields, query-string parameters, the current admin screen and
//! the AJAX action of the request being handled. Handlers receive it by
//! reference instead of reading ambient request state.

use std::collections::HashMap;

/// AJAX action the host fires when a quick-edit row is saved
pub const INLINE_SAVE_TAX: &str = "inline-save-tax";

/// Screen id of the term list screen
pub const EDIT_TAGS_SCREEN: &str = "edit-tags";

/// Query parameter carrying the taxonomy of a term screen
pub const TAXONOMY_PARAM: &str = "taxonomy";

/// One admin or AJAX request
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Request {
    post: HashMap<String, String>,
    query: HashMap<String, String>,
    screen: Option<String>,
    blog_admin: bool,
    ajax_action: Option<String>,
}

impl Request {
    /// A request outside the admin area
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A blog-admin page request
    #[must_use]
    pub fn admin() -> Self {
        Self {
            blog_admin: true,
            ..Self::default()
        }
    }

    /// An AJAX request running `action`
    #[must_use]
    pub fn ajax(action: impl Into<String>) -> Self {
        Self {
            ajax_action: Some(action.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_post(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.post.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Set the `taxonomy` query parameter
    #[must_use]
    pub fn with_taxonomy(self, taxonomy: impl Into<String>) -> Self {
        self.with_query(TAXONOMY_PARAM, taxonomy)
    }

    #[must_use]
    pub fn with_screen(mut self, screen: impl Into<String>) -> Self {
        self.screen = Some(screen.into());
        self
    }

    /// A posted form field
    #[must_use]
    pub fn posted(&self, name: &str) -> Option<&str> {
        self.post.get(name).map(String::as_str)
    }

    /// A query-string parameter
    #[must_use]
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// The `taxonomy` query parameter, if present and non-empty
    #[must_use]
    pub fn taxonomy(&self) -> Option<&str> {
        self.query(TAXONOMY_PARAM).filter(|t| !t.is_empty())
    }

    #[must_use]
    pub fn screen(&self) -> Option<&str> {
        self.screen.as_deref()
    }

    #[must_use]
    pub const fn is_blog_admin(&self) -> bool {
        self.blog_admin
    }

    /// Whether this is the AJAX request running `action`
    #[must_use]
    pub fn doing_ajax(&self, action: &str) -> bool {
        self.ajax_action.as_deref() == Some(action)
    }

    /// Admin-only wiring applies to blog-admin pages and quick-edit saves
    #[must_use]
    pub fn wants_admin_hooks(&self) -> bool {
        self.is_blog_admin() || self.doing_ajax(INLINE_SAVE_TAX)
    }
}
