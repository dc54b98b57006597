use crate::controller::{Host, TermMetaUi};
use crate::hooks::HookRegistry;
use crate::request::Request;
use crate::strategy::{FieldStrategy, PlainText};
use std::sync::Arc;
use termmeta_common::{FieldConfig, Labels, MetaKey, SiteConfig, TaxonomyInfo};
use termmeta_store::MemoryStore;

pub(crate) struct Fixture {
    pub store: Arc<MemoryStore>,
    pub hooks: HookRegistry,
    pub ui: Arc<TermMetaUi>,
}

/// Wraps values in `<mark>` so fancy rendering is observable
pub(crate) struct Highlight;

impl FieldStrategy for Highlight {
    fn format_value(&self, value: &str) -> String {
        format!("<mark>{value}</mark>")
    }
}

pub(crate) fn rank_config(db_version: i64) -> FieldConfig {
    let mut config = FieldConfig::new(
        MetaKey::new("rank").unwrap(),
        Labels::new("Rank", "Ranks").with_description("Position in the league & cup"),
    );
    config.db_version = db_version;
    config.version = "1.2.0".to_string();
    config
}

pub(crate) fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_taxonomies([
        TaxonomyInfo::new("tag", true),
        TaxonomyInfo::new("nav_menu", false),
        TaxonomyInfo::new("genre", true).hierarchical(),
    ]))
}

pub(crate) fn build(
    config: &FieldConfig,
    strategy: Arc<dyn FieldStrategy>,
    hooks: HookRegistry,
    request: &Request,
) -> Fixture {
    let store = store();
    let ui = TermMetaUi::register(
        config,
        &SiteConfig::default(),
        Host::shared(Arc::clone(&store)),
        strategy,
        &hooks,
        request,
    )
    .unwrap();
    Fixture { store, hooks, ui }
}

/// Plain text "rank" field over tag, nav_menu (hidden) and genre
pub(crate) fn fixture(request: &Request) -> Fixture {
    build(&rank_config(2), Arc::new(PlainText), HookRegistry::new(), request)
}

/// Undescribed "rank" field with a highlighting strategy, fancy mode forced
pub(crate) fn fixture_with(fancy: bool) -> Fixture {
    let hooks = HookRegistry::new();
    hooks.add_bool_filter("wp_fancy_term_rank", "test", move |_| fancy);
    let config = FieldConfig::new(MetaKey::new("rank").unwrap(), Labels::new("Rank", "Ranks"));
    build(&config, Arc::new(Highlight), hooks, &Request::admin())
}
