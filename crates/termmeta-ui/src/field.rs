//! Per-field settings and module identity

use std::path::{Path, PathBuf};
use termmeta_common::{FieldConfig, Labels, MetaKey, SiteConfig};

/// Everything fixed about one metadata field for the life of a request.
///
/// The meta key cannot change after construction; it names the storage
/// slot, the form input, the list-table column and the AJAX action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    meta_key: MetaKey,
    pub labels: Labels,
    /// Markup rendered for terms without a value
    pub no_value: String,
    /// Rich rendering through the field strategy, or plain escaped text
    pub fancy: bool,
    pub db_version_key: String,
    pub db_version: i64,
    pub version: String,
}

impl FieldSpec {
    #[must_use]
    pub fn from_config(config: &FieldConfig, fancy: bool) -> Self {
        Self {
            meta_key: config.meta_key.clone(),
            labels: config.labels.clone(),
            no_value: config.no_value.clone(),
            fancy,
            db_version_key: config.db_version_key(),
            db_version: config.db_version,
            version: config.version.clone(),
        }
    }

    #[must_use]
    pub const fn meta_key(&self) -> &MetaKey {
        &self.meta_key
    }

    /// Posted form field and input id, `term-<key>`
    #[must_use]
    pub fn input_name(&self) -> String {
        self.meta_key.input_name()
    }

    /// AJAX action reserved for this field, `ajax_<key>_terms`
    #[must_use]
    pub fn ajax_action(&self) -> String {
        format!("ajax_{}_terms", self.meta_key)
    }

    /// Filter deciding fancy mode, `wp_fancy_term_<key>`
    #[must_use]
    pub fn fancy_filter_name(meta_key: &MetaKey) -> String {
        format!("wp_fancy_term_{meta_key}")
    }
}

/// Where the module defining a field lives, on disk and on the web
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldIdentity {
    /// Module path as configured
    pub file: PathBuf,
    /// Directory containing the module
    pub path: PathBuf,
    /// Public URL of `path`, with a trailing slash
    pub url: String,
    /// Module path relative to the plugins directory
    pub basename: String,
}

impl FieldIdentity {
    #[must_use]
    pub fn derive(file: &Path, site: &SiteConfig) -> Self {
        let path = file.parent().map(Path::to_path_buf).unwrap_or_default();
        let relative = file.strip_prefix(&site.plugins_dir).map_or_else(
            |_| file.file_name().map(PathBuf::from).unwrap_or_default(),
            Path::to_path_buf,
        );
        let basename = to_slashes(&relative);
        let dir = relative.parent().map(to_slashes).unwrap_or_default();

        let base = site.plugins_url.trim_end_matches('/');
        let url = if dir.is_empty() {
            format!("{base}/")
        } else {
            format!("{base}/{dir}/")
        };

        Self {
            file: file.to_path_buf(),
            path,
            url,
            basename,
        }
    }
}

fn to_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteConfig {
        SiteConfig {
            plugins_dir: PathBuf::from("/srv/site/plugins"),
            plugins_url: "https://example.org/plugins/".to_string(),
        }
    }

    #[test]
    fn test_identity_inside_plugins_dir() {
        let id = FieldIdentity::derive(Path::new("/srv/site/plugins/term-rank/term-rank.php"), &site());
        assert_eq!(id.path, PathBuf::from("/srv/site/plugins/term-rank"));
        assert_eq!(id.basename, "term-rank/term-rank.php");
        assert_eq!(id.url, "https://example.org/plugins/term-rank/");
    }

    #[test]
    fn test_identity_outside_plugins_dir() {
        let id = FieldIdentity::derive(Path::new("/opt/rank.php"), &site());
        assert_eq!(id.basename, "rank.php");
        assert_eq!(id.url, "https://example.org/plugins/");
    }

    #[test]
    fn test_spec_names() {
        let key = MetaKey::new("rank").unwrap();
        let spec = FieldSpec::from_config(&FieldConfig::new(key.clone(), Labels::new("Rank", "Ranks")), true);
        assert_eq!(spec.input_name(), "term-rank");
        assert_eq!(spec.ajax_action(), "ajax_rank_terms");
        assert_eq!(FieldSpec::fancy_filter_name(&key), "wp_fancy_term_rank");
        assert_eq!(spec.db_version_key, "term_meta_rank_db_version");
    }
}
