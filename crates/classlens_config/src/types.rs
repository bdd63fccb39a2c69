//! Configuration types deserialized from `classlens.toml`.

use classlens_cache::FreshnessPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The top-level configuration parsed from `classlens.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Project metadata.
    pub project: ProjectMeta,
    /// The stylesheets to index.
    #[serde(default)]
    pub stylesheets: StylesheetConfig,
    /// Cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Directory relative stylesheet paths resolve against. Set by
    /// [`load_config`](crate::load_config) to the config file's directory.
    #[serde(skip)]
    pub root: PathBuf,
}

/// Core project metadata.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
}

/// The `[stylesheets]` section.
#[derive(Debug, Default, Deserialize)]
pub struct StylesheetConfig {
    /// Stylesheet paths in query order. Classes from earlier files come first.
    #[serde(default)]
    pub files: Vec<String>,
}

/// The `[cache]` section.
#[derive(Debug, Default, Deserialize)]
pub struct CacheConfig {
    /// `"metadata"` (the default) re-checks file metadata on every query;
    /// `"manual"` trusts cached files until invalidated.
    #[serde(default)]
    pub freshness: FreshnessPolicy,
}

impl ProjectConfig {
    /// Returns the stylesheet paths, with relative entries joined onto
    /// [`root`](Self::root).
    pub fn stylesheet_paths(&self) -> Vec<PathBuf> {
        self.stylesheets
            .files
            .iter()
            .map(|file| resolve(&self.root, file))
            .collect()
    }
}

fn resolve(root: &Path, file: &str) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(files: &[&str], root: &str) -> ProjectConfig {
        ProjectConfig {
            project: ProjectMeta {
                name: "site".to_string(),
                description: String::new(),
            },
            stylesheets: StylesheetConfig {
                files: files.iter().map(|f| f.to_string()).collect(),
            },
            cache: CacheConfig::default(),
            root: PathBuf::from(root),
        }
    }

    #[test]
    fn relative_paths_join_root() {
        let cfg = config(&["css/app.css"], "/srv/site");
        assert_eq!(
            cfg.stylesheet_paths(),
            vec![PathBuf::from("/srv/site/css/app.css")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn absolute_paths_are_kept() {
        let cfg = config(&["/opt/vendor/base.css"], "/srv/site");
        assert_eq!(
            cfg.stylesheet_paths(),
            vec![PathBuf::from("/opt/vendor/base.css")]
        );
    }

    #[test]
    fn order_is_preserved() {
        let cfg = config(&["b.css", "a.css"], "");
        assert_eq!(
            cfg.stylesheet_paths(),
            vec![PathBuf::from("b.css"), PathBuf::from("a.css")]
        );
    }

    #[test]
    fn default_cache_policy_is_metadata() {
        assert_eq!(CacheConfig::default().freshness, FreshnessPolicy::Metadata);
    }
}
