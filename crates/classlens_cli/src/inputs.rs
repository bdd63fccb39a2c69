//! Resolving which stylesheets a command works on.
//!
//! Explicit file arguments win. Without them, the list comes from
//! `classlens.toml`: the file named by `--config`, or the nearest one found
//! walking up from the current directory.

use std::path::{Path, PathBuf};

use classlens_config::ProjectConfig;
use classlens_engine::{Engine, EngineOptions};

use crate::{FilesArgs, GlobalArgs};

/// The stylesheets to query and the engine to query them with.
pub struct Inputs {
    /// Stylesheet paths in query order.
    pub paths: Vec<PathBuf>,
    /// Engine options taken from the config, or defaults.
    pub options: EngineOptions,
}

impl Inputs {
    /// Creates an engine configured for these inputs.
    pub fn engine(&self) -> Engine {
        Engine::with_options(self.options)
    }
}

/// Resolves the inputs of a command.
pub fn resolve(
    args: &FilesArgs,
    global: &GlobalArgs,
) -> Result<Inputs, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    resolve_in(args, global, &cwd)
}

fn resolve_in(
    args: &FilesArgs,
    global: &GlobalArgs,
    cwd: &Path,
) -> Result<Inputs, Box<dyn std::error::Error>> {
    let config = load(global, cwd, args.files.is_empty())?;
    let options = config
        .as_ref()
        .map(|c| EngineOptions {
            freshness: c.cache.freshness,
        })
        .unwrap_or_default();

    let paths = if !args.files.is_empty() {
        args.files.iter().map(PathBuf::from).collect()
    } else {
        let paths = config
            .as_ref()
            .map(ProjectConfig::stylesheet_paths)
            .unwrap_or_default();
        if paths.is_empty() {
            return Err("no stylesheets given and none listed in classlens.toml".into());
        }
        paths
    };

    tracing::debug!(files = paths.len(), "resolved stylesheets");
    Ok(Inputs { paths, options })
}

/// Loads the config. A config named with `--config` must load; a discovered
/// one is only required when no files were given on the command line.
fn load(
    global: &GlobalArgs,
    cwd: &Path,
    required: bool,
) -> Result<Option<ProjectConfig>, Box<dyn std::error::Error>> {
    if let Some(path) = &global.config {
        return Ok(Some(classlens_config::load_config(Path::new(path))?));
    }
    match classlens_config::discover_config(cwd) {
        Some(path) => match classlens_config::load_config(&path) {
            Ok(config) => Ok(Some(config)),
            Err(e) if required => Err(e.into()),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
                Ok(None)
            }
        },
        None if required => Err(format!(
            "no stylesheets given and no {} found",
            classlens_config::CONFIG_FILE_NAME
        )
        .into()),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classlens_engine::FreshnessPolicy;

    fn global(config: Option<String>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            color: false,
            config,
        }
    }

    fn files(list: &[&str]) -> FilesArgs {
        FilesArgs {
            files: list.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn explicit_files_win() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = resolve_in(&files(&["b.css", "a.css"]), &global(None), dir.path()).unwrap();
        assert_eq!(
            inputs.paths,
            vec![PathBuf::from("b.css"), PathBuf::from("a.css")]
        );
        assert_eq!(inputs.options, EngineOptions::default());
    }

    #[test]
    fn config_supplies_files_and_options() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("classlens.toml"),
            "[project]\nname = \"site\"\n\n[stylesheets]\nfiles = [\"css/app.css\"]\n\n[cache]\nfreshness = \"manual\"\n",
        )
        .unwrap();

        let inputs = resolve_in(&files(&[]), &global(None), dir.path()).unwrap();
        assert_eq!(inputs.paths, vec![dir.path().join("css/app.css")]);
        assert_eq!(inputs.options.freshness, FreshnessPolicy::Manual);
    }

    #[test]
    fn explicit_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[project]\nname = \"site\"\n\n[stylesheets]\nfiles = [\"x.css\"]\n",
        )
        .unwrap();

        let other = tempfile::tempdir().unwrap();
        let global = global(Some(path.to_string_lossy().into_owned()));
        let inputs = resolve_in(&files(&[]), &global, other.path()).unwrap();
        assert_eq!(inputs.paths, vec![dir.path().join("x.css")]);
    }

    #[test]
    fn no_files_and_no_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_in(&files(&[]), &global(None), dir.path())
            .err()
            .unwrap();
        assert!(err.to_string().contains("no stylesheets given"));
    }

    #[test]
    fn invalid_discovered_config_is_ignored_with_explicit_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("classlens.toml"), "not toml {{").unwrap();
        let inputs = resolve_in(&files(&["a.css"]), &global(None), dir.path()).unwrap();
        assert_eq!(inputs.paths, vec![PathBuf::from("a.css")]);
    }
}
