//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::{Path, PathBuf};

/// The configuration file name looked for by [`discover_config`].
pub const CONFIG_FILE_NAME: &str = "classlens.toml";

/// Loads and validates the configuration file at `config_path`.
///
/// Relative stylesheet paths in the file resolve against its directory.
pub fn load_config(config_path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(config_path).map_err(|e| ConfigError::IoError {
        path: config_path.to_path_buf(),
        source: e,
    })?;
    let mut config = load_config_from_str(&content)?;
    config.root = match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok(config)
}

/// Parses and validates a `classlens.toml` from a string.
///
/// The returned config's root is empty, so relative paths stay relative.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Finds `classlens.toml` in `start` or its nearest ancestor.
pub fn discover_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.trim().is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if let Some(pos) = config
        .stylesheets
        .files
        .iter()
        .position(|file| file.trim().is_empty())
    {
        return Err(ConfigError::ValidationError(format!(
            "stylesheets.files[{pos}] is empty"
        )));
    }
    Ok(())
}
