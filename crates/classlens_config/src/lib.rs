//! Parsing and validation of `classlens.toml` project configuration files.
//!
//! The configuration names the stylesheets a project indexes, in query
//! order, and how the engine's cache checks them for changes.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{discover_config, load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
