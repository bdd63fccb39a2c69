//! Error types for stylesheet loading.

use std::path::PathBuf;

/// Errors raised while loading a stylesheet.
///
/// The cache never surfaces these to callers: a load error turns the file's
/// entry into a failed, empty index and is logged.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The file could not be opened, read, or stat'ed.
    #[error("cannot read {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The path exists but is not a regular file.
    #[error("{path} is not a file")]
    NotAFile {
        /// The offending path.
        path: PathBuf,
    },

    /// No in-memory source is registered for the path.
    #[error("no source registered for {path}")]
    Missing {
        /// The requested path.
        path: PathBuf,
    },
}

impl CacheError {
    /// Returns the path the error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. } | Self::NotAFile { path } | Self::Missing { path } => path,
        }
    }
}
