//! Common result and error types for the engine.

/// The standard result type for fallible internal operations.
///
/// `Err` indicates an unrecoverable internal error (a bug in classlens), not a
/// problem with the stylesheets being indexed. Unreadable files and malformed
/// rules degrade to empty or partial results and are reported through
/// diagnostics and logging instead.
pub type EngineResult<T> = Result<T, InternalError>;

/// An internal error indicating a logic bug, not a user input problem.
#[derive(Debug, thiserror::Error)]
#[error("internal engine error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
