//! Diagnostic severity levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How much of the stylesheet a diagnostic cost.
///
/// Ordered from least to most severe by declaration order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// Something was skipped on purpose, such as a block nested too deeply.
    /// No class that the stylesheet defines went missing because of it.
    Warning,
    /// A rule or a whole file could not be indexed.
    Error,
}

impl Severity {
    /// Returns `true` if this severity is [`Error`](Severity::Error).
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}
