//! Diagnostic codes with category prefixes for structured error identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Input problems (unreadable files, malformed rules), prefixed with `E`.
    Error,
    /// Intentional skips, prefixed with `W`.
    Warning,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
        }
    }
}

/// A structured diagnostic code combining a category prefix and a number.
///
/// Displayed as the prefix followed by a zero-padded 3-digit number, e.g.
/// `E101` for an unterminated string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// The stylesheet could not be read at all.
    pub const UNREADABLE_FILE: DiagnosticCode = DiagnosticCode::new(Category::Error, 1);
    /// A string literal ran into a newline or the end of input.
    pub const UNTERMINATED_STRING: DiagnosticCode = DiagnosticCode::new(Category::Error, 101);
    /// A `/*` comment was never closed.
    pub const UNTERMINATED_COMMENT: DiagnosticCode = DiagnosticCode::new(Category::Error, 102);
    /// A `{` block reached the end of input before its `}`.
    pub const UNCLOSED_BLOCK: DiagnosticCode = DiagnosticCode::new(Category::Error, 103);
    /// A `}` appeared where no block was open.
    pub const UNEXPECTED_CLOSE_BRACE: DiagnosticCode = DiagnosticCode::new(Category::Error, 104);
    /// Selector text was not followed by a declaration block.
    pub const MISSING_BLOCK: DiagnosticCode = DiagnosticCode::new(Category::Error, 105);
    /// Group at-rules nested past the supported depth were skipped.
    pub const NESTING_TOO_DEEP: DiagnosticCode = DiagnosticCode::new(Category::Warning, 201);

    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}
