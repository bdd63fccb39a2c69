//! `path:line:col` positions for diagnostic headers.

use std::fmt;
use std::path::Path;

/// A byte offset in a stylesheet, as a 1-indexed line and byte column.
///
/// Displays as `path:line:col`. Produced by
/// [`SourceFile::locate`](crate::SourceFile::locate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location<'a> {
    /// The stylesheet the offset belongs to.
    pub path: &'a Path,
    /// Line number, starting at 1.
    pub line: u32,
    /// Byte column within the line, starting at 1.
    pub col: u32,
}

impl fmt::Display for Location<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path.display(), self.line, self.col)
    }
}
