//! Stylesheet text with line-start indexing for fast line/column lookup.

use crate::location::Location;
use crate::span::Span;
use classlens_common::ContentHash;
use std::path::{Path, PathBuf};

/// One stylesheet loaded into the engine.
///
/// Stores the file's text along with precomputed line-start offsets for
/// diagnostic rendering and the content hash used to recognize unchanged
/// text after a reload.
pub struct SourceFile {
    /// The filesystem path of this file (or a synthetic name for in-memory sources).
    pub path: PathBuf,
    /// The full text content of the file.
    pub content: String,
    /// Byte offsets of each line start (the first entry is always 0).
    line_starts: Vec<u32>,
    /// Hash of the file content.
    pub content_hash: ContentHash,
}

impl SourceFile {
    /// Creates a new `SourceFile` with precomputed line starts and content hash.
    pub fn new(path: impl Into<PathBuf>, content: String) -> Self {
        let line_starts = compute_line_starts(&content);
        let content_hash = ContentHash::from_text(&content);
        Self {
            path: path.into(),
            content,
            line_starts,
            content_hash,
        }
    }

    /// Creates an empty source standing in for a file that could not be read.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self::new(path, String::new())
    }

    /// Returns the path of this file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Converts a byte offset into 1-indexed (line, column) coordinates.
    ///
    /// Columns count bytes, matching how spans are measured.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line = (line_idx as u32) + 1;
        let col = byte_offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Locates a byte offset for display.
    pub fn locate(&self, byte_offset: u32) -> Location<'_> {
        let (line, col) = self.line_col(byte_offset);
        Location {
            path: &self.path,
            line,
            col,
        }
    }

    /// Returns the text covered by a span.
    pub fn snippet(&self, span: Span) -> &str {
        &self.content[span.range()]
    }

    /// Returns the full line of text containing the given byte offset,
    /// without its trailing newline.
    pub fn line_text(&self, byte_offset: u32) -> &str {
        let (line, _) = self.line_col(byte_offset);
        let start = self.line_starts[(line - 1) as usize] as usize;
        let end = self
            .line_starts
            .get(line as usize)
            .map_or(self.content.len(), |next| *next as usize);
        self.content[start..end].trim_end_matches(['\n', '\r'])
    }
}

/// Computes the byte offsets of each line start in the given content.
fn compute_line_starts(content: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (i, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts
}
