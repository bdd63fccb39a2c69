//! Byte-offset ranges within a stylesheet.

use serde::{Deserialize, Serialize};

/// A byte offset range within a stylesheet's text.
///
/// Spans locate rules, selector lists, and diagnostics in the source. The
/// `start` is inclusive and `end` is exclusive. Offsets always fall on UTF-8
/// character boundaries because the parser only splits at ASCII delimiters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the start of the span (inclusive).
    pub start: u32,
    /// Byte offset of the end of the span (exclusive).
    pub end: u32,
}

impl Span {
    /// A dummy span used when no source location is available, such as for
    /// a file that could not be read.
    pub const DUMMY: Span = Span {
        start: u32::MAX,
        end: u32::MAX,
    };

    /// Creates a new span covering `start..end`.
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Creates a span from `usize` offsets as produced by byte scanners.
    pub fn from_range(start: usize, end: usize) -> Self {
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// Returns the length of this span in bytes.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Returns `true` if this span has zero length.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if this is the dummy span.
    pub fn is_dummy(&self) -> bool {
        *self == Span::DUMMY
    }

    /// Returns the span as a `usize` range for slicing.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construct() {
        let s = Span::new(10, 20);
        assert_eq!(s.start, 10);
        assert_eq!(s.end, 20);
        assert_eq!(Span::from_range(10, 20), s);
    }

    #[test]
    fn len_and_empty() {
        let s = Span::new(10, 20);
        assert_eq!(s.len(), 10);
        assert!(!s.is_empty());
        assert!(Span::new(5, 5).is_empty());
    }

    #[test]
    fn dummy_span() {
        assert!(Span::DUMMY.is_dummy());
        assert!(!Span::new(0, 0).is_dummy());
    }

    #[test]
    fn range_slices_text() {
        let text = ".btn { color: red; }";
        assert_eq!(&text[Span::new(0, 4).range()], ".btn");
    }
}
