//! Stylesheet source text, byte spans, and rule identifiers.
//!
//! This crate provides [`SourceFile`] for holding one stylesheet's text with a
//! line index, [`Span`] for byte ranges into that text, [`RuleId`] for rule
//! ordinals, and [`Location`] for printing byte offsets as `path:line:col` in
//! diagnostics.

#![warn(missing_docs)]

pub mod location;
pub mod rule_id;
pub mod source_file;
pub mod span;

pub use location::Location;
pub use rule_id::RuleId;
pub use source_file::SourceFile;
pub use span::Span;
