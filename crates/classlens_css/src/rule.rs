//! Rules located by the stylesheet parser.

use classlens_source::{RuleId, Span};

/// One qualified rule: a selector list and its declaration block.
///
/// A rule stores only spans into the stylesheet text. The text itself lives
/// in the owning [`SourceFile`](classlens_source::SourceFile) and is sliced on
/// demand, so a rule shared by several class names is never copied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rule {
    /// Ordinal of this rule within its file.
    pub id: RuleId,
    /// From the first selector character through the closing `}`.
    pub span: Span,
    /// The selector list as authored, up to (not including) the `{`.
    pub selector: Span,
    /// The declaration text between the braces.
    pub block: Span,
}

impl Rule {
    /// Returns the verbatim rule text.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span.range()]
    }

    /// Returns the verbatim selector-list text.
    pub fn selector_text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.selector.range()]
    }

    /// Returns the verbatim declaration-block text.
    pub fn block_text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.block.range()]
    }
}
