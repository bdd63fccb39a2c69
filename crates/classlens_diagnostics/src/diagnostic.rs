//! Structured diagnostic messages with severity, codes, and labels.

use crate::code::DiagnosticCode;
use crate::label::Label;
use crate::severity::Severity;
use classlens_source::Span;
use serde::{Deserialize, Serialize};

/// A structured report about a stylesheet that could not be fully indexed.
///
/// Diagnostics never interrupt indexing; they are collected alongside the
/// partial index so a host can show why some classes are missing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The code identifying the kind of problem.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// The primary source span where the problem was detected.
    pub primary_span: Span,
    /// Additional annotated spans providing context.
    pub labels: Vec<Label>,
    /// Explanatory footnotes (e.g., "note: ...").
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self::with_severity(Severity::Error, code, message, span)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self::with_severity(Severity::Warning, code, message, span)
    }

    fn with_severity(
        severity: Severity,
        code: DiagnosticCode,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            primary_span: span,
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Adds a label to this diagnostic.
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::LabelStyle;

    #[test]
    fn create_error() {
        let diag = Diagnostic::error(
            DiagnosticCode::UNCLOSED_BLOCK,
            "block is never closed",
            Span::new(3, 4),
        );
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "block is never closed");
        assert_eq!(format!("{}", diag.code), "E103");
    }

    #[test]
    fn builder_methods() {
        let diag = Diagnostic::warning(
            DiagnosticCode::NESTING_TOO_DEEP,
            "block skipped",
            Span::DUMMY,
        )
        .with_label(Label::secondary(Span::new(0, 6), "outermost group opened here"))
        .with_note("classes inside this block are not indexed");
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.labels.len(), 1);
        assert_eq!(diag.labels[0].style, LabelStyle::Secondary);
        assert_eq!(diag.notes.len(), 1);
    }

    #[test]
    fn serializes_to_json() {
        let diag = Diagnostic::error(
            DiagnosticCode::UNTERMINATED_STRING,
            "unterminated string",
            Span::new(10, 20),
        );
        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"severity\":\"Error\""));
        assert!(json.contains("unterminated string"));
    }
}
