//! Diagnostic rendering for the terminal.

use crate::diagnostic::Diagnostic;
use crate::label::LabelStyle;
use crate::severity::Severity;
use classlens_source::SourceFile;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic reported against `file`.
    fn render(&self, diag: &Diagnostic, file: &SourceFile) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// error[E103]: block is never closed
///   --> css/app.css:4:6
///   |
/// 4 | .nav {
///   |      ^ opened here
///   |
///   = note: rules after this point are still indexed
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: &str, severity: Severity) -> String {
        if !self.color {
            return text.to_string();
        }
        let ansi = match severity {
            Severity::Error => "\x1b[1;31m",
            Severity::Warning => "\x1b[1;33m",
        };
        format!("{ansi}{text}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic, file: &SourceFile) -> String {
        let mut out = String::new();

        let header = format!("{}[{}]", diag.severity, diag.code);
        out.push_str(&format!(
            "{}: {}\n",
            self.paint(&header, diag.severity),
            diag.message
        ));

        if diag.primary_span.is_dummy() {
            out.push_str(&format!("  --> {}\n", file.path.display()));
        } else {
            let at = file.locate(diag.primary_span.start);
            out.push_str(&format!("  --> {at}\n"));

            let col = at.col;
            let line_num = at.line.to_string();
            let padding = " ".repeat(line_num.len());
            let line_content = file.line_text(diag.primary_span.start);

            // Underline stops at the end of the first line of a multi-line span.
            let remaining = line_content.len().saturating_sub((col as usize) - 1);
            let span_len = (diag.primary_span.len() as usize).clamp(1, remaining.max(1));
            let carets = "^".repeat(span_len);
            let col_padding = " ".repeat((col as usize).saturating_sub(1));

            let primary_msg = diag
                .labels
                .iter()
                .find(|l| l.style == LabelStyle::Primary)
                .map(|l| format!(" {}", l.message))
                .unwrap_or_default();

            out.push_str(&format!("{padding} |\n"));
            out.push_str(&format!("{line_num} | {line_content}\n"));
            out.push_str(&format!("{padding} | {col_padding}{carets}{primary_msg}\n"));

            for label in diag
                .labels
                .iter()
                .filter(|l| l.style == LabelStyle::Secondary && !l.span.is_dummy())
            {
                let at = file.locate(label.span.start);
                out.push_str(&format!("{padding} = {at}: {}\n", label.message));
            }
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }

        out
    }
}
