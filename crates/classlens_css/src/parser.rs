//! Fault-tolerant scanner that splits stylesheet text into rules.
//!
//! The scanner only understands the brace structure of CSS: it finds each
//! qualified rule's selector list and `{ ... }` block, descends into group
//! at-rules such as `@media`, and skips everything else. Strings, comments,
//! and backslash escapes are skipped as units so delimiters inside them never
//! split a rule.
//!
//! Malformed input never stops the scan. Each problem is reported to the
//! [`DiagnosticSink`], the offending rule is dropped, and scanning resumes at
//! the next point where a rule can start.

use crate::cursor::{Cursor, StringEnd};
use crate::rule::Rule;
use classlens_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Label};
use classlens_source::{RuleId, Span};

/// Group at-rules nested deeper than this are skipped with a warning.
pub const MAX_GROUP_DEPTH: usize = 32;

/// At-rules whose block is a list of ordinary rules.
const GROUP_AT_RULES: &[&str] = &[
    "media",
    "supports",
    "layer",
    "container",
    "document",
    "scope",
    "starting-style",
];

/// Splits stylesheet text into rules in declaration order.
///
/// Rules nested in group at-rules are returned in place, with their own text
/// (the enclosing `@media ... {` is not part of it). Problems are reported to
/// `sink`; the returned rules are everything that could be recovered.
pub fn parse_rules(source: &str, sink: &DiagnosticSink) -> Vec<Rule> {
    let mut parser = RuleParser {
        cursor: Cursor::new(source),
        sink,
        rules: Vec::new(),
    };
    parser.parse_rule_list(0);
    parser.rules
}

/// Returns `true` if an at-rule name (without `@`) introduces a block of rules.
///
/// Matching is case-insensitive and ignores vendor prefixes, so
/// `-moz-document` counts as `document`.
pub fn is_group_at_rule(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    let unprefixed = match name.strip_prefix('-') {
        Some(rest) => rest.find('-').map_or(rest, |dash| &rest[dash + 1..]),
        None => name.as_str(),
    };
    GROUP_AT_RULES.contains(&unprefixed)
}

struct RuleParser<'a> {
    cursor: Cursor<'a>,
    sink: &'a DiagnosticSink,
    rules: Vec<Rule>,
}

/// Where a `{ ... }` block scan stopped.
struct BlockScan {
    /// Offset of the matching `}`, or `None` if the input ended first.
    close: Option<usize>,
    /// An unterminated string was found inside the block.
    malformed: bool,
}

impl RuleParser<'_> {
    fn error(&self, code: DiagnosticCode, msg: &str, span: Span) {
        self.sink.emit(Diagnostic::error(code, msg, span));
    }

    fn unterminated_string(&self, start: usize) {
        let end = self.cursor.pos();
        self.error(
            DiagnosticCode::UNTERMINATED_STRING,
            "unterminated string",
            Span::from_range(start, end),
        );
    }

    fn unterminated_comment(&self, start: usize) {
        self.error(
            DiagnosticCode::UNTERMINATED_COMMENT,
            "comment is never closed",
            Span::from_range(start, start + 2),
        );
    }

    fn skip_trivia(&mut self) {
        if let Some(start) = self.cursor.skip_trivia() {
            self.unterminated_comment(start);
        }
    }

    /// Parses rules until the end of input or, inside a group at-rule, until
    /// the `}` that closes the group.
    ///
    /// Returns `true` if it stopped at a closing `}`, which is left unconsumed.
    fn parse_rule_list(&mut self, depth: usize) -> bool {
        loop {
            self.skip_trivia();
            if self.cursor.is_eof() {
                return false;
            }
            match self.cursor.peek() {
                b'}' if depth > 0 => return true,
                b'}' => {
                    let at = self.cursor.pos();
                    self.error(
                        DiagnosticCode::UNEXPECTED_CLOSE_BRACE,
                        "unexpected `}` with no open block",
                        Span::from_range(at, at + 1),
                    );
                    self.cursor.bump();
                }
                b';' => self.cursor.bump(),
                b'@' => self.parse_at_rule(depth),
                _ if depth == 0 && self.cursor.starts_with(b"<!--") => {
                    self.cursor.set_pos(self.cursor.pos() + 4);
                }
                _ if depth == 0 && self.cursor.starts_with(b"-->") => {
                    self.cursor.set_pos(self.cursor.pos() + 3);
                }
                _ => self.parse_qualified_rule(depth),
            }
        }
    }

    fn parse_qualified_rule(&mut self, depth: usize) {
        let start = self.cursor.pos();
        loop {
            if self.cursor.is_eof() {
                self.error(
                    DiagnosticCode::MISSING_BLOCK,
                    "selector is not followed by a `{` block",
                    Span::from_range(start, self.cursor.len()),
                );
                return;
            }
            match self.cursor.peek() {
                b'{' => break,
                b'"' | b'\'' => {
                    let at = self.cursor.pos();
                    if self.cursor.skip_string() == StringEnd::Unterminated {
                        // The rest of the line is unusable; resume at the newline.
                        self.unterminated_string(at);
                        return;
                    }
                }
                b'/' if self.cursor.at_comment() => {
                    let at = self.cursor.pos();
                    if !self.cursor.skip_comment() {
                        self.unterminated_comment(at);
                    }
                }
                b'\\' => self.cursor.skip_escape(),
                b'}' | b';' => {
                    let at = self.cursor.pos();
                    self.error(
                        DiagnosticCode::MISSING_BLOCK,
                        "selector is not followed by a `{` block",
                        Span::from_range(start, at),
                    );
                    // A `}` inside a group closes the group; leave it for the caller.
                    if depth == 0 || self.cursor.peek() == b';' {
                        self.cursor.bump();
                    }
                    return;
                }
                _ => self.cursor.bump(),
            }
        }

        let open = self.cursor.pos();
        self.cursor.bump();
        let scan = self.scan_block(open);
        let Some(close) = scan.close else {
            return;
        };
        if scan.malformed {
            return;
        }

        let id = RuleId::from_raw(self.rules.len() as u32);
        self.rules.push(Rule {
            id,
            span: Span::from_range(start, close + 1),
            selector: Span::from_range(start, open),
            block: Span::from_range(open + 1, close),
        });
    }

    fn parse_at_rule(&mut self, depth: usize) {
        let start = self.cursor.pos();
        self.cursor.bump();
        let name_start = self.cursor.pos();
        while is_name_byte(self.cursor.peek()) {
            self.cursor.bump();
        }
        let name = &self.cursor.text()[name_start..self.cursor.pos()];

        let mut parens = 0usize;
        loop {
            if self.cursor.is_eof() {
                // A trailing statement at-rule without `;` is harmless.
                return;
            }
            match self.cursor.peek() {
                b'{' => break,
                b';' if parens == 0 => {
                    self.cursor.bump();
                    return;
                }
                b'}' => return,
                b'\\' => self.cursor.skip_escape(),
                b'(' => {
                    parens += 1;
                    self.cursor.bump();
                }
                b')' => {
                    parens = parens.saturating_sub(1);
                    self.cursor.bump();
                }
                b'"' | b'\'' => {
                    let at = self.cursor.pos();
                    if self.cursor.skip_string() == StringEnd::Unterminated {
                        self.unterminated_string(at);
                        return;
                    }
                }
                b'/' if self.cursor.at_comment() => {
                    let at = self.cursor.pos();
                    if !self.cursor.skip_comment() {
                        self.unterminated_comment(at);
                        return;
                    }
                }
                _ => self.cursor.bump(),
            }
        }

        let open = self.cursor.pos();
        self.cursor.bump();

        if !is_group_at_rule(name) {
            tracing::trace!(at_rule = name, "skipping at-rule block");
            self.scan_block(open);
            return;
        }

        if depth + 1 > MAX_GROUP_DEPTH {
            self.sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::NESTING_TOO_DEEP,
                    format!("`@{name}` nested more than {MAX_GROUP_DEPTH} levels deep"),
                    Span::from_range(start, open),
                )
                .with_note("rules inside this block are not indexed"),
            );
            self.scan_block(open);
            return;
        }

        if self.parse_rule_list(depth + 1) {
            self.cursor.bump();
        } else {
            let span = Span::from_range(open, open + 1);
            self.sink.emit(
                Diagnostic::error(
                    DiagnosticCode::UNCLOSED_BLOCK,
                    format!("`@{name}` block is never closed"),
                    span,
                )
                .with_label(Label::primary(span, "opened here")),
            );
        }
    }

    /// Scans a block whose `{` at `open` has been consumed, up to and including
    /// its matching `}`.
    ///
    /// If the input ends first, the block is reported and the cursor moves to
    /// a resume point: just after the last `;`, `{`, or `}` at the block's own
    /// level that precedes the first nested `{`. That is where a rule whose
    /// closing brace was forgotten is most likely followed by the next rule.
    /// Without a nested `{`, scanning resumes at the end of input.
    fn scan_block(&mut self, open: usize) -> BlockScan {
        let mut depth = 1usize;
        let mut malformed = false;
        let mut boundary = self.cursor.pos();
        let mut resume: Option<usize> = None;
        let mut comment_ran_off = false;

        loop {
            if self.cursor.is_eof() {
                let span = Span::from_range(open, open + 1);
                let mut diag = Diagnostic::error(
                    DiagnosticCode::UNCLOSED_BLOCK,
                    "block is never closed",
                    span,
                )
                .with_label(Label::primary(span, "opened here"));
                let resume = if comment_ran_off { None } else { resume };
                if let Some(at) = resume {
                    diag = diag.with_label(Label::secondary(
                        Span::from_range(at, at),
                        "indexing resumes here",
                    ));
                }
                self.sink.emit(diag);
                self.cursor.set_pos(resume.unwrap_or(self.cursor.len()));
                return BlockScan {
                    close: None,
                    malformed,
                };
            }

            match self.cursor.peek() {
                b'"' | b'\'' => {
                    let at = self.cursor.pos();
                    if self.cursor.skip_string() == StringEnd::Unterminated {
                        self.unterminated_string(at);
                        malformed = true;
                    }
                }
                b'/' if self.cursor.at_comment() => {
                    let at = self.cursor.pos();
                    if !self.cursor.skip_comment() {
                        self.unterminated_comment(at);
                        comment_ran_off = true;
                    }
                }
                b'\\' => self.cursor.skip_escape(),
                b'{' => {
                    if depth == 1 && resume.is_none() {
                        resume = Some(boundary);
                    }
                    depth += 1;
                    self.cursor.bump();
                }
                b'}' => {
                    let at = self.cursor.pos();
                    self.cursor.bump();
                    depth -= 1;
                    if depth == 0 {
                        return BlockScan {
                            close: Some(at),
                            malformed,
                        };
                    }
                    if depth == 1 {
                        boundary = self.cursor.pos();
                    }
                }
                b';' => {
                    self.cursor.bump();
                    if depth == 1 {
                        boundary = self.cursor.pos();
                    }
                }
                _ => self.cursor.bump(),
            }
        }
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b >= 0x80
}
