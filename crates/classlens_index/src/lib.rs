//! Per-file class index for the classlens engine.
//!
//! A [`PerFileClassIndex`] owns one stylesheet and maps every class name its
//! selectors mention to the rules that mention it, in declaration order.

#![warn(missing_docs)]

use classlens_common::ClassName;
use classlens_css::{extract_classes, parse_rules, Rule};
use classlens_diagnostics::{Diagnostic, DiagnosticSink};
use classlens_source::{RuleId, SourceFile};
use indexmap::IndexMap;
use std::path::PathBuf;

/// The class-to-rule map of a single stylesheet.
///
/// Classes iterate in the order they are first mentioned in the file. Each
/// class lists its rules in declaration order, and a rule mentioning several
/// classes is listed under each of them. Rule text is sliced from the owned
/// source on demand.
pub struct PerFileClassIndex {
    source: SourceFile,
    rules: Vec<Rule>,
    classes: IndexMap<ClassName, Vec<RuleId>>,
    diagnostics: Vec<Diagnostic>,
}

impl PerFileClassIndex {
    /// Parses `source` and indexes every rule in it.
    ///
    /// Parse problems are emitted into `sink` and also kept with the index.
    pub fn build(source: SourceFile, sink: &DiagnosticSink) -> Self {
        let local = DiagnosticSink::new();
        let rules = parse_rules(&source.content, &local);

        let mut classes: IndexMap<ClassName, Vec<RuleId>> = IndexMap::new();
        for rule in &rules {
            for class in extract_classes(source.snippet(rule.selector)) {
                classes.entry(class).or_default().push(rule.id);
            }
        }

        let diagnostics = local.take_all();
        sink.extend(diagnostics.iter().cloned());

        tracing::debug!(
            path = %source.path.display(),
            rules = rules.len(),
            classes = classes.len(),
            diagnostics = diagnostics.len(),
            "indexed stylesheet"
        );

        Self {
            source,
            rules,
            classes,
            diagnostics,
        }
    }

    /// Creates an index with no rules, standing in for an unreadable file.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            source: SourceFile::empty(path),
            rules: Vec::new(),
            classes: IndexMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Iterates class names in first-seen order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassName> + '_ {
        self.classes.keys()
    }

    /// Returns the rules that mention `class`, in declaration order.
    pub fn rules_for(&self, class: &str) -> &[RuleId] {
        self.classes.get(class).map_or(&[], Vec::as_slice)
    }

    /// Returns the verbatim text of every rule that mentions `class`.
    pub fn rule_texts(&self, class: &str) -> Vec<&str> {
        self.rules_for(class)
            .iter()
            .filter_map(|id| self.rule_text(*id))
            .collect()
    }

    /// Returns the verbatim text of one rule.
    pub fn rule_text(&self, id: RuleId) -> Option<&str> {
        self.rule(id).map(|rule| self.source.snippet(rule.span))
    }

    /// Returns a rule by id.
    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(id.index())
    }

    /// All rules of the file in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of distinct class names.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Number of rules found in the file.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no class names were found.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Diagnostics reported while parsing this file.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The indexed stylesheet.
    pub fn source(&self) -> &SourceFile {
        &self.source
    }
}
