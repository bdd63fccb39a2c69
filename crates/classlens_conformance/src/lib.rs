//! Conformance test helpers for the classlens engine.
//!
//! Provides shared functions that run stylesheet text through the full
//! pipeline (parse, extract, index, aggregate) and return structured results
//! for assertion in integration tests.

#![warn(missing_docs)]

use std::path::{Path, PathBuf};

use classlens_config::ProjectConfig;
use classlens_diagnostics::{Diagnostic, Severity};
use classlens_engine::{Completions, Engine, EngineOptions, MemoryLoader};

/// Result of indexing one or more in-memory stylesheets.
pub struct IndexResult {
    /// Ordered `(class, merged rule text)` pairs.
    pub completions: Completions,
    /// Diagnostics of every file, in file order.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of error-severity diagnostics.
    pub error_count: usize,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
}

impl IndexResult {
    /// Class names in result order.
    pub fn classes(&self) -> Vec<&str> {
        self.completions.iter().map(|(c, _)| c.as_str()).collect()
    }

    /// The merged rule text of `class`, if present.
    pub fn text(&self, class: &str) -> Option<&str> {
        self.completions
            .iter()
            .find(|(c, _)| c == class)
            .map(|(_, t)| t.as_str())
    }
}

/// Indexes a single stylesheet named `test.css`.
pub fn index_css(source: &str) -> IndexResult {
    index_files(&[("test.css", source)])
}

/// Indexes several stylesheets, queried in the given order.
///
/// Each entry in `files` is `(path, source_text)`.
pub fn index_files(files: &[(&str, &str)]) -> IndexResult {
    let (_, mut engine) = engine_with(files);
    let paths: Vec<&str> = files.iter().map(|(path, _)| *path).collect();
    let completions = engine.query_all(&paths);

    let diagnostics: Vec<Diagnostic> = paths
        .iter()
        .flat_map(|path| engine.diagnostics(path))
        .collect();
    let error_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warning_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();

    IndexResult {
        completions,
        diagnostics,
        error_count,
        warning_count,
    }
}

/// Creates an engine over in-memory stylesheets, returning the loader so
/// tests can edit files and count reads.
pub fn engine_with(files: &[(&str, &str)]) -> (MemoryLoader, Engine) {
    let loader = MemoryLoader::new();
    for (path, source) in files {
        loader.set(*path, *source);
    }
    let engine = Engine::with_loader(EngineOptions::default(), loader.clone());
    (loader, engine)
}

/// Returns the path of a file in the `fixtures/` directory.
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

/// Reads a fixture stylesheet.
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).unwrap()
}

/// Creates a minimal `ProjectConfig` listing the given stylesheets.
pub fn make_config(files: &[&str]) -> ProjectConfig {
    let list: Vec<String> = files.iter().map(|f| format!("\"{f}\"")).collect();
    let toml_str = format!(
        r#"
[project]
name = "conformance_test"

[stylesheets]
files = [{files}]
"#,
        files = list.join(", "),
    );
    toml::from_str(&toml_str).unwrap()
}
