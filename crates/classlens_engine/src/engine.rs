//! The query façade over the per-file cache.

use std::path::Path;

use classlens_cache::{Cache, CacheStats, FreshnessPolicy, Outcome, SourceLoader};
use classlens_common::{EngineResult, InternalError};
use classlens_diagnostics::Diagnostic;
use classlens_index::PerFileClassIndex;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregator, Completions};

/// Engine construction options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// How cached files are checked for changes.
    pub freshness: FreshnessPolicy,
}

/// Maps class names to the CSS rules that reference them.
///
/// Queries never fail: a file that cannot be read contributes nothing, and a
/// malformed rule is skipped while the rest of its file is still indexed.
pub struct Engine {
    cache: Cache,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates an engine reading stylesheets from disk.
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    /// Creates an engine reading stylesheets from disk with `options`.
    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            cache: Cache::new(options.freshness),
        }
    }

    /// Creates an engine reading stylesheets through `loader`.
    pub fn with_loader(
        options: EngineOptions,
        loader: impl SourceLoader + Send + 'static,
    ) -> Self {
        Self {
            cache: Cache::with_loader(options.freshness, loader),
        }
    }

    /// Returns every class in `paths` with its merged rule text.
    ///
    /// Classes appear in the order they are first seen, scanning the files in
    /// the given order. A class defined in several places gets all of its
    /// rule texts, in that same order, separated by a blank line. A path
    /// listed more than once is only scanned at its first position.
    pub fn query_all<P: AsRef<Path>>(&mut self, paths: &[P]) -> Completions {
        let unique: IndexSet<&Path> = paths.iter().map(AsRef::<Path>::as_ref).collect();
        let mut aggregator = Aggregator::new();
        for path in unique {
            aggregator.add_file(self.cache.get_or_build(path));
        }
        let completions = aggregator.finish();
        tracing::debug!(
            files = paths.len(),
            classes = completions.len(),
            "query complete"
        );
        completions
    }

    /// [`query_all`](Self::query_all) for a single file.
    pub fn query_single_file(&mut self, path: impl AsRef<Path>) -> Completions {
        self.query_all(&[path.as_ref()])
    }

    /// Like [`query_all`](Self::query_all), rendered as a JSON array of
    /// `[class, rule text]` pairs.
    pub fn query_all_as_json<P: AsRef<Path>>(&mut self, paths: &[P]) -> String {
        let completions = self.query_all(paths);
        match to_json(&completions) {
            Ok(json) => json,
            Err(err) => {
                tracing::error!(error = %err, "falling back to an empty result");
                "[]".to_string()
            }
        }
    }

    /// Returns the merged rule text of one class across `paths`.
    pub fn lookup<P: AsRef<Path>>(&mut self, paths: &[P], class: &str) -> Option<String> {
        self.query_all(paths)
            .into_iter()
            .find(|(name, _)| name == class)
            .map(|(_, text)| text)
    }

    /// Drops every cached file.
    pub fn invalidate_cache(&mut self) {
        self.cache.invalidate_all();
    }

    /// Drops one cached file; the next query re-reads it.
    pub fn invalidate_file(&mut self, path: impl AsRef<Path>) {
        self.cache.invalidate_file(path.as_ref());
    }

    /// Diagnostics recorded for a file by the last query that loaded it.
    ///
    /// Empty if the file has not been queried since it was last invalidated.
    pub fn diagnostics(&self, path: impl AsRef<Path>) -> Vec<Diagnostic> {
        self.cache.diagnostics(path.as_ref())
    }

    /// The cached index of a file, if it has been queried.
    pub fn index(&self, path: impl AsRef<Path>) -> Option<&PerFileClassIndex> {
        self.cache.get(path.as_ref())
    }

    /// Whether the last load of a file succeeded.
    pub fn outcome(&self, path: impl AsRef<Path>) -> Option<Outcome> {
        self.cache.outcome(path.as_ref())
    }

    /// Cache activity counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// The underlying cache.
    pub fn cache(&self) -> &Cache {
        &self.cache
    }
}

fn to_json(completions: &Completions) -> EngineResult<String> {
    serde_json::to_string(completions)
        .map_err(|err| InternalError::new(format!("cannot serialize completions: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use classlens_cache::MemoryLoader;

    const SCENARIO: &str = ".a, .b {\n  color: red;\n}\n.b .c {\n  color: blue;\n}";
    const RULE_ONE: &str = ".a, .b {\n  color: red;\n}";
    const RULE_TWO: &str = ".b .c {\n  color: blue;\n}";

    fn engine() -> (MemoryLoader, Engine) {
        let loader = MemoryLoader::new();
        let engine = Engine::with_loader(EngineOptions::default(), loader.clone());
        (loader, engine)
    }

    fn pair(class: &str, text: &str) -> (String, String) {
        (class.to_string(), text.to_string())
    }

    #[test]
    fn concrete_scenario() {
        let (loader, mut engine) = engine();
        loader.set("s.css", SCENARIO);

        assert_eq!(
            engine.query_single_file("s.css"),
            vec![
                pair("a", RULE_ONE),
                pair("b", &format!("{RULE_ONE}\n\n{RULE_TWO}")),
                pair("c", RULE_TWO),
            ]
        );
    }

    #[test]
    fn multi_class_fan_out_shares_text() {
        let (loader, mut engine) = engine();
        loader.set("f.css", ".a, .b { color: red; }");
        let result = engine.query_single_file("f.css");
        assert_eq!(result[0].1, result[1].1);
        assert_eq!(result[0].1, ".a, .b { color: red; }");
    }

    #[test]
    fn aggregate_order_and_merge_across_files() {
        let (loader, mut engine) = engine();
        loader.set("f1.css", ".x { a: 1 }\n.y { b: 2 }");
        loader.set("f2.css", ".z { c: 3 }\n.x { d: 4 }");

        let result = engine.query_all(&["f1.css", "f2.css"]);
        assert_eq!(
            result,
            vec![
                pair("x", ".x { a: 1 }\n\n.x { d: 4 }"),
                pair("y", ".y { b: 2 }"),
                pair("z", ".z { c: 3 }"),
            ]
        );

        let reversed = engine.query_all(&["f2.css", "f1.css"]);
        assert_eq!(reversed[0], pair("z", ".z { c: 3 }"));
        assert_eq!(reversed[1], pair("x", ".x { d: 4 }\n\n.x { a: 1 }"));
    }

    #[test]
    fn no_alphabetical_reordering() {
        let (loader, mut engine) = engine();
        loader.set("f.css", ".zeta {}\n.alpha {}\n.mu {}");
        let names: Vec<String> = engine
            .query_single_file("f.css")
            .into_iter()
            .map(|(c, _)| c)
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mu"]);
    }

    #[test]
    fn repeated_queries_do_not_reread() {
        let (loader, mut engine) = engine();
        loader.set("f1.css", ".a {}");
        loader.set("f2.css", ".b {}");

        let first = engine.query_all(&["f1.css", "f2.css"]);
        let second = engine.query_all(&["f1.css", "f2.css"]);
        assert_eq!(first, second);
        assert_eq!(loader.reads(), 2);
        assert_eq!(engine.cache_stats().hits, 2);
    }

    #[test]
    fn invalidate_file_rereads_only_that_file() {
        let (loader, mut engine) = engine();
        loader.set("f1.css", ".a {}");
        loader.set("f2.css", ".b {}");
        engine.query_all(&["f1.css", "f2.css"]);

        engine.invalidate_file("f1.css");
        engine.query_all(&["f1.css", "f2.css"]);
        assert_eq!(loader.reads_of(Path::new("f1.css")), 2);
        assert_eq!(loader.reads_of(Path::new("f2.css")), 1);
    }

    #[test]
    fn invalidate_cache_rereads_everything() {
        let (loader, mut engine) = engine();
        loader.set("f1.css", ".a, .b {\n  color: red;\n}\n@media print {\n  .b { top: 0 }\n}");
        loader.set("f2.css", ".b .c {\n  color: blue;\n}");
        let first = engine.query_all(&["f1.css", "f2.css"]);
        let first_json = engine.query_all_as_json(&["f1.css", "f2.css"]);

        engine.invalidate_cache();
        let reparsed = engine.query_all(&["f1.css", "f2.css"]);
        assert_eq!(loader.reads(), 4);
        assert_eq!(reparsed, first);

        engine.invalidate_cache();
        assert_eq!(engine.query_all_as_json(&["f1.css", "f2.css"]), first_json);
    }

    #[test]
    fn missing_file_yields_empty_result() {
        let mut engine = Engine::new();
        assert!(engine.query_all(&["/does/not/exist.css"]).is_empty());
        assert_eq!(engine.diagnostics("/does/not/exist.css").len(), 1);
        assert_eq!(engine.outcome("/does/not/exist.css"), Some(Outcome::Failed));
        assert!(engine.index("/does/not/exist.css").is_some_and(PerFileClassIndex::is_empty));
    }

    #[test]
    fn missing_file_does_not_hide_others() {
        let (loader, mut engine) = engine();
        loader.set("ok.css", ".ok {}");
        let result = engine.query_all(&["gone.css", "ok.css"]);
        assert_eq!(result, vec![pair("ok", ".ok {}")]);
    }

    #[test]
    fn duplicate_paths_are_scanned_once() {
        let (loader, mut engine) = engine();
        loader.set("f.css", ".a { top: 0 }");
        let result = engine.query_all(&["f.css", "f.css"]);
        assert_eq!(result, vec![pair("a", ".a { top: 0 }")]);
    }

    #[test]
    fn json_output() {
        let (loader, mut engine) = engine();
        loader.set("f.css", ".a { top: 0 }");
        assert_eq!(
            engine.query_all_as_json(&["f.css"]),
            r#"[["a",".a { top: 0 }"]]"#
        );
        assert_eq!(engine.query_all_as_json(&["none.css"]), "[]");
    }

    #[test]
    fn lookup_single_class() {
        let (loader, mut engine) = engine();
        loader.set("s.css", SCENARIO);
        assert_eq!(
            engine.lookup(&["s.css"], "c").as_deref(),
            Some(RULE_TWO)
        );
        assert_eq!(engine.lookup(&["s.css"], "nope"), None);
    }

    #[test]
    fn parse_errors_do_not_stop_indexing() {
        let (loader, mut engine) = engine();
        loader.set("f.css", ".a { content: \"x\n}\n.b { top: 0 }");
        let result = engine.query_single_file("f.css");
        assert_eq!(result, vec![pair("b", ".b { top: 0 }")]);
        assert!(!engine.diagnostics("f.css").is_empty());
    }

    #[test]
    fn edits_are_picked_up_under_metadata_policy() {
        let (loader, mut engine) = engine();
        loader.set("f.css", ".a {}");
        engine.query_single_file("f.css");
        loader.set("f.css", ".b {}");
        assert_eq!(engine.query_single_file("f.css"), vec![pair("b", ".b {}")]);
    }

    #[test]
    fn manual_policy_waits_for_invalidation() {
        let loader = MemoryLoader::new();
        let options = EngineOptions {
            freshness: FreshnessPolicy::Manual,
        };
        let mut engine = Engine::with_loader(options, loader.clone());
        loader.set("f.css", ".a {}");
        engine.query_single_file("f.css");

        loader.set("f.css", ".b {}");
        assert_eq!(engine.query_single_file("f.css"), vec![pair("a", ".a {}")]);
        engine.invalidate_file("f.css");
        assert_eq!(engine.query_single_file("f.css"), vec![pair("b", ".b {}")]);
    }

    #[test]
    fn disk_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.css");
        std::fs::write(&path, SCENARIO).unwrap();

        let mut engine = Engine::new();
        let result = engine.query_single_file(&path);
        assert_eq!(result.len(), 3);
        assert_eq!(result[2], pair("c", RULE_TWO));
    }
}
