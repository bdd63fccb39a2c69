//! The per-file index cache.
//!
//! Entries are created on first request, replaced when the file's
//! fingerprint changes, and dropped only by explicit invalidation. There is
//! no size or time based eviction.

use std::collections::hash_map::{self, HashMap};
use std::path::{Path, PathBuf};

use classlens_common::ContentHash;
use classlens_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use classlens_index::PerFileClassIndex;
use classlens_source::{SourceFile, Span};
use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::fingerprint::Fingerprint;
use crate::loader::{DiskLoader, SourceLoader};

/// How the cache decides that a stored entry is still current.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FreshnessPolicy {
    /// Compare the file's metadata fingerprint on every request.
    #[default]
    Metadata,
    /// Trust stored entries until the host invalidates them.
    Manual,
}

/// Whether a cached file was indexed or could not be read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// The file was read and indexed.
    Parsed,
    /// The file could not be read; its index is empty.
    Failed,
}

/// Counters describing cache activity since creation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Requests answered from a stored entry.
    pub hits: u64,
    /// Requests that had to load the file.
    pub misses: u64,
    /// Calls to the loader's `read`.
    pub reads: u64,
    /// Reads that failed.
    pub failed_reads: u64,
}

struct CacheEntry {
    fingerprint: Option<Fingerprint>,
    index: PerFileClassIndex,
    failure: Option<Diagnostic>,
}

impl CacheEntry {
    fn parsed(path: &Path, fingerprint: Option<Fingerprint>, text: String) -> Self {
        let source = SourceFile::new(path, text);
        let index = PerFileClassIndex::build(source, &DiagnosticSink::new());
        Self {
            fingerprint,
            index,
            failure: None,
        }
    }

    fn failed(path: &Path, err: &CacheError) -> Self {
        let diagnostic = Diagnostic::error(
            DiagnosticCode::UNREADABLE_FILE,
            "could not read stylesheet",
            Span::DUMMY,
        )
        .with_note(err.to_string());
        Self {
            fingerprint: None,
            index: PerFileClassIndex::empty(path),
            failure: Some(diagnostic),
        }
    }

    fn outcome(&self) -> Outcome {
        if self.failure.is_some() {
            Outcome::Failed
        } else {
            Outcome::Parsed
        }
    }

    fn content_hash(&self) -> Option<ContentHash> {
        match self.outcome() {
            Outcome::Parsed => Some(self.index.source().content_hash),
            Outcome::Failed => None,
        }
    }
}

enum Freshness {
    Fresh,
    /// Carries the fingerprint observed while checking, if any.
    Stale(Option<Fingerprint>),
}

/// Maps stylesheet paths to their class indexes.
pub struct Cache {
    entries: HashMap<PathBuf, CacheEntry>,
    loader: Box<dyn SourceLoader + Send>,
    policy: FreshnessPolicy,
    stats: CacheStats,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new(FreshnessPolicy::default())
    }
}

impl Cache {
    /// Creates an empty cache reading from the filesystem.
    pub fn new(policy: FreshnessPolicy) -> Self {
        Self::with_loader(policy, DiskLoader)
    }

    /// Creates an empty cache reading through `loader`.
    pub fn with_loader(
        policy: FreshnessPolicy,
        loader: impl SourceLoader + Send + 'static,
    ) -> Self {
        Self {
            entries: HashMap::new(),
            loader: Box::new(loader),
            policy,
            stats: CacheStats::default(),
        }
    }

    /// Returns the index of `path`, loading it if there is no current entry.
    ///
    /// A file whose fingerprint is unchanged is served without a read. A file
    /// that changed is read again; if its text hashes to the stored content
    /// hash, the existing index is kept. A file that cannot be read is stored
    /// as an empty, failed index and is not retried until invalidated.
    pub fn get_or_build(&mut self, path: &Path) -> &PerFileClassIndex {
        let freshness = self.freshness(path);
        let Self {
            entries,
            loader,
            stats,
            ..
        } = self;

        let entry = match (entries.entry(path.to_path_buf()), freshness) {
            (hash_map::Entry::Occupied(slot), Freshness::Fresh) => {
                stats.hits += 1;
                tracing::debug!(path = %path.display(), "cache hit");
                slot.into_mut()
            }
            (hash_map::Entry::Occupied(mut slot), Freshness::Stale(fingerprint)) => {
                stats.misses += 1;
                tracing::debug!(path = %path.display(), "cache entry is stale");
                let current = slot.get_mut();
                if let Some(replacement) = reload(loader.as_ref(), stats, path, fingerprint, current)
                {
                    *current = replacement;
                }
                slot.into_mut()
            }
            (hash_map::Entry::Vacant(slot), freshness) => {
                stats.misses += 1;
                tracing::debug!(path = %path.display(), "cache miss");
                let fingerprint = match freshness {
                    Freshness::Stale(fingerprint) => fingerprint,
                    Freshness::Fresh => None,
                };
                slot.insert(load(loader.as_ref(), stats, path, fingerprint))
            }
        };
        &entry.index
    }

    /// Drops every entry.
    pub fn invalidate_all(&mut self) {
        tracing::debug!(entries = self.entries.len(), "invalidating cache");
        self.entries.clear();
    }

    /// Drops the entry of `path`, if any. Other entries are untouched.
    pub fn invalidate_file(&mut self, path: &Path) {
        if self.entries.remove(path).is_some() {
            tracing::debug!(path = %path.display(), "invalidated cache entry");
        }
    }

    /// Returns `true` if `path` has an entry.
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Number of cached files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the cached index of `path` without checking freshness.
    pub fn get(&self, path: &Path) -> Option<&PerFileClassIndex> {
        self.entries.get(path).map(|entry| &entry.index)
    }

    /// The outcome of the cached entry for `path`.
    pub fn outcome(&self, path: &Path) -> Option<Outcome> {
        self.entries.get(path).map(CacheEntry::outcome)
    }

    /// Diagnostics of the cached entry for `path`: the read failure of a
    /// failed entry, or the parse diagnostics of an indexed one.
    pub fn diagnostics(&self, path: &Path) -> Vec<Diagnostic> {
        match self.entries.get(path) {
            Some(CacheEntry {
                failure: Some(diag),
                ..
            }) => vec![diag.clone()],
            Some(entry) => entry.index.diagnostics().to_vec(),
            None => Vec::new(),
        }
    }

    /// Activity counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// The freshness policy in effect.
    pub fn policy(&self) -> FreshnessPolicy {
        self.policy
    }

    fn freshness(&self, path: &Path) -> Freshness {
        let entry = self.entries.get(path);
        if let Some(entry) = entry {
            if entry.outcome() == Outcome::Failed || self.policy == FreshnessPolicy::Manual {
                return Freshness::Fresh;
            }
        }
        if self.policy == FreshnessPolicy::Manual {
            return Freshness::Stale(None);
        }

        let current = self.loader.fingerprint(path).ok();
        match entry {
            Some(entry) if current.is_some() && entry.fingerprint == current => Freshness::Fresh,
            _ => Freshness::Stale(current),
        }
    }
}

fn read(
    loader: &dyn SourceLoader,
    stats: &mut CacheStats,
    path: &Path,
) -> Result<String, CacheError> {
    stats.reads += 1;
    let result = loader.read(path);
    if let Err(err) = &result {
        stats.failed_reads += 1;
        tracing::warn!(path = %path.display(), error = %err, "stylesheet is unreadable");
    }
    result
}

fn load(
    loader: &dyn SourceLoader,
    stats: &mut CacheStats,
    path: &Path,
    fingerprint: Option<Fingerprint>,
) -> CacheEntry {
    match read(loader, stats, path) {
        Ok(text) => CacheEntry::parsed(path, fingerprint, text),
        Err(err) => CacheEntry::failed(path, &err),
    }
}

/// Re-reads a stale entry. Returns `None` when the text is unchanged and
/// `current` was updated in place.
fn reload(
    loader: &dyn SourceLoader,
    stats: &mut CacheStats,
    path: &Path,
    fingerprint: Option<Fingerprint>,
    current: &mut CacheEntry,
) -> Option<CacheEntry> {
    match read(loader, stats, path) {
        Ok(text) if current.content_hash() == Some(ContentHash::from_text(&text)) => {
            tracing::debug!(path = %path.display(), "content unchanged, keeping index");
            current.fingerprint = fingerprint;
            None
        }
        Ok(text) => Some(CacheEntry::parsed(path, fingerprint, text)),
        Err(err) => Some(CacheEntry::failed(path, &err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryLoader;

    fn memory_cache(policy: FreshnessPolicy) -> (MemoryLoader, Cache) {
        let loader = MemoryLoader::new();
        let cache = Cache::with_loader(policy, loader.clone());
        (loader, cache)
    }

    #[test]
    fn first_request_reads_and_indexes() {
        let (loader, mut cache) = memory_cache(FreshnessPolicy::Metadata);
        loader.set("a.css", ".a { top: 0 }");

        let index = cache.get_or_build(Path::new("a.css"));
        assert_eq!(index.rule_texts("a"), vec![".a { top: 0 }"]);
        assert_eq!(loader.reads(), 1);
        assert_eq!(cache.outcome(Path::new("a.css")), Some(Outcome::Parsed));
        assert_eq!(cache.len(), 1);
        assert!(cache.get(Path::new("a.css")).is_some());
        assert!(cache.get(Path::new("b.css")).is_none());
    }

    #[test]
    fn unchanged_file_is_not_reread() {
        let (loader, mut cache) = memory_cache(FreshnessPolicy::Metadata);
        loader.set("a.css", ".a { top: 0 }");

        cache.get_or_build(Path::new("a.css"));
        cache.get_or_build(Path::new("a.css"));
        cache.get_or_build(Path::new("a.css"));

        assert_eq!(loader.reads(), 1);
        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.reads, 1);
    }

    #[test]
    fn changed_file_is_reindexed() {
        let (loader, mut cache) = memory_cache(FreshnessPolicy::Metadata);
        loader.set("a.css", ".a { top: 0 }");
        cache.get_or_build(Path::new("a.css"));

        loader.set("a.css", ".b { top: 0 }");
        let index = cache.get_or_build(Path::new("a.css"));
        assert!(index.rules_for("a").is_empty());
        assert_eq!(index.rules_for("b").len(), 1);
        assert_eq!(loader.reads(), 2);
    }

    #[test]
    fn touched_but_identical_file_keeps_its_index() {
        let (loader, mut cache) = memory_cache(FreshnessPolicy::Metadata);
        loader.set("a.css", ".a { top: 0 }");
        cache.get_or_build(Path::new("a.css"));

        loader.set("a.css", ".a { top: 0 }");
        cache.get_or_build(Path::new("a.css"));
        assert_eq!(loader.reads(), 2);

        // The refreshed fingerprint makes the next request a hit.
        cache.get_or_build(Path::new("a.css"));
        assert_eq!(loader.reads(), 2);
    }

    #[test]
    fn missing_file_is_cached_as_failed() {
        let (loader, mut cache) = memory_cache(FreshnessPolicy::Metadata);
        let path = Path::new("/does/not/exist.css");

        assert!(cache.get_or_build(path).is_empty());
        assert!(cache.get_or_build(path).is_empty());

        assert_eq!(loader.reads(), 1);
        assert_eq!(cache.outcome(path), Some(Outcome::Failed));
        assert_eq!(cache.stats().failed_reads, 1);
        let diags = cache.diagnostics(path);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::UNREADABLE_FILE);
    }

    #[test]
    fn failed_entry_is_retried_after_invalidation() {
        let (loader, mut cache) = memory_cache(FreshnessPolicy::Metadata);
        let path = Path::new("late.css");
        cache.get_or_build(path);

        loader.set(path, ".late {}");
        assert!(cache.get_or_build(path).is_empty());

        cache.invalidate_file(path);
        assert_eq!(cache.get_or_build(path).class_count(), 1);
        assert_eq!(cache.outcome(path), Some(Outcome::Parsed));
    }

    #[test]
    fn deleted_file_becomes_failed() {
        let (loader, mut cache) = memory_cache(FreshnessPolicy::Metadata);
        loader.set("a.css", ".a {}");
        cache.get_or_build(Path::new("a.css"));

        loader.remove(Path::new("a.css"));
        assert!(cache.get_or_build(Path::new("a.css")).is_empty());
        assert_eq!(cache.outcome(Path::new("a.css")), Some(Outcome::Failed));
    }

    #[test]
    fn invalidate_file_is_scoped() {
        let (loader, mut cache) = memory_cache(FreshnessPolicy::Metadata);
        loader.set("a.css", ".a {}");
        loader.set("b.css", ".b {}");
        cache.get_or_build(Path::new("a.css"));
        cache.get_or_build(Path::new("b.css"));

        cache.invalidate_file(Path::new("a.css"));
        assert!(!cache.contains(Path::new("a.css")));
        assert!(cache.contains(Path::new("b.css")));

        cache.get_or_build(Path::new("a.css"));
        cache.get_or_build(Path::new("b.css"));
        assert_eq!(loader.reads_of(Path::new("a.css")), 2);
        assert_eq!(loader.reads_of(Path::new("b.css")), 1);
    }

    #[test]
    fn invalidate_all_drops_everything() {
        let (loader, mut cache) = memory_cache(FreshnessPolicy::Metadata);
        loader.set("a.css", ".a {}");
        cache.get_or_build(Path::new("a.css"));

        cache.invalidate_all();
        assert!(cache.is_empty());
        cache.get_or_build(Path::new("a.css"));
        assert_eq!(loader.reads(), 2);
    }

    #[test]
    fn manual_policy_ignores_changes_until_invalidated() {
        let (loader, mut cache) = memory_cache(FreshnessPolicy::Manual);
        loader.set("a.css", ".a {}");
        cache.get_or_build(Path::new("a.css"));

        loader.set("a.css", ".b {}");
        assert_eq!(cache.get_or_build(Path::new("a.css")).rules_for("a").len(), 1);

        cache.invalidate_file(Path::new("a.css"));
        assert_eq!(cache.get_or_build(Path::new("a.css")).rules_for("b").len(), 1);
    }

    #[test]
    fn parse_diagnostics_are_kept() {
        let (loader, mut cache) = memory_cache(FreshnessPolicy::Metadata);
        loader.set("a.css", "} .a {}");
        cache.get_or_build(Path::new("a.css"));
        let diags = cache.diagnostics(Path::new("a.css"));
        assert_eq!(diags[0].code, DiagnosticCode::UNEXPECTED_CLOSE_BRACE);
        assert!(cache.diagnostics(Path::new("other.css")).is_empty());
    }

    #[test]
    fn disk_cache_picks_up_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.css");
        std::fs::write(&path, ".a { top: 0 }").unwrap();

        let mut cache = Cache::default();
        assert_eq!(cache.get_or_build(&path).class_count(), 1);

        std::fs::write(&path, ".a { top: 0 }\n.b { left: 0 }").unwrap();
        let index = cache.get_or_build(&path);
        assert_eq!(index.class_count(), 2);
        assert_eq!(cache.stats().reads, 2);
    }
}
