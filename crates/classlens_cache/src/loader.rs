//! Where stylesheet text comes from.

use crate::error::CacheError;
use crate::fingerprint::Fingerprint;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

/// A source of stylesheet text and freshness fingerprints.
pub trait SourceLoader {
    /// Returns the current fingerprint of `path` without reading its contents.
    fn fingerprint(&self, path: &Path) -> Result<Fingerprint, CacheError>;

    /// Reads the full UTF-8 text of `path`.
    fn read(&self, path: &Path) -> Result<String, CacheError>;
}

/// Loads stylesheets from the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiskLoader;

impl SourceLoader for DiskLoader {
    fn fingerprint(&self, path: &Path) -> Result<Fingerprint, CacheError> {
        let metadata = std::fs::metadata(path).map_err(|e| CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        if !metadata.is_file() {
            return Err(CacheError::NotAFile {
                path: path.to_path_buf(),
            });
        }
        Ok(Fingerprint::from_metadata(&metadata))
    }

    fn read(&self, path: &Path) -> Result<String, CacheError> {
        if path.is_dir() {
            return Err(CacheError::NotAFile {
                path: path.to_path_buf(),
            });
        }
        std::fs::read_to_string(path).map_err(|e| CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// An in-memory loader, for hosts that index unsaved editor buffers.
///
/// Clones share the same sources. Every [`set`](Self::set) gives the path a
/// new fingerprint, and every read is counted.
#[derive(Clone, Debug, Default)]
pub struct MemoryLoader {
    inner: Arc<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    sources: Mutex<HashMap<PathBuf, MemorySource>>,
    version: AtomicUsize,
    reads: AtomicUsize,
}

#[derive(Debug)]
struct MemorySource {
    text: String,
    version: usize,
    reads: usize,
}

impl MemoryLoader {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces the text of `path`.
    pub fn set(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        let path = path.into();
        let version = self.inner.version.fetch_add(1, Ordering::Relaxed) + 1;
        let mut sources = self.sources();
        let reads = sources.get(&path).map_or(0, |s| s.reads);
        sources.insert(
            path,
            MemorySource {
                text: text.into(),
                version,
                reads,
            },
        );
    }

    /// Removes `path`, so later reads fail as if the file were deleted.
    pub fn remove(&self, path: &Path) {
        self.sources().remove(path);
    }

    /// Total number of successful and failed reads.
    pub fn reads(&self) -> usize {
        self.inner.reads.load(Ordering::Relaxed)
    }

    /// Number of successful reads of `path`.
    pub fn reads_of(&self, path: &Path) -> usize {
        self.sources().get(path).map_or(0, |s| s.reads)
    }

    fn sources(&self) -> MutexGuard<'_, HashMap<PathBuf, MemorySource>> {
        self.inner
            .sources
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SourceLoader for MemoryLoader {
    fn fingerprint(&self, path: &Path) -> Result<Fingerprint, CacheError> {
        let sources = self.sources();
        let source = sources.get(path).ok_or_else(|| CacheError::Missing {
            path: path.to_path_buf(),
        })?;
        Ok(Fingerprint {
            modified: Some(SystemTime::UNIX_EPOCH + Duration::from_nanos(source.version as u64)),
            len: source.text.len() as u64,
        })
    }

    fn read(&self, path: &Path) -> Result<String, CacheError> {
        self.inner.reads.fetch_add(1, Ordering::Relaxed);
        let mut sources = self.sources();
        let source = sources.get_mut(path).ok_or_else(|| CacheError::Missing {
            path: path.to_path_buf(),
        })?;
        source.reads += 1;
        Ok(source.text.clone())
    }
}
