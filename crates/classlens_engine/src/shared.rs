//! A thread-shareable engine.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use classlens_diagnostics::Diagnostic;

use crate::aggregate::Completions;
use crate::engine::Engine;

/// An [`Engine`] behind one mutex, for hosts that query from several threads.
///
/// Every call holds the lock for its whole duration, so queries and
/// invalidations are serialized.
#[derive(Default)]
pub struct SharedEngine {
    inner: Mutex<Engine>,
}

impl SharedEngine {
    /// Wraps an engine.
    pub fn new(engine: Engine) -> Self {
        Self {
            inner: Mutex::new(engine),
        }
    }

    /// See [`Engine::query_all`].
    pub fn query_all<P: AsRef<Path>>(&self, paths: &[P]) -> Completions {
        self.lock().query_all(paths)
    }

    /// See [`Engine::query_single_file`].
    pub fn query_single_file(&self, path: impl AsRef<Path>) -> Completions {
        self.lock().query_single_file(path)
    }

    /// See [`Engine::query_all_as_json`].
    pub fn query_all_as_json<P: AsRef<Path>>(&self, paths: &[P]) -> String {
        self.lock().query_all_as_json(paths)
    }

    /// See [`Engine::invalidate_cache`].
    pub fn invalidate_cache(&self) {
        self.lock().invalidate_cache();
    }

    /// See [`Engine::invalidate_file`].
    pub fn invalidate_file(&self, path: impl AsRef<Path>) {
        self.lock().invalidate_file(path);
    }

    /// See [`Engine::diagnostics`].
    pub fn diagnostics(&self, path: impl AsRef<Path>) -> Vec<Diagnostic> {
        self.lock().diagnostics(path)
    }

    /// Locks the engine for a sequence of calls.
    pub fn lock(&self) -> MutexGuard<'_, Engine> {
        // The engine holds no invariant that a panicking query could break
        // halfway, so a poisoned lock is still usable.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
