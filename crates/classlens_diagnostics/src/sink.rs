//! Collects the diagnostics of one stylesheet parse.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Where the parser reports malformed rules.
///
/// Emitting takes `&self`, so a sink can be handed to the parser by shared
/// reference and to several parses at once. Errors are counted as they
/// arrive; the count is not reset by [`take_all`](Self::take_all).
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    errors: AtomicUsize,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            errors: AtomicUsize::new(0),
        }
    }

    /// Records one diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        self.count(&diag);
        self.entries().push(diag);
    }

    /// Records several diagnostics in order, under a single lock.
    pub fn extend(&self, diags: impl IntoIterator<Item = Diagnostic>) {
        let mut entries = self.entries();
        for diag in diags {
            self.count(&diag);
            entries.push(diag);
        }
    }

    /// Number of error-severity diagnostics recorded so far.
    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }

    /// Drains the recorded diagnostics.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries())
    }

    /// Copies the recorded diagnostics, leaving them in place.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.entries().clone()
    }

    fn count(&self, diag: &Diagnostic) {
        if diag.severity == Severity::Error {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    // A panic while holding the lock cannot leave a half-pushed vector.
    fn entries(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}
