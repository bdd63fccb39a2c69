//! File freshness fingerprints.

use std::fs::Metadata;
use std::time::SystemTime;

/// What the cache remembers about a file to decide whether it changed.
///
/// Taken from file metadata alone, so checking freshness never reads the
/// file's contents. A change that keeps both the modification time and the
/// length identical goes unnoticed until the host invalidates the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fingerprint {
    /// Last modification time, if the platform reports one.
    pub modified: Option<SystemTime>,
    /// File length in bytes.
    pub len: u64,
}

impl Fingerprint {
    /// Builds a fingerprint from file metadata.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        }
    }
}
