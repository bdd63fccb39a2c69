//! Per-file index cache for the classlens engine.
//!
//! The [`Cache`] maps stylesheet paths to their [`PerFileClassIndex`]. Each
//! entry remembers the file's [`Fingerprint`] so an unchanged file is served
//! without being read again, and a file that could not be read is remembered
//! as failed until the host invalidates it.
//!
//! [`PerFileClassIndex`]: classlens_index::PerFileClassIndex

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod fingerprint;
pub mod loader;

pub use cache::{Cache, CacheStats, FreshnessPolicy, Outcome};
pub use error::CacheError;
pub use fingerprint::Fingerprint;
pub use loader::{DiskLoader, MemoryLoader, SourceLoader};
