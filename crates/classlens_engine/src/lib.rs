//! The classlens query engine.
//!
//! [`Engine`] answers "which rules reference this class?" across an ordered
//! list of stylesheets. It owns a per-file [`Cache`](classlens_cache::Cache)
//! and merges the per-file indexes into [`Completions`] whose order is the
//! order in which classes first appear, scanning the files left to right.

#![warn(missing_docs)]

pub mod aggregate;
pub mod engine;
pub mod shared;

pub use aggregate::{Aggregator, Completions, RULE_SEPARATOR};
pub use engine::{Engine, EngineOptions};
pub use shared::SharedEngine;

pub use classlens_cache::{
    CacheStats, DiskLoader, FreshnessPolicy, MemoryLoader, Outcome, SourceLoader,
};
