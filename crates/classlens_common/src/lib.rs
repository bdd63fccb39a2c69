//! Shared foundational types used across the classlens CSS indexing engine.
//!
//! This crate provides content hashing for cache freshness, the normalized
//! [`ClassName`] identifier, and the internal-error result type.

#![warn(missing_docs)]

pub mod class_name;
pub mod hash;
pub mod result;

pub use class_name::ClassName;
pub use hash::ContentHash;
pub use result::{EngineResult, InternalError};
