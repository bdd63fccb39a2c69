//! Stylesheet scanning for the classlens indexing engine.
//!
//! [`parse_rules`] splits a stylesheet into [`Rule`]s, recovering from
//! malformed input, and [`extract_classes`] finds the class names each rule's
//! selector list references.

#![warn(missing_docs)]

mod cursor;
pub mod parser;
pub mod rule;
pub mod selector;

pub use parser::{is_group_at_rule, parse_rules, MAX_GROUP_DEPTH};
pub use rule::Rule;
pub use selector::{extract_classes, split_selector_list};
