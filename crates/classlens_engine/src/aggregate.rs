//! Merging per-file indexes into one ordered completion list.

use classlens_index::PerFileClassIndex;
use indexmap::IndexMap;

/// Ordered `(class name, merged rule text)` pairs.
///
/// Serializes to JSON as an array of two-element arrays.
pub type Completions = Vec<(String, String)>;

/// Placed between rule texts merged under one class.
pub const RULE_SEPARATOR: &str = "\n\n";

/// Accumulates class entries across files.
///
/// An entry is created at the position where its class is first seen. Rule
/// texts found later, in the same file or in later files, are appended to the
/// entry without moving it.
#[derive(Debug, Default)]
pub struct Aggregator {
    entries: IndexMap<String, String>,
}

impl Aggregator {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every class of `index`, in the file's first-seen order.
    pub fn add_file(&mut self, index: &PerFileClassIndex) {
        for class in index.classes() {
            let texts = index.rule_texts(class.as_str());
            if texts.is_empty() {
                continue;
            }
            let merged = texts.join(RULE_SEPARATOR);
            match self.entries.get_mut(class.as_str()) {
                Some(existing) => {
                    existing.push_str(RULE_SEPARATOR);
                    existing.push_str(&merged);
                }
                None => {
                    self.entries.insert(class.as_str().to_string(), merged);
                }
            }
        }
    }

    /// Number of distinct classes seen so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no class has been added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the aggregator, returning the completions in order.
    pub fn finish(self) -> Completions {
        self.entries.into_iter().collect()
    }
}
