//! Ordinal identifier for rules within one stylesheet.

use serde::{Deserialize, Serialize};

/// The position of a rule within its stylesheet, in declaration order.
///
/// Rule ids are dense: the first rule parsed from a file is `RuleId(0)`, the
/// next is `RuleId(1)`, and so on. Ordering rule ids orders rules as authored.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct RuleId(u32);

impl RuleId {
    /// Creates a `RuleId` from a raw ordinal.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw ordinal of this `RuleId`.
    pub fn as_raw(self) -> u32 {
        self.0
    }

    /// Returns the ordinal as a `usize` index into a rule vector.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_as_raw_roundtrip() {
        let id = RuleId::from_raw(42);
        assert_eq!(id.as_raw(), 42);
        assert_eq!(id.index(), 42);
    }

    #[test]
    fn ordering_follows_declaration_order() {
        assert!(RuleId::from_raw(0) < RuleId::from_raw(1));
    }
}
