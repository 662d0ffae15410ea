//! Element ID generation and management

use crate::{ModelError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Prefix shared by every tree element ID.
pub const ELEMENT_ID_PREFIX: &str = "element-";

/// Unique identifier for an element in the template tree.
///
/// IDs are allocated from a monotonic counter owned by the tree and render
/// as `element-<n>`. A released ID is never handed out again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    /// Create an ElementId from its counter value
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the underlying counter value
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Parse an `element-<n>` string, returning None for anything else
    pub fn parse(s: &str) -> Option<Self> {
        s.strip_prefix(ELEMENT_ID_PREFIX)?
            .parse::<u64>()
            .ok()
            .map(Self)
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", ELEMENT_ID_PREFIX, self.0)
    }
}

impl FromStr for ElementId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| ModelError::InvalidElementId(s.to_string()))
    }
}

impl Serialize for ElementId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ElementId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let id = ElementId::from_raw(42);
        assert_eq!(id.to_string(), "element-42");
        assert_eq!(ElementId::parse("element-42"), Some(id));
        assert_eq!("element-42".parse::<ElementId>().unwrap(), id);
    }

    #[test]
    fn test_rejects_foreign_ids() {
        assert!(ElementId::parse("logo-element").is_none());
        assert!(ElementId::parse("element-").is_none());
        assert!(ElementId::parse("element-x1").is_none());
        assert!("document-title".parse::<ElementId>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let id = ElementId::from_raw(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"element-7\"");
        let back: ElementId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
