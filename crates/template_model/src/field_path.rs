//! Document field paths
//!
//! Paths address document fields with one level of indexing and an optional
//! sub-field: `title`, `addresses[2]`, `sections[0].content`. They are parsed
//! once and the display form doubles as the key in the document style map.

use crate::{ModelError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// A parsed document field path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldPath {
    /// A whole field, e.g. `body`
    Field(String),
    /// One entry of a list field, e.g. `addresses[1]`
    Item { field: String, index: usize },
    /// A member of a list entry, e.g. `sections[0].title`
    ItemField {
        field: String,
        index: usize,
        sub_field: String,
    },
}

fn is_segment(s: &str) -> bool {
    !s.is_empty() && !s.contains(['[', ']', '.']) && !s.contains(char::is_whitespace)
}

impl FieldPath {
    pub fn field(name: impl Into<String>) -> Self {
        FieldPath::Field(name.into())
    }

    pub fn item(name: impl Into<String>, index: usize) -> Self {
        FieldPath::Item {
            field: name.into(),
            index,
        }
    }

    pub fn item_field(name: impl Into<String>, index: usize, sub_field: impl Into<String>) -> Self {
        FieldPath::ItemField {
            field: name.into(),
            index,
            sub_field: sub_field.into(),
        }
    }

    /// Parse `name`, `name[i]` or `name[i].sub`
    pub fn parse(s: &str) -> Option<Self> {
        let Some(open) = s.find('[') else {
            return is_segment(s).then(|| FieldPath::Field(s.to_string()));
        };

        let name = &s[..open];
        let rest = &s[open + 1..];
        let close = rest.find(']')?;
        let digits = &rest[..close];
        if !is_segment(name) || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let index = digits.parse().ok()?;

        match &rest[close + 1..] {
            "" => Some(FieldPath::item(name, index)),
            tail => {
                let sub_field = tail.strip_prefix('.')?;
                is_segment(sub_field).then(|| FieldPath::item_field(name, index, sub_field))
            }
        }
    }

    /// Name of the top-level document field
    pub fn name(&self) -> &str {
        match self {
            FieldPath::Field(field) | FieldPath::Item { field, .. } | FieldPath::ItemField { field, .. } => field,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            FieldPath::Field(_) => None,
            FieldPath::Item { index, .. } | FieldPath::ItemField { index, .. } => Some(*index),
        }
    }

    pub fn sub_field(&self) -> Option<&str> {
        match self {
            FieldPath::ItemField { sub_field, .. } => Some(sub_field),
            _ => None,
        }
    }

    /// The same path pointing at a different list index
    pub fn with_index(&self, index: usize) -> Self {
        match self {
            FieldPath::Field(field) => FieldPath::Field(field.clone()),
            FieldPath::Item { field, .. } => FieldPath::item(field.clone(), index),
            FieldPath::ItemField { field, sub_field, .. } => {
                FieldPath::item_field(field.clone(), index, sub_field.clone())
            }
        }
    }

    /// Paths from the whole field down to this one, outermost first.
    ///
    /// `sections[0].title` yields `sections`, `sections[0]`, `sections[0].title`.
    pub fn ancestry(&self) -> Vec<FieldPath> {
        match self {
            FieldPath::Field(_) => vec![self.clone()],
            FieldPath::Item { field, .. } => vec![FieldPath::Field(field.clone()), self.clone()],
            FieldPath::ItemField { field, index, .. } => vec![
                FieldPath::Field(field.clone()),
                FieldPath::item(field.clone(), *index),
                self.clone(),
            ],
        }
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldPath::Field(field) => f.write_str(field),
            FieldPath::Item { field, index } => write!(f, "{}[{}]", field, index),
            FieldPath::ItemField {
                field,
                index,
                sub_field,
            } => write!(f, "{}[{}].{}", field, index, sub_field),
        }
    }
}

impl FromStr for FieldPath {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| ModelError::InvalidFieldPath(s.to_string()))
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grammar() {
        assert_eq!(FieldPath::parse("title"), Some(FieldPath::field("title")));
        assert_eq!(FieldPath::parse("addresses[2]"), Some(FieldPath::item("addresses", 2)));
        assert_eq!(
            FieldPath::parse("sections[0].content"),
            Some(FieldPath::item_field("sections", 0, "content"))
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "",
            "[0]",
            "addresses[",
            "addresses[]",
            "addresses[-1]",
            "addresses[+1]",
            "addresses[1]x",
            "sections[0].",
            "sections[0].a.b",
            "sections[0][1]",
            "a.b",
            "has space",
        ] {
            assert!(FieldPath::parse(bad).is_none(), "{:?} should not parse", bad);
        }
        assert!(matches!("a.b".parse::<FieldPath>(), Err(ModelError::InvalidFieldPath(_))));
    }

    #[test]
    fn test_display_matches_parse() {
        for raw in ["footer", "listItems[10]", "sections[3].title"] {
            assert_eq!(raw.parse::<FieldPath>().unwrap().to_string(), raw);
        }
    }

    #[test]
    fn test_ancestry_and_with_index() {
        let path = FieldPath::item_field("sections", 1, "title");
        let ancestry: Vec<String> = path.ancestry().iter().map(ToString::to_string).collect();
        assert_eq!(ancestry, ["sections", "sections[1]", "sections[1].title"]);
        assert_eq!(path.with_index(0).to_string(), "sections[0].title");
        assert_eq!(path.name(), "sections");
        assert_eq!(path.index(), Some(1));
        assert_eq!(path.sub_field(), Some("title"));
    }
}
