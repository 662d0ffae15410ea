//! Selection targets and editor mode

use crate::{ElementId, FieldPath, ModelError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Reserved selection ID for the document logo
pub const LOGO_SELECTION_ID: &str = "logo-element";

/// Prefix of document field selection IDs (`document-<fieldPath>`)
pub const DOCUMENT_SELECTION_PREFIX: &str = "document-";

/// The single thing that can be selected at a time.
///
/// All three kinds share one ID namespace on the wire and are told apart by
/// prefix: `element-<n>`, `logo-element`, `document-<fieldPath>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectionTarget {
    Element(ElementId),
    Logo,
    DocumentField(FieldPath),
}

impl SelectionTarget {
    pub fn parse(s: &str) -> Option<Self> {
        if s == LOGO_SELECTION_ID {
            return Some(SelectionTarget::Logo);
        }
        if let Some(path) = s.strip_prefix(DOCUMENT_SELECTION_PREFIX) {
            return FieldPath::parse(path).map(SelectionTarget::DocumentField);
        }
        ElementId::parse(s).map(SelectionTarget::Element)
    }

    pub fn element_id(&self) -> Option<ElementId> {
        match self {
            SelectionTarget::Element(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<ElementId> for SelectionTarget {
    fn from(id: ElementId) -> Self {
        SelectionTarget::Element(id)
    }
}

impl std::fmt::Display for SelectionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionTarget::Element(id) => write!(f, "{}", id),
            SelectionTarget::Logo => f.write_str(LOGO_SELECTION_ID),
            SelectionTarget::DocumentField(path) => write!(f, "{}{}", DOCUMENT_SELECTION_PREFIX, path),
        }
    }
}

impl FromStr for SelectionTarget {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| ModelError::InvalidSelectionId(s.to_string()))
    }
}

impl Serialize for SelectionTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SelectionTarget {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Whether the template is being edited or previewed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    #[default]
    Edit,
    Preview,
}

impl EditorMode {
    pub fn is_preview(&self) -> bool {
        matches!(self, EditorMode::Preview)
    }

    pub fn from_preview_flag(preview: bool) -> Self {
        if preview {
            EditorMode::Preview
        } else {
            EditorMode::Edit
        }
    }
}
