//! Style defaults applied when elements and document fields are created

use serde::{Deserialize, Serialize};

/// Spacing defaults for newly created style records.
///
/// Tree elements and document fields intentionally start from different
/// spacing: new elements get a visible gap, document fields sit flush.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleDefaults {
    /// Margin and padding (px, every side) for newly added tree elements
    pub element_spacing: f64,
    /// Margin and padding (px, every side) for document fields
    pub document_field_spacing: f64,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            element_spacing: 8.0,
            document_field_spacing: 0.0,
        }
    }
}
