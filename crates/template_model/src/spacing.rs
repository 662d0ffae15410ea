//! Spacing codec - four-sided box model for margin and padding
//!
//! Boxes are stored as `{top, right, bottom, left}` pixel objects. Older
//! templates stored margin/padding as plain strings such as `"0"`; any string
//! decodes to the all-zero box. Decoding never fails.

use crate::lenient::number_from_value;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Pixel spacing on the four sides of a box
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BoxSpacing {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl BoxSpacing {
    pub const ZERO: BoxSpacing = BoxSpacing {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// Create a box with explicit sides
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    /// Create a box with the same value on every side
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Sides in CSS shorthand order (top, right, bottom, left)
    pub fn sides(&self) -> [f64; 4] {
        [self.top, self.right, self.bottom, self.left]
    }

    /// Render as `"<top>px <right>px <bottom>px <left>px"`
    pub fn to_css(&self) -> String {
        to_css(self)
    }
}

impl<'de> Deserialize<'de> for BoxSpacing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(parse_spacing(Some(&raw)))
    }
}

/// Decode a stored margin/padding value into a box.
///
/// - absent / null / non-object scalars → all-zero
/// - legacy strings, whatever they contain → all-zero
/// - objects → each side read independently, missing or non-numeric sides are 0
pub fn parse_spacing(value: Option<&Value>) -> BoxSpacing {
    match value {
        Some(Value::Object(map)) => {
            let side = |key: &str| map.get(key).and_then(number_from_value).unwrap_or(0.0);
            BoxSpacing::new(side("top"), side("right"), side("bottom"), side("left"))
        }
        Some(Value::String(legacy)) => {
            tracing::debug!(value = %legacy, "Legacy spacing string treated as zero");
            BoxSpacing::ZERO
        }
        _ => BoxSpacing::ZERO,
    }
}

/// Render a box as CSS shorthand in top-right-bottom-left order
pub fn to_css(spacing: &BoxSpacing) -> String {
    let [top, right, bottom, left] = spacing.sides();
    format!("{}px {}px {}px {}px", top, right, bottom, left)
}
