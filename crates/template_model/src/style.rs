//! Style system - style records, keyword enums, and resolution
//!
//! A [`StyleRecord`] is the stored, possibly partial style metadata attached
//! to a tree element or a document field. Resolution turns it into a
//! [`ResolvedStyle`] where every property has a value. Flex properties only
//! survive resolution when `display` is `flex`, so flex layout never leaks onto
//! block-level elements.

use crate::keyword_serde;
use crate::lenient::number_from_value;
use crate::{BoxSpacing, Keyword, StyleDefaults};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// =============================================================================
// Keywords
// =============================================================================

/// CSS display mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Display {
    #[default]
    Block,
    Flex,
    Inline,
    InlineBlock,
}

impl Keyword for Display {
    const KIND: &'static str = "display";
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("block", Self::Block),
        ("flex", Self::Flex),
        ("inline", Self::Inline),
        ("inline-block", Self::InlineBlock),
    ];
}
keyword_serde!(Display);

/// Main-axis alignment for flex containers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum JustifyContent {
    #[default]
    FlexStart,
    FlexEnd,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

impl Keyword for JustifyContent {
    const KIND: &'static str = "justifyContent";
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("flex-start", Self::FlexStart),
        ("flex-end", Self::FlexEnd),
        ("center", Self::Center),
        ("space-between", Self::SpaceBetween),
        ("space-around", Self::SpaceAround),
        ("space-evenly", Self::SpaceEvenly),
    ];
}
keyword_serde!(JustifyContent);

/// Cross-axis alignment for flex containers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AlignItems {
    FlexStart,
    FlexEnd,
    Center,
    #[default]
    Stretch,
    Baseline,
}

impl Keyword for AlignItems {
    const KIND: &'static str = "alignItems";
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("flex-start", Self::FlexStart),
        ("flex-end", Self::FlexEnd),
        ("center", Self::Center),
        ("stretch", Self::Stretch),
        ("baseline", Self::Baseline),
    ];
}
keyword_serde!(AlignItems);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl Keyword for FontWeight {
    const KIND: &'static str = "fontWeight";
    const VARIANTS: &'static [(&'static str, Self)] =
        &[("normal", Self::Normal), ("bold", Self::Bold)];
}
keyword_serde!(FontWeight);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl Keyword for FontStyle {
    const KIND: &'static str = "fontStyle";
    const VARIANTS: &'static [(&'static str, Self)] =
        &[("normal", Self::Normal), ("italic", Self::Italic)];
}
keyword_serde!(FontStyle);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Keyword for TextAlign {
    const KIND: &'static str = "textAlign";
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("left", Self::Left),
        ("center", Self::Center),
        ("right", Self::Right),
        ("justify", Self::Justify),
    ];
}
keyword_serde!(TextAlign);

// =============================================================================
// Style Record
// =============================================================================

/// Flex item sizing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlexSettings {
    pub grow: f64,
    pub shrink: f64,
    pub basis: String,
}

impl Default for FlexSettings {
    fn default() -> Self {
        Self {
            grow: 0.0,
            shrink: 1.0,
            basis: "auto".to_string(),
        }
    }
}

impl FlexSettings {
    /// Read flex settings from a JSON value, defaulting each missing or invalid part
    pub fn from_value(value: &Value) -> Self {
        let defaults = Self::default();
        let Value::Object(map) = value else {
            return defaults;
        };
        Self {
            grow: map.get("grow").and_then(number_from_value).unwrap_or(defaults.grow),
            shrink: map.get("shrink").and_then(number_from_value).unwrap_or(defaults.shrink),
            basis: match map.get("basis") {
                Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
                Some(Value::Number(n)) => format!("{}px", n),
                _ => defaults.basis,
            },
        }
    }
}

impl<'de> Deserialize<'de> for FlexSettings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&raw))
    }
}

/// Stored style metadata for an element or document field.
///
/// Every property is optional; an absent property resolves to its default.
/// Used both as the stored record and as a partial patch (see [`StyleRecord::merge`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<BoxSpacing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<BoxSpacing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flex: Option<FlexSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<Display>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justify_content: Option<JustifyContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align_items: Option<AlignItems>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
}

impl StyleRecord {
    /// Create an empty record (everything resolves to defaults)
    pub fn new() -> Self {
        Self::default()
    }

    /// The fully populated record attached to a newly added tree element
    pub fn element_default(defaults: &StyleDefaults) -> Self {
        Self {
            margin: Some(BoxSpacing::uniform(defaults.element_spacing)),
            padding: Some(BoxSpacing::uniform(defaults.element_spacing)),
            flex: Some(FlexSettings::default()),
            display: Some(Display::Block),
            justify_content: Some(JustifyContent::FlexStart),
            align_items: Some(AlignItems::Stretch),
            ..Default::default()
        }
    }

    /// The record seeded for document fields
    pub fn document_field_default(defaults: &StyleDefaults) -> Self {
        Self {
            margin: Some(BoxSpacing::uniform(defaults.document_field_spacing)),
            padding: Some(BoxSpacing::uniform(defaults.document_field_spacing)),
            display: Some(Display::Block),
            ..Default::default()
        }
    }

    /// Merge another record on top of this one.
    /// Each property present in `other` replaces the whole property in `self`.
    pub fn merge(&self, other: &StyleRecord) -> StyleRecord {
        StyleRecord {
            margin: other.margin.or(self.margin),
            padding: other.padding.or(self.padding),
            flex: other.flex.clone().or_else(|| self.flex.clone()),
            display: other.display.or(self.display),
            justify_content: other.justify_content.or(self.justify_content),
            align_items: other.align_items.or(self.align_items),
            font_weight: other.font_weight.or(self.font_weight),
            font_style: other.font_style.or(self.font_style),
            text_align: other.text_align.or(self.text_align),
        }
    }

    /// Merge a patch into this record in place
    pub fn apply_patch(&mut self, patch: &StyleRecord) {
        *self = self.merge(patch);
    }

    /// Check if all properties are None
    pub fn is_empty(&self) -> bool {
        self.margin.is_none()
            && self.padding.is_none()
            && self.flex.is_none()
            && self.display.is_none()
            && self.justify_content.is_none()
            && self.align_items.is_none()
            && self.font_weight.is_none()
            && self.font_style.is_none()
            && self.text_align.is_none()
    }

    /// Resolve into a fully defaulted style
    pub fn resolve(&self) -> ResolvedStyle {
        resolve_style(self)
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Flex properties of a resolved style. Only present for `display: flex`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFlex {
    pub flex_grow: f64,
    pub flex_shrink: f64,
    pub flex_basis: String,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,
}

/// A render-ready style with every property defaulted
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyle {
    pub margin: BoxSpacing,
    pub padding: BoxSpacing,
    pub display: Display,
    #[serde(flatten)]
    pub flex: Option<ResolvedFlex>,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub text_align: TextAlign,
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        resolve_style(&StyleRecord::default())
    }
}

impl ResolvedStyle {
    /// Convert back into a fully populated record.
    /// Resolving the result yields this style again.
    pub fn to_record(&self) -> StyleRecord {
        StyleRecord {
            margin: Some(self.margin),
            padding: Some(self.padding),
            flex: self.flex.as_ref().map(|flex| FlexSettings {
                grow: flex.flex_grow,
                shrink: flex.flex_shrink,
                basis: flex.flex_basis.clone(),
            }),
            display: Some(self.display),
            justify_content: self.flex.as_ref().map(|flex| flex.justify_content),
            align_items: self.flex.as_ref().map(|flex| flex.align_items),
            font_weight: Some(self.font_weight),
            font_style: Some(self.font_style),
            text_align: Some(self.text_align),
        }
    }

    /// CSS property/value pairs in a stable order
    pub fn to_css_declarations(&self) -> Vec<(&'static str, String)> {
        let mut declarations = vec![
            ("margin", self.margin.to_css()),
            ("padding", self.padding.to_css()),
            ("display", self.display.to_string()),
        ];
        if let Some(flex) = &self.flex {
            declarations.push(("flex-grow", flex.flex_grow.to_string()));
            declarations.push(("flex-shrink", flex.flex_shrink.to_string()));
            declarations.push(("flex-basis", flex.flex_basis.clone()));
            declarations.push(("justify-content", flex.justify_content.to_string()));
            declarations.push(("align-items", flex.align_items.to_string()));
        }
        declarations.push(("font-weight", self.font_weight.to_string()));
        declarations.push(("font-style", self.font_style.to_string()));
        declarations.push(("text-align", self.text_align.to_string()));
        declarations
    }

    /// Render as an inline `style` attribute value
    pub fn to_inline_css(&self) -> String {
        inline_css(&self.to_css_declarations())
    }
}

/// Resolve a style record. Total: every input produces a style.
pub fn resolve_style(record: &StyleRecord) -> ResolvedStyle {
    let display = record.display.unwrap_or_default();
    let flex = (display == Display::Flex).then(|| {
        let settings = record.flex.clone().unwrap_or_default();
        ResolvedFlex {
            flex_grow: settings.grow,
            flex_shrink: settings.shrink,
            flex_basis: settings.basis,
            justify_content: record.justify_content.unwrap_or_default(),
            align_items: record.align_items.unwrap_or_default(),
        }
    });

    ResolvedStyle {
        margin: record.margin.unwrap_or_default(),
        padding: record.padding.unwrap_or_default(),
        display,
        flex,
        font_weight: record.font_weight.unwrap_or_default(),
        font_style: record.font_style.unwrap_or_default(),
        text_align: record.text_align.unwrap_or_default(),
    }
}

/// Resolve the style stored under `field` in a style map; missing entries resolve to defaults
pub fn resolve_field_style(styles: &BTreeMap<String, StyleRecord>, field: &str) -> ResolvedStyle {
    styles.get(field).map(resolve_style).unwrap_or_default()
}

fn inline_css(declarations: &[(&'static str, String)]) -> String {
    declarations
        .iter()
        .map(|(property, value)| format!("{}: {};", property, value))
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// Logo
// =============================================================================

/// Horizontal placement of the document logo
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LogoAlignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Keyword for LogoAlignment {
    const KIND: &'static str = "logoAlignment";
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("left", Self::Left),
        ("center", Self::Center),
        ("right", Self::Right),
    ];
}
keyword_serde!(LogoAlignment);

/// A margin side that is either a pixel length or `auto`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginValue {
    Auto,
    Px(f64),
}

impl std::fmt::Display for MarginValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarginValue::Auto => f.write_str("auto"),
            MarginValue::Px(px) => write!(f, "{}px", px),
        }
    }
}

/// Logo margins, where the horizontal sides may be `auto`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LogoMargin {
    pub top: MarginValue,
    pub right: MarginValue,
    pub bottom: MarginValue,
    pub left: MarginValue,
}

/// Resolved placement style for the logo block
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoStyle {
    pub margin: LogoMargin,
    pub padding: BoxSpacing,
    pub display: Display,
    pub text_align: TextAlign,
}

impl LogoStyle {
    /// CSS property/value pairs in a stable order
    pub fn to_css_declarations(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                "margin",
                format!(
                    "{} {} {} {}",
                    self.margin.top, self.margin.right, self.margin.bottom, self.margin.left
                ),
            ),
            ("padding", self.padding.to_css()),
            ("display", self.display.to_string()),
            ("text-align", self.text_align.to_string()),
        ]
    }

    pub fn to_inline_css(&self) -> String {
        inline_css(&self.to_css_declarations())
    }
}

/// Resolve the logo placement.
///
/// | alignment | left margin | right margin | text |
/// |-----------|-------------|--------------|------|
/// | center    | auto        | auto         | center |
/// | left      | from box    | auto         | left |
/// | right     | auto        | from box     | right |
pub fn resolve_logo_style(alignment: LogoAlignment, margin: BoxSpacing, padding: BoxSpacing) -> LogoStyle {
    let (left, right, text_align) = match alignment {
        LogoAlignment::Center => (MarginValue::Auto, MarginValue::Auto, TextAlign::Center),
        LogoAlignment::Left => (MarginValue::Px(margin.left), MarginValue::Auto, TextAlign::Left),
        LogoAlignment::Right => (MarginValue::Auto, MarginValue::Px(margin.right), TextAlign::Right),
    };

    LogoStyle {
        margin: LogoMargin {
            top: MarginValue::Px(margin.top),
            right,
            bottom: MarginValue::Px(margin.bottom),
            left,
        },
        padding,
        display: Display::Block,
        text_align,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_empty_record_resolves_to_defaults() {
        let resolved = StyleRecord::new().resolve();
        assert_eq!(resolved.margin, BoxSpacing::ZERO);
        assert_eq!(resolved.padding, BoxSpacing::ZERO);
        assert_eq!(resolved.display, Display::Block);
        assert!(resolved.flex.is_none());
        assert_eq!(resolved.text_align, TextAlign::Left);
    }

    #[test]
    fn test_flex_only_applies_under_flex_display() {
        let mut record = StyleRecord::element_default(&StyleDefaults::default());
        record.apply_patch(&StyleRecord {
            display: Some(Display::Flex),
            flex: Some(FlexSettings { grow: 1.0, ..Default::default() }),
            ..Default::default()
        });
        let flex = record.resolve().flex.expect("flex display keeps flex properties");
        assert_eq!(flex.flex_grow, 1.0);
        assert_eq!(flex.flex_shrink, 1.0);
        assert_eq!(flex.flex_basis, "auto");

        record.apply_patch(&StyleRecord {
            display: Some(Display::Block),
            ..Default::default()
        });
        let resolved = record.resolve();
        assert!(resolved.flex.is_none());
        let properties: Vec<_> = resolved.to_css_declarations().into_iter().map(|(p, _)| p).collect();
        assert!(!properties.contains(&"flex-grow"));
        assert!(!properties.contains(&"justify-content"));
    }

    #[test]
    fn test_merge_replaces_whole_property() {
        let base = StyleRecord::element_default(&StyleDefaults::default());
        let patch = StyleRecord {
            margin: Some(BoxSpacing::new(1.0, 0.0, 0.0, 0.0)),
            ..Default::default()
        };
        let merged = base.merge(&patch);
        assert_eq!(merged.margin, Some(BoxSpacing::new(1.0, 0.0, 0.0, 0.0)));
        assert_eq!(merged.padding, base.padding);
        assert_eq!(merged.display, Some(Display::Block));
    }

    #[test]
    fn test_legacy_record_decodes() {
        let record: StyleRecord = serde_json::from_value(json!({
            "margin": "12px",
            "padding": "4px 8px",
            "display": "block",
            "flex": { "grow": "2" },
            "justifyContent": "sideways"
        }))
        .unwrap();
        assert_eq!(record.margin, Some(BoxSpacing::ZERO));
        assert_eq!(record.padding, Some(BoxSpacing::ZERO));
        assert_eq!(record.resolve().margin, BoxSpacing::ZERO);
        assert_eq!(record.flex.as_ref().map(|f| f.grow), Some(2.0));
        assert_eq!(record.justify_content, Some(JustifyContent::FlexStart));
    }

    #[test]
    fn test_keyword_serialization() {
        assert_eq!(serde_json::to_string(&Display::InlineBlock).unwrap(), "\"inline-block\"");
        assert_eq!(serde_json::to_string(&JustifyContent::SpaceBetween).unwrap(), "\"space-between\"");
        let display: Display = serde_json::from_str("\"grid\"").unwrap();
        assert_eq!(display, Display::Block);
    }

    #[test]
    fn test_resolved_style_serializes_flat() {
        let record = StyleRecord {
            display: Some(Display::Flex),
            ..Default::default()
        };
        let value = serde_json::to_value(record.resolve()).unwrap();
        assert_eq!(value["flexGrow"], json!(0.0));
        assert_eq!(value["justifyContent"], json!("flex-start"));

        let value = serde_json::to_value(StyleRecord::new().resolve()).unwrap();
        assert!(value.get("flexGrow").is_none());
    }

    #[test]
    fn test_resolve_field_style_missing_entry() {
        let styles = BTreeMap::new();
        assert_eq!(resolve_field_style(&styles, "date"), ResolvedStyle::default());
    }

    #[test]
    fn test_logo_alignment_table() {
        let margin = BoxSpacing::new(1.0, 2.0, 3.0, 4.0);
        let padding = BoxSpacing::uniform(5.0);

        let center = resolve_logo_style(LogoAlignment::Center, margin, padding);
        assert_eq!(center.margin.left, MarginValue::Auto);
        assert_eq!(center.margin.right, MarginValue::Auto);
        assert_eq!(center.text_align, TextAlign::Center);

        let left = resolve_logo_style(LogoAlignment::Left, margin, padding);
        assert_eq!(left.margin.left, MarginValue::Px(4.0));
        assert_eq!(left.margin.right, MarginValue::Auto);
        assert_eq!(left.text_align, TextAlign::Left);

        let right = resolve_logo_style(LogoAlignment::Right, margin, padding);
        assert_eq!(right.margin.left, MarginValue::Auto);
        assert_eq!(right.margin.right, MarginValue::Px(2.0));
        assert_eq!(right.margin.top, MarginValue::Px(1.0));
        assert_eq!(right.padding, padding);
        assert_eq!(right.to_css_declarations()[0].1, "1px 2px 3px auto");

        assert_eq!(resolve_logo_style(LogoAlignment::Right, margin, padding), right);
    }

    fn arb_display() -> impl Strategy<Value = Display> {
        prop_oneof![
            Just(Display::Block),
            Just(Display::Flex),
            Just(Display::Inline),
            Just(Display::InlineBlock),
        ]
    }

    fn arb_record() -> impl Strategy<Value = StyleRecord> {
        (
            proptest::option::of((0u8..50, 0u8..50)),
            proptest::option::of(arb_display()),
            proptest::option::of((0u8..5, 0u8..5)),
            proptest::option::of(prop_oneof![Just(JustifyContent::Center), Just(JustifyContent::SpaceAround)]),
            proptest::option::of(prop_oneof![Just(TextAlign::Right), Just(TextAlign::Justify)]),
        )
            .prop_map(|(margin, display, flex, justify, text_align)| StyleRecord {
                margin: margin.map(|(v, h)| BoxSpacing::new(v as f64, h as f64, v as f64, h as f64)),
                padding: None,
                flex: flex.map(|(grow, shrink)| FlexSettings {
                    grow: grow as f64,
                    shrink: shrink as f64,
                    basis: "auto".to_string(),
                }),
                display,
                justify_content: justify,
                align_items: None,
                font_weight: None,
                font_style: None,
                text_align,
            })
    }

    proptest! {
        #[test]
        fn resolve_is_idempotent(record in arb_record()) {
            let once = resolve_style(&record);
            let twice = resolve_style(&once.to_record());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn non_flex_never_leaks_flex(record in arb_record()) {
            let resolved = resolve_style(&record);
            prop_assert_eq!(resolved.flex.is_some(), resolved.display == Display::Flex);
        }
    }
}
