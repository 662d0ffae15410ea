//! Document content store
//!
//! The document is the cover-letter/quotation side of a template: a fixed set
//! of text fields, three list fields, the logo, and a style map keyed by field
//! path. Any unknown top-level field is kept verbatim in [`DocumentContent::extra`].

use crate::lenient::{number_from_value, option_number};
use crate::{
    parse_spacing, resolve_logo_style, BoxSpacing, FieldPath, Keyword, LogoAlignment, LogoStyle,
    ModelError, ResolvedStyle, Result, StyleDefaults, StyleRecord,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One titled section of the document body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSection {
    pub title: String,
    pub content: String,
}

impl DocumentSection {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// The list-valued document fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListField {
    Addresses,
    Sections,
    ListItems,
}

impl ListField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListField::Addresses => "addresses",
            ListField::Sections => "sections",
            ListField::ListItems => "listItems",
        }
    }
}

/// Fields seeded with a style record in the canonical document
const CANONICAL_STYLED_FIELDS: &[&str] = &[
    "date",
    "companyName",
    "addresses",
    "accordiaAddress",
    "title",
    "recipient",
    "body",
    "footer",
];

/// Fully populated document content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentContent {
    /// Style records keyed by field path (`body`, `addresses[0]`, `sections[1].title`)
    pub styles: BTreeMap<String, StyleRecord>,
    pub date: String,
    pub company_name: String,
    pub addresses: Vec<String>,
    pub title: String,
    pub recipient: String,
    pub body: String,
    pub sections: Vec<DocumentSection>,
    pub list_items: Vec<String>,
    pub footer: String,
    /// Logo image as a data URI
    pub logo: Option<String>,
    pub logo_alignment: LogoAlignment,
    #[serde(deserialize_with = "option_number")]
    pub logo_width: Option<f64>,
    #[serde(deserialize_with = "option_number")]
    pub logo_height: Option<f64>,
    pub logo_margin: BoxSpacing,
    pub logo_padding: BoxSpacing,
    /// Additional fields not known to the store
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for DocumentContent {
    fn default() -> Self {
        Self::canonical(&StyleDefaults::default())
    }
}

impl DocumentContent {
    /// The sample quotation every new template starts from
    pub fn canonical(defaults: &StyleDefaults) -> Self {
        let styles = CANONICAL_STYLED_FIELDS
            .iter()
            .map(|field| (field.to_string(), StyleRecord::document_field_default(defaults)))
            .collect();

        let mut extra = BTreeMap::new();
        extra.insert(
            "accordiaAddress".to_string(),
            Value::String(
                "ACCORDIA GLOBAL COMPLIANCE GROUP VIETNAM\n\
                 Room 3, Floor 6, No 23B, Road No 3, Block 2, An Khanh Ward\n\
                 Thù Đức, Ho Chi Minh\n\
                 Vietnam"
                    .to_string(),
            ),
        );

        Self {
            styles,
            date: "18/02/2025".to_string(),
            company_name: "matrix pharma 1".to_string(),
            addresses: vec![
                "Vietnam Kon Tum Kon Tum".to_string(),
                "Hung Yên, Hung Yên".to_string(),
                "Vietnam".to_string(),
            ],
            title: "Quotation for SMETA (FULL INITIAL AUDIT) Certification Services".to_string(),
            recipient: "DR Umair".to_string(),
            body: "Thank you for application and considering Accordia Global Compliance Group for your \
                   SMETA (FULL INITIAL AUDIT) audit. You have chosen a premier auditing company with a \
                   strong reputation for competence, integrity and responsiveness to its clients. We are \
                   sure you will agree that our people, audit expertise and our relentless commitment to \
                   exceptional customer service makes us different."
                .to_string(),
            sections: vec![
                DocumentSection::new(
                    "Part 1",
                    "Provides the cost details for your services as well as the length, on days, of your audit",
                ),
                DocumentSection::new("Part 2", "Provides the scope of the audit and site(s) details"),
            ],
            list_items: vec![
                "Pay the audit fee prior to the audit".to_string(),
                "Select accordia Asia on SMETA Database".to_string(),
                "Our scheduler will then contact you for planning onsite audit".to_string(),
            ],
            footer: "This proposal is considered confidential property of Accordia Global Compliance \
                     Group and is intended for the sole use of and is not be shared outside of either \
                     organization"
                .to_string(),
            logo: None,
            logo_alignment: LogoAlignment::Left,
            logo_width: None,
            logo_height: None,
            logo_margin: BoxSpacing::ZERO,
            logo_padding: BoxSpacing::ZERO,
            extra,
        }
    }

    // =========================================================================
    // Field access
    // =========================================================================

    fn text(&self, name: &str) -> Option<&String> {
        match name {
            "date" => Some(&self.date),
            "companyName" => Some(&self.company_name),
            "title" => Some(&self.title),
            "recipient" => Some(&self.recipient),
            "body" => Some(&self.body),
            "footer" => Some(&self.footer),
            _ => None,
        }
    }

    fn text_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "date" => Some(&mut self.date),
            "companyName" => Some(&mut self.company_name),
            "title" => Some(&mut self.title),
            "recipient" => Some(&mut self.recipient),
            "body" => Some(&mut self.body),
            "footer" => Some(&mut self.footer),
            _ => None,
        }
    }

    fn string_list_mut(&mut self, name: &str) -> Option<&mut Vec<String>> {
        match name {
            "addresses" => Some(&mut self.addresses),
            "listItems" => Some(&mut self.list_items),
            _ => None,
        }
    }

    /// Read a field, or `None` when the path does not resolve
    pub fn try_get_field(&self, path: &FieldPath) -> Option<Value> {
        match path {
            FieldPath::Field(name) => self.whole_field(name),
            FieldPath::Item { field, index } => match field.as_str() {
                "addresses" => self.addresses.get(*index).cloned().map(Value::String),
                "listItems" => self.list_items.get(*index).cloned().map(Value::String),
                "sections" => self
                    .sections
                    .get(*index)
                    .and_then(|section| serde_json::to_value(section).ok()),
                other => self.extra.get(other)?.get(*index).cloned(),
            },
            FieldPath::ItemField {
                field,
                index,
                sub_field,
            } => match (field.as_str(), sub_field.as_str()) {
                ("sections", "title") => self.sections.get(*index).map(|s| Value::String(s.title.clone())),
                ("sections", "content") => self.sections.get(*index).map(|s| Value::String(s.content.clone())),
                ("sections", _) => None,
                (other, sub) => self.extra.get(other)?.get(*index)?.get(sub).cloned(),
            },
        }
    }

    fn whole_field(&self, name: &str) -> Option<Value> {
        if let Some(text) = self.text(name) {
            return Some(Value::String(text.clone()));
        }
        let number = |value: Option<f64>| {
            value
                .and_then(serde_json::Number::from_f64)
                .map_or(Value::Null, Value::Number)
        };
        match name {
            "addresses" => serde_json::to_value(&self.addresses).ok(),
            "listItems" => serde_json::to_value(&self.list_items).ok(),
            "sections" => serde_json::to_value(&self.sections).ok(),
            "styles" => serde_json::to_value(&self.styles).ok(),
            "logo" => Some(self.logo.clone().map_or(Value::Null, Value::String)),
            "logoAlignment" => Some(Value::String(self.logo_alignment.as_str().to_string())),
            "logoWidth" => Some(number(self.logo_width)),
            "logoHeight" => Some(number(self.logo_height)),
            "logoMargin" => serde_json::to_value(self.logo_margin).ok(),
            "logoPadding" => serde_json::to_value(self.logo_padding).ok(),
            other => self.extra.get(other).cloned(),
        }
    }

    /// Read a field. Unresolvable paths read as an empty string.
    pub fn get_field(&self, path: &FieldPath) -> Value {
        self.try_get_field(path).unwrap_or_else(|| {
            tracing::warn!(path = %path, "Document field does not resolve, reading as empty");
            Value::String(String::new())
        })
    }

    /// Write a field.
    ///
    /// An index equal to the list length appends; anything past that is rejected.
    /// The style map is not writable here; see [`DocumentContent::set_field_style`].
    pub fn set_field(&mut self, path: &FieldPath, value: Value) -> Result<()> {
        match path {
            FieldPath::Field(name) => self.set_whole_field(path, name, value),
            FieldPath::Item { field, index } => {
                if field == ListField::Sections.as_str() {
                    let section: DocumentSection = serde_json::from_value(value).map_err(|_| mismatch(path, "a section object"))?;
                    return set_item(&mut self.sections, field, *index, section);
                }
                if let Some(list) = self.string_list_mut(field) {
                    let text = expect_string(path, value)?;
                    return set_item(list, field, *index, text);
                }
                match self.extra.get_mut(field) {
                    Some(Value::Array(items)) => set_item(items, field, *index, value),
                    _ => Err(ModelError::InvalidFieldPath(path.to_string())),
                }
            }
            FieldPath::ItemField {
                field,
                index,
                sub_field,
            } => {
                if field != ListField::Sections.as_str() {
                    return Err(ModelError::InvalidFieldPath(path.to_string()));
                }
                let text = expect_string(path, value)?;
                let len = self.sections.len();
                if *index > len {
                    return Err(ModelError::IndexOutOfRange {
                        field: field.clone(),
                        index: *index,
                        len,
                    });
                }
                if *index == len {
                    self.sections.push(DocumentSection::default());
                }
                let section = &mut self.sections[*index];
                match sub_field.as_str() {
                    "title" => section.title = text,
                    "content" => section.content = text,
                    _ => return Err(ModelError::InvalidFieldPath(path.to_string())),
                }
                Ok(())
            }
        }
    }

    fn set_whole_field(&mut self, path: &FieldPath, name: &str, value: Value) -> Result<()> {
        if let Some(text) = self.text_mut(name) {
            *text = expect_string(path, value)?;
            return Ok(());
        }
        match name {
            "addresses" | "listItems" => {
                let items: Vec<String> =
                    serde_json::from_value(value).map_err(|_| mismatch(path, "a list of strings"))?;
                if let Some(list) = self.string_list_mut(name) {
                    *list = items;
                }
            }
            "sections" => {
                self.sections = serde_json::from_value(value).map_err(|_| mismatch(path, "a list of sections"))?;
            }
            "logo" => {
                self.logo = match value {
                    Value::Null => None,
                    Value::String(uri) => Some(uri),
                    _ => return Err(mismatch(path, "a data URI or null")),
                };
            }
            "logoAlignment" => {
                self.logo_alignment = value
                    .as_str()
                    .and_then(LogoAlignment::from_keyword)
                    .ok_or_else(|| mismatch(path, "left, center or right"))?;
            }
            "logoWidth" | "logoHeight" => {
                let size = match &value {
                    Value::Null => None,
                    Value::String(s) if s.trim().is_empty() => None,
                    other => Some(number_from_value(other).ok_or_else(|| mismatch(path, "a number"))?),
                };
                if name == "logoWidth" {
                    self.logo_width = size;
                } else {
                    self.logo_height = size;
                }
            }
            "logoMargin" => self.logo_margin = parse_spacing(Some(&value)),
            "logoPadding" => self.logo_padding = parse_spacing(Some(&value)),
            "styles" => return Err(ModelError::InvalidFieldPath(path.to_string())),
            other => {
                self.extra.insert(other.to_string(), value);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Styles
    // =========================================================================

    /// Merge a style patch into the record stored for `path`
    pub fn set_field_style(&mut self, path: &FieldPath, patch: &StyleRecord) {
        self.styles.entry(path.to_string()).or_default().apply_patch(patch);
    }

    /// The record stored for exactly this path, if any
    pub fn field_style(&self, path: &FieldPath) -> Option<&StyleRecord> {
        self.styles.get(&path.to_string())
    }

    /// The effective record for a path: the whole field's record, overlaid by
    /// the item's record, overlaid by the item member's record
    pub fn effective_style(&self, path: &FieldPath) -> StyleRecord {
        path.ancestry()
            .iter()
            .filter_map(|step| self.field_style(step))
            .fold(StyleRecord::new(), |acc, record| acc.merge(record))
    }

    pub fn resolved_style(&self, path: &FieldPath) -> ResolvedStyle {
        self.effective_style(path).resolve()
    }

    pub fn logo_style(&self) -> LogoStyle {
        resolve_logo_style(self.logo_alignment, self.logo_margin, self.logo_padding)
    }

    // =========================================================================
    // List editing
    // =========================================================================

    /// Append an address and return its index
    pub fn add_address(&mut self, address: impl Into<String>) -> usize {
        self.addresses.push(address.into());
        self.addresses.len() - 1
    }

    pub fn add_section(&mut self, section: DocumentSection) -> usize {
        self.sections.push(section);
        self.sections.len() - 1
    }

    pub fn add_list_item(&mut self, item: impl Into<String>) -> usize {
        self.list_items.push(item.into());
        self.list_items.len() - 1
    }

    pub fn list_len(&self, list: ListField) -> usize {
        match list {
            ListField::Addresses => self.addresses.len(),
            ListField::Sections => self.sections.len(),
            ListField::ListItems => self.list_items.len(),
        }
    }

    /// Remove one entry of a list field.
    ///
    /// Style entries for the removed index are dropped and entries for later
    /// indices shift down so they stay attached to the same content.
    pub fn remove_list_entry(&mut self, list: ListField, index: usize) -> Result<()> {
        let len = self.list_len(list);
        if index >= len {
            return Err(ModelError::IndexOutOfRange {
                field: list.as_str().to_string(),
                index,
                len,
            });
        }
        match list {
            ListField::Addresses => {
                self.addresses.remove(index);
            }
            ListField::Sections => {
                self.sections.remove(index);
            }
            ListField::ListItems => {
                self.list_items.remove(index);
            }
        }
        self.shift_item_styles(list.as_str(), index);
        Ok(())
    }

    fn shift_item_styles(&mut self, field: &str, removed: usize) {
        let styles = std::mem::take(&mut self.styles);
        self.styles = styles
            .into_iter()
            .filter_map(|(key, record)| {
                let Some(path) = FieldPath::parse(&key) else {
                    return Some((key, record));
                };
                match path.index() {
                    Some(index) if path.name() == field => {
                        if index == removed {
                            None
                        } else if index > removed {
                            Some((path.with_index(index - 1).to_string(), record))
                        } else {
                            Some((key, record))
                        }
                    }
                    _ => Some((key, record)),
                }
            })
            .collect();
    }
}

fn mismatch(path: &FieldPath, expected: &'static str) -> ModelError {
    ModelError::FieldTypeMismatch {
        path: path.to_string(),
        expected,
    }
}

fn expect_string(path: &FieldPath, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(mismatch(path, "a string")),
    }
}

fn set_item<T>(items: &mut Vec<T>, field: &str, index: usize, item: T) -> Result<()> {
    let len = items.len();
    match index.cmp(&len) {
        std::cmp::Ordering::Less => items[index] = item,
        std::cmp::Ordering::Equal => items.push(item),
        std::cmp::Ordering::Greater => {
            return Err(ModelError::IndexOutOfRange {
                field: field.to_string(),
                index,
                len,
            })
        }
    }
    Ok(())
}
