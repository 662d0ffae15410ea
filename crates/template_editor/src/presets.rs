//! Element palette presets

use serde::{Deserialize, Serialize};
use template_model::{ElementKind, ElementSpec, ElementType, FieldProps, InputType, SelectOption};

/// One entry of the element palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementPreset {
    TextInput,
    NumberInput,
    EmailInput,
    Textarea,
    Checkbox,
    Select,
    FileUpload,
    Image,
    Row,
    Column,
}

impl ElementPreset {
    /// Palette order
    pub const ALL: [ElementPreset; 10] = [
        ElementPreset::TextInput,
        ElementPreset::NumberInput,
        ElementPreset::EmailInput,
        ElementPreset::Textarea,
        ElementPreset::Checkbox,
        ElementPreset::Select,
        ElementPreset::FileUpload,
        ElementPreset::Image,
        ElementPreset::Row,
        ElementPreset::Column,
    ];

    /// Stable key, also the prefix of generated field names
    pub fn key(&self) -> &'static str {
        match self {
            ElementPreset::TextInput => "text-input",
            ElementPreset::NumberInput => "number-input",
            ElementPreset::EmailInput => "email-input",
            ElementPreset::Textarea => "textarea",
            ElementPreset::Checkbox => "checkbox",
            ElementPreset::Select => "select",
            ElementPreset::FileUpload => "file-upload",
            ElementPreset::Image => "image",
            ElementPreset::Row => "row",
            ElementPreset::Column => "column",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.key() == key)
    }

    /// Palette label
    pub fn label(&self) -> &'static str {
        match self {
            ElementPreset::TextInput => "Text Input",
            ElementPreset::NumberInput => "Number Input",
            ElementPreset::EmailInput => "Email Input",
            ElementPreset::Textarea => "Text Area",
            ElementPreset::Checkbox => "Checkbox",
            ElementPreset::Select => "Dropdown",
            ElementPreset::FileUpload => "File Upload",
            ElementPreset::Image => "Image",
            ElementPreset::Row => "Row",
            ElementPreset::Column => "Column",
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            ElementPreset::TextInput | ElementPreset::NumberInput | ElementPreset::EmailInput => {
                ElementType::Input
            }
            ElementPreset::Textarea => ElementType::Textarea,
            ElementPreset::Checkbox => ElementType::Checkbox,
            ElementPreset::Select => ElementType::Select,
            ElementPreset::FileUpload => ElementType::File,
            ElementPreset::Image => ElementType::Image,
            ElementPreset::Row => ElementType::Row,
            ElementPreset::Column => ElementType::Column,
        }
    }

    /// Build the element spec for this preset.
    ///
    /// `serial` makes the generated field name unique; the editor passes the
    /// ID counter value the new element will receive.
    pub fn spec(&self, serial: u64) -> ElementSpec {
        let kind = match self {
            ElementPreset::TextInput => input(InputType::Text),
            ElementPreset::NumberInput => input(InputType::Number),
            ElementPreset::EmailInput => input(InputType::Email),
            ElementPreset::Select => ElementKind::Select {
                options: vec![
                    SelectOption::new("option1", "Option 1"),
                    SelectOption::new("option2", "Option 2"),
                ],
            },
            other => ElementKind::for_type(other.element_type()),
        };

        let props = FieldProps {
            label: format!("New {}", self.label()),
            name: format!("{}_{}", self.key(), serial),
            required: false,
            placeholder: String::new(),
            default_value: String::new(),
        };
        ElementSpec::new(kind, props)
    }
}

fn input(input_type: InputType) -> ElementKind {
    ElementKind::Input {
        input_type,
        min: None,
        max: None,
    }
}

impl std::fmt::Display for ElementPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
