//! Element nodes - layout containers and input-like leaf fields

use crate::keyword_serde;
use crate::lenient::option_number;
use crate::{ElementId, Keyword, ModelError, Result, StyleRecord};
use serde::{Deserialize, Serialize};

/// The closed set of element types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Input,
    Textarea,
    Checkbox,
    Select,
    File,
    Image,
    Row,
    Column,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Input => "input",
            ElementType::Textarea => "textarea",
            ElementType::Checkbox => "checkbox",
            ElementType::Select => "select",
            ElementType::File => "file",
            ElementType::Image => "image",
            ElementType::Row => "row",
            ElementType::Column => "column",
        }
    }

    /// Rows and columns hold children; everything else is a leaf field
    pub fn is_container(&self) -> bool {
        matches!(self, ElementType::Row | ElementType::Column)
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTML input flavour for `input` elements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InputType {
    #[default]
    Text,
    Number,
    Email,
}

impl Keyword for InputType {
    const KIND: &'static str = "inputType";
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("text", Self::Text),
        ("number", Self::Number),
        ("email", Self::Email),
    ];
}
keyword_serde!(InputType);

/// One entry of a select element's option list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Type-specific data. The variant fixes the element type for the node's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Input {
        input_type: InputType,
        min: Option<f64>,
        max: Option<f64>,
    },
    Textarea,
    Checkbox {
        checked: bool,
    },
    Select {
        options: Vec<SelectOption>,
    },
    File,
    Image {
        image: Option<String>,
        width: Option<f64>,
        height: Option<f64>,
    },
    Row,
    Column,
}

impl ElementKind {
    /// Default data for an element type
    pub fn for_type(element_type: ElementType) -> Self {
        match element_type {
            ElementType::Input => ElementKind::Input {
                input_type: InputType::Text,
                min: None,
                max: None,
            },
            ElementType::Textarea => ElementKind::Textarea,
            ElementType::Checkbox => ElementKind::Checkbox { checked: false },
            ElementType::Select => ElementKind::Select { options: Vec::new() },
            ElementType::File => ElementKind::File,
            ElementType::Image => ElementKind::Image {
                image: None,
                width: None,
                height: None,
            },
            ElementType::Row => ElementKind::Row,
            ElementType::Column => ElementKind::Column,
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Input { .. } => ElementType::Input,
            ElementKind::Textarea => ElementType::Textarea,
            ElementKind::Checkbox { .. } => ElementType::Checkbox,
            ElementKind::Select { .. } => ElementType::Select,
            ElementKind::File => ElementType::File,
            ElementKind::Image { .. } => ElementType::Image,
            ElementKind::Row => ElementType::Row,
            ElementKind::Column => ElementType::Column,
        }
    }
}

/// Properties shared by every element type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldProps {
    pub label: String,
    /// Binding name for the field's value; must be unique among leaf fields
    pub name: String,
    pub required: bool,
    pub placeholder: String,
    pub default_value: String,
}

/// Everything needed to create an element (the ID and styles are assigned by the tree)
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSpec {
    pub kind: ElementKind,
    pub props: FieldProps,
}

impl ElementSpec {
    pub fn new(kind: ElementKind, props: FieldProps) -> Self {
        Self { kind, props }
    }

    /// A spec with default data and empty properties for the given type
    pub fn of_type(element_type: ElementType) -> Self {
        Self::new(ElementKind::for_type(element_type), FieldProps::default())
    }
}

/// A partial property update. `None` leaves the property unchanged.
/// `type`, `id` and `children` are not patchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_type: Option<InputType>,
    #[serde(deserialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(deserialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(deserialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(deserialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// A node in the element tree
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    id: ElementId,
    parent: Option<ElementId>,
    /// IDs of child elements in rendering order (containers only)
    children: Vec<ElementId>,
    kind: ElementKind,
    pub props: FieldProps,
    pub styles: StyleRecord,
}

impl Element {
    pub(crate) fn new(id: ElementId, spec: ElementSpec, styles: StyleRecord) -> Self {
        Self {
            id,
            parent: None,
            children: Vec::new(),
            kind: spec.kind,
            props: spec.props,
            styles,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Containing row/column, or None for top-level elements
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    pub fn is_container(&self) -> bool {
        self.element_type().is_container()
    }

    pub fn input_type(&self) -> Option<InputType> {
        match &self.kind {
            ElementKind::Input { input_type, .. } => Some(*input_type),
            _ => None,
        }
    }

    pub fn options(&self) -> Option<&[SelectOption]> {
        match &self.kind {
            ElementKind::Select { options } => Some(options),
            _ => None,
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ElementId>) {
        self.parent = parent;
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<ElementId> {
        &mut self.children
    }

    pub(crate) fn options_mut(&mut self) -> Result<&mut Vec<SelectOption>> {
        let id = self.id;
        let element_type = self.element_type();
        match &mut self.kind {
            ElementKind::Select { options } => Ok(options),
            _ => Err(ModelError::InvalidProperty {
                id,
                property: "options",
                element_type,
            }),
        }
    }

    /// Check that every property in the patch applies to this element's type
    pub fn check_patch(&self, patch: &ElementPatch) -> Result<()> {
        let element_type = self.element_type();
        let reject = |property: &'static str| ModelError::InvalidProperty {
            id: self.id,
            property,
            element_type,
        };

        let input_only = [
            ("inputType", patch.input_type.is_some()),
            ("min", patch.min.is_some()),
            ("max", patch.max.is_some()),
        ];
        let image_only = [
            ("image", patch.image.is_some()),
            ("width", patch.width.is_some()),
            ("height", patch.height.is_some()),
        ];

        for (property, present) in input_only {
            if present && element_type != ElementType::Input {
                return Err(reject(property));
            }
        }
        for (property, present) in image_only {
            if present && element_type != ElementType::Image {
                return Err(reject(property));
            }
        }
        if patch.options.is_some() && element_type != ElementType::Select {
            return Err(reject("options"));
        }
        if patch.checked.is_some() && element_type != ElementType::Checkbox {
            return Err(reject("checked"));
        }
        Ok(())
    }

    /// Merge a patch into this element. Nothing changes if any property is rejected.
    pub fn apply_patch(&mut self, patch: &ElementPatch) -> Result<()> {
        self.check_patch(patch)?;

        if let Some(label) = &patch.label {
            self.props.label = label.clone();
        }
        if let Some(name) = &patch.name {
            self.props.name = name.clone();
        }
        if let Some(required) = patch.required {
            self.props.required = required;
        }
        if let Some(placeholder) = &patch.placeholder {
            self.props.placeholder = placeholder.clone();
        }
        if let Some(default_value) = &patch.default_value {
            self.props.default_value = default_value.clone();
        }

        match &mut self.kind {
            ElementKind::Input { input_type, min, max } => {
                if let Some(value) = patch.input_type {
                    *input_type = value;
                }
                if patch.min.is_some() {
                    *min = patch.min;
                }
                if patch.max.is_some() {
                    *max = patch.max;
                }
            }
            ElementKind::Checkbox { checked } => {
                if let Some(value) = patch.checked {
                    *checked = value;
                }
            }
            ElementKind::Select { options } => {
                if let Some(value) = &patch.options {
                    *options = value.clone();
                }
            }
            ElementKind::Image { image, width, height } => {
                if patch.image.is_some() {
                    *image = patch.image.clone();
                }
                if patch.width.is_some() {
                    *width = patch.width;
                }
                if patch.height.is_some() {
                    *height = patch.height;
                }
            }
            ElementKind::Textarea | ElementKind::File | ElementKind::Row | ElementKind::Column => {}
        }
        Ok(())
    }
}
