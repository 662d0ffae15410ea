//! Serialized template form
//!
//! [`ElementRecord`] is the nested, flat-property JSON shape of an element as
//! it appears in exported template files. [`TemplateStateRecord`] is the whole
//! exported file. Converting a tree to records and back reproduces the same
//! tree, so export -> import -> export is byte-identical.

use crate::lenient::option_number;
use crate::{
    DocumentContent, Element, ElementId, ElementKind, ElementSpec, ElementTree, ElementType,
    FieldProps, InputType, ModelError, Result, SelectOption, StyleRecord,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Wire form of one element and its subtree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub default_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<InputType>,
    #[serde(default, deserialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, deserialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub styles: StyleRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ElementRecord>>,
}

impl ElementRecord {
    fn from_element(tree: &ElementTree, element: &Element) -> Self {
        let props = &element.props;
        let mut record = ElementRecord {
            id: element.id(),
            element_type: element.element_type(),
            label: props.label.clone(),
            name: props.name.clone(),
            required: props.required,
            placeholder: props.placeholder.clone(),
            default_value: props.default_value.clone(),
            input_type: None,
            min: None,
            max: None,
            options: None,
            checked: None,
            image: None,
            width: None,
            height: None,
            styles: element.styles.clone(),
            children: None,
        };

        match element.kind() {
            ElementKind::Input { input_type, min, max } => {
                record.input_type = Some(*input_type);
                record.min = *min;
                record.max = *max;
            }
            ElementKind::Checkbox { checked } => record.checked = Some(*checked),
            ElementKind::Select { options } => record.options = Some(options.clone()),
            ElementKind::Image { image, width, height } => {
                record.image = image.clone();
                record.width = *width;
                record.height = *height;
            }
            ElementKind::Row | ElementKind::Column => {
                record.children = Some(
                    element
                        .children()
                        .iter()
                        .filter_map(|child| tree.get(*child))
                        .map(|child| ElementRecord::from_element(tree, child))
                        .collect(),
                );
            }
            ElementKind::Textarea | ElementKind::File => {}
        }
        record
    }

    /// Split into the element's own data and its child records
    fn into_parts(self) -> Result<(ElementId, ElementSpec, StyleRecord, Vec<ElementRecord>)> {
        let kind = match self.element_type {
            ElementType::Input => ElementKind::Input {
                input_type: self.input_type.unwrap_or_default(),
                min: self.min,
                max: self.max,
            },
            ElementType::Checkbox => ElementKind::Checkbox {
                checked: self.checked.unwrap_or(false),
            },
            ElementType::Select => ElementKind::Select {
                options: self.options.unwrap_or_default(),
            },
            ElementType::Image => ElementKind::Image {
                image: self.image,
                width: self.width,
                height: self.height,
            },
            other => ElementKind::for_type(other),
        };

        let children = self.children.unwrap_or_default();
        if !self.element_type.is_container() && !children.is_empty() {
            return Err(ModelError::MalformedTree(format!(
                "{} is a {} but has children",
                self.id, self.element_type
            )));
        }

        let props = FieldProps {
            label: self.label,
            name: self.name,
            required: self.required,
            placeholder: self.placeholder,
            default_value: self.default_value,
        };
        Ok((self.id, ElementSpec::new(kind, props), self.styles, children))
    }
}

impl ElementTree {
    /// Export the tree as nested records in rendering order
    pub fn to_records(&self) -> Vec<ElementRecord> {
        self.roots
            .iter()
            .filter_map(|id| self.get(*id))
            .map(|element| ElementRecord::from_element(self, element))
            .collect()
    }

    /// Rebuild a tree from nested records.
    ///
    /// Duplicate IDs and children on leaf elements are rejected. A counter that
    /// would reissue an existing ID is raised past the largest one.
    pub fn from_records(records: Vec<ElementRecord>, next_id: u64) -> Result<Self> {
        let mut tree = ElementTree::with_next_id(next_id);
        let mut seen = HashSet::new();
        let mut pending: Vec<(ElementRecord, Option<ElementId>)> =
            records.into_iter().rev().map(|record| (record, None)).collect();

        while let Some((record, parent)) = pending.pop() {
            let (id, spec, styles, children) = record.into_parts()?;
            if !seen.insert(id) {
                return Err(ModelError::MalformedTree(format!("duplicate element id {}", id)));
            }

            let mut element = Element::new(id, spec, styles);
            element.set_parent(parent);
            element
                .children_mut()
                .extend(children.iter().map(|child| child.id));
            if parent.is_none() {
                tree.roots.push(id);
            }
            tree.nodes.insert(id, element);
            pending.extend(children.into_iter().rev().map(|child| (child, Some(id))));
        }

        let max_id = tree.nodes.keys().map(|id| id.raw()).max().unwrap_or(0);
        if max_id >= tree.next_id {
            tracing::warn!(
                next_id = tree.next_id,
                max_id,
                "Element counter behind existing ids, advancing it"
            );
            tree.next_id = max_id + 1;
        }

        tree.check_integrity()?;
        Ok(tree)
    }
}

/// Wire form of the whole template state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateStateRecord {
    pub elements: Vec<ElementRecord>,
    #[serde(default)]
    pub selected_element_id: Option<String>,
    #[serde(default)]
    pub is_preview_mode: bool,
    pub next_id: u64,
    #[serde(default)]
    pub document_content: Option<DocumentContent>,
}
