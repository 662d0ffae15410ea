//! Validation schema derived from leaf fields
//!
//! Each named field gets one rule from its type: email format, numeric with
//! optional bounds, boolean, free text, or unconstrained. `required` adds a
//! presence check that runs before the type check, so every invalid field
//! reports exactly one message.

use crate::FormValues;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use template_model::{Element, ElementKind, InputType};

pub const MSG_REQUIRED: &str = "This field is required";
pub const MSG_INVALID_EMAIL: &str = "Invalid email address";
pub const MSG_NOT_A_NUMBER: &str = "Must be a number";
pub const MSG_NOT_A_BOOLEAN: &str = "Must be true or false";
pub const MSG_NOT_TEXT: &str = "Must be text";

fn email_pattern() -> Option<&'static regex_lite::Regex> {
    static EMAIL: OnceLock<Option<regex_lite::Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| regex_lite::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
}

/// The type check applied to a field's value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RuleKind {
    Email,
    Number { min: Option<f64>, max: Option<f64> },
    Boolean,
    Text,
    /// File uploads and images; any value passes
    Any,
}

impl RuleKind {
    fn for_element(element: &Element) -> Self {
        match element.kind() {
            ElementKind::Input { input_type, min, max } => match input_type {
                InputType::Email => RuleKind::Email,
                InputType::Number => RuleKind::Number { min: *min, max: *max },
                InputType::Text => RuleKind::Text,
            },
            ElementKind::Checkbox { .. } => RuleKind::Boolean,
            ElementKind::Textarea | ElementKind::Select { .. } => RuleKind::Text,
            ElementKind::File | ElementKind::Image { .. } => RuleKind::Any,
            ElementKind::Row | ElementKind::Column => RuleKind::Any,
        }
    }

    fn check(&self, value: &Value) -> Option<String> {
        match self {
            RuleKind::Email => match value {
                Value::String(s) => {
                    let valid = email_pattern().map_or(true, |re| re.is_match(s));
                    (!valid).then(|| MSG_INVALID_EMAIL.to_string())
                }
                _ => Some(MSG_INVALID_EMAIL.to_string()),
            },
            RuleKind::Number { min, max } => {
                let Some(number) = coerce_number(value) else {
                    return Some(MSG_NOT_A_NUMBER.to_string());
                };
                if let Some(min) = min.filter(|min| number < *min) {
                    return Some(format!("Minimum value is {}", min));
                }
                if let Some(max) = max.filter(|max| number > *max) {
                    return Some(format!("Maximum value is {}", max));
                }
                None
            }
            RuleKind::Boolean => match value {
                Value::Bool(_) => None,
                Value::String(s) if s == "true" || s == "false" => None,
                _ => Some(MSG_NOT_A_BOOLEAN.to_string()),
            },
            RuleKind::Text => match value {
                Value::String(_) | Value::Number(_) => None,
                _ => Some(MSG_NOT_TEXT.to_string()),
            },
            RuleKind::Any => None,
        }
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Absent, null, empty string, and `false` count as no value
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Validation rule for one named field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRule {
    pub name: String,
    pub label: String,
    pub required: bool,
    #[serde(flatten)]
    pub kind: RuleKind,
}

impl FieldRule {
    pub fn for_element(element: &Element) -> Self {
        Self {
            name: element.props.name.clone(),
            label: element.props.label.clone(),
            required: element.props.required,
            kind: RuleKind::for_element(element),
        }
    }

    /// Check one value, returning the error message if it is invalid
    pub fn check(&self, value: Option<&Value>) -> Option<String> {
        if is_blank(value) {
            // An unticked optional checkbox is a valid `false`
            return self.required.then(|| MSG_REQUIRED.to_string());
        }
        value.and_then(|value| self.kind.check(value))
    }
}

/// Per-field error messages keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, message)| (name.as_str(), message.as_str()))
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (name, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", name, message)?;
        }
        Ok(())
    }
}

/// The validation schema of a form
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    rules: Vec<FieldRule>,
    duplicate_names: Vec<String>,
}

impl FormSchema {
    /// Rules in field order
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    /// Names used by more than one field; only the last such field's rule is kept
    pub fn duplicate_names(&self) -> &[String] {
        &self.duplicate_names
    }

    /// Validate form values, producing at most one message per field
    pub fn validate(&self, values: &FormValues) -> ValidationErrors {
        ValidationErrors(
            self.rules
                .iter()
                .filter_map(|rule| {
                    rule.check(values.get(&rule.name))
                        .map(|message| (rule.name.clone(), message))
                })
                .collect(),
        )
    }
}

/// Build the validation schema for a list of leaf fields.
///
/// Unnamed fields are skipped.
pub fn build_validation_rules(fields: &[&Element]) -> FormSchema {
    let mut schema = FormSchema::default();
    for field in fields.iter().filter(|field| !field.props.name.is_empty()) {
        let rule = FieldRule::for_element(field);
        match schema.rules.iter_mut().find(|existing| existing.name == rule.name) {
            Some(existing) => {
                tracing::warn!(name = %rule.name, id = %field.id(), "Duplicate field name in form");
                if !schema.duplicate_names.contains(&rule.name) {
                    schema.duplicate_names.push(rule.name.clone());
                }
                *existing = rule;
            }
            None => schema.rules.push(rule),
        }
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect_leaf_fields;
    use proptest::prelude::*;
    use serde_json::json;
    use template_model::{ElementPatch, ElementSpec, ElementTree, ElementType, StyleDefaults};

    fn tree_with(fields: &[(ElementType, ElementPatch)]) -> ElementTree {
        let mut tree = ElementTree::new();
        for (element_type, patch) in fields {
            let id = tree
                .add_element(ElementSpec::of_type(*element_type), None, &StyleDefaults::default())
                .unwrap();
            tree.update_element_properties(id, patch).unwrap();
        }
        tree
    }

    fn named(name: &str) -> ElementPatch {
        ElementPatch {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn number_schema(min: Option<f64>, max: Option<f64>) -> FormSchema {
        let tree = tree_with(&[(
            ElementType::Input,
            ElementPatch {
                input_type: Some(InputType::Number),
                min,
                max,
                ..named("qty")
            },
        )]);
        build_validation_rules(&collect_leaf_fields(&tree))
    }

    fn values(pairs: &[(&str, Value)]) -> FormValues {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_number_bounds() {
        let schema = number_schema(Some(5.0), Some(10.0));
        let errors = schema.validate(&values(&[("qty", json!(3))]));
        assert_eq!(errors.get("qty"), Some("Minimum value is 5"));
        let errors = schema.validate(&values(&[("qty", json!("15"))]));
        assert_eq!(errors.get("qty"), Some("Maximum value is 10"));
        assert!(schema.validate(&values(&[("qty", json!(7))])).is_empty());
        let errors = schema.validate(&values(&[("qty", json!("seven"))]));
        assert_eq!(errors.get("qty"), Some(MSG_NOT_A_NUMBER));
    }

    #[test]
    fn test_email_and_required() {
        let tree = tree_with(&[
            (
                ElementType::Input,
                ElementPatch {
                    input_type: Some(InputType::Email),
                    required: Some(true),
                    ..named("email")
                },
            ),
            (ElementType::Textarea, named("notes")),
        ]);
        let schema = build_validation_rules(&collect_leaf_fields(&tree));

        let errors = schema.validate(&FormValues::new());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some(MSG_REQUIRED));

        let errors = schema.validate(&values(&[("email", json!("not-an-email"))]));
        assert_eq!(errors.get("email"), Some(MSG_INVALID_EMAIL));

        assert!(schema
            .validate(&values(&[("email", json!("qa@example.com")), ("notes", json!(""))]))
            .is_empty());
    }

    #[test]
    fn test_checkbox_rules() {
        let tree = tree_with(&[
            (
                ElementType::Checkbox,
                ElementPatch {
                    required: Some(true),
                    ..named("terms")
                },
            ),
            (ElementType::Checkbox, named("newsletter")),
        ]);
        let schema = build_validation_rules(&collect_leaf_fields(&tree));
        let errors = schema.validate(&values(&[("terms", json!(false)), ("newsletter", json!(false))]));
        assert_eq!(errors.get("terms"), Some(MSG_REQUIRED));
        assert!(errors.get("newsletter").is_none());

        let errors = schema.validate(&values(&[("terms", json!(true)), ("newsletter", json!(3))]));
        assert_eq!(errors.get("newsletter"), Some(MSG_NOT_A_BOOLEAN));
    }

    #[test]
    fn test_file_fields_unconstrained_and_unnamed_skipped() {
        let tree = tree_with(&[
            (ElementType::File, named("upload")),
            (ElementType::Input, ElementPatch::default()),
        ]);
        let schema = build_validation_rules(&collect_leaf_fields(&tree));
        assert_eq!(schema.rules().len(), 1);
        assert_eq!(schema.rule("upload").map(|r| &r.kind), Some(&RuleKind::Any));
        assert!(schema.validate(&values(&[("upload", json!({"size": 10}))])).is_empty());
    }

    #[test]
    fn test_duplicate_names_reported() {
        let tree = tree_with(&[
            (ElementType::Input, named("dup")),
            (ElementType::Checkbox, named("dup")),
        ]);
        let schema = build_validation_rules(&collect_leaf_fields(&tree));
        assert_eq!(schema.duplicate_names(), &["dup".to_string()]);
        assert_eq!(schema.rules().len(), 1);
        assert_eq!(schema.rules()[0].kind, RuleKind::Boolean);
    }

    #[test]
    fn test_errors_display() {
        let schema = number_schema(Some(1.5), None);
        let errors = schema.validate(&values(&[("qty", json!(1))]));
        assert_eq!(errors.to_string(), "qty: Minimum value is 1.5");
    }

    proptest! {
        #[test]
        fn in_range_numbers_accepted(min in -100i32..0, span in 0i32..100, offset in 0i32..100) {
            let max = min + span;
            let value = min + offset.min(span);
            let schema = number_schema(Some(min as f64), Some(max as f64));
            prop_assert!(schema.validate(&values(&[("qty", json!(value))])).is_empty());
        }
    }
}
