//! Leaf field discovery and initial form values

use serde_json::Value;
use std::collections::BTreeMap;
use template_model::{Element, ElementKind, ElementTree};

/// Form values keyed by field name
pub type FormValues = BTreeMap<String, Value>;

/// All non-container elements in reading order.
///
/// Rows and columns are skipped but their children are visited in place, so
/// the result follows the authored left-to-right, top-to-bottom order.
pub fn collect_leaf_fields(tree: &ElementTree) -> Vec<&Element> {
    tree.iter_preorder().filter(|element| !element.is_container()).collect()
}

/// Starting values for a preview form.
///
/// Checkboxes start from their `checked` flag, everything else from its
/// default value. Fields without a name cannot hold a value and are skipped.
pub fn build_initial_values(fields: &[&Element]) -> FormValues {
    fields
        .iter()
        .filter(|field| !field.props.name.is_empty())
        .map(|field| {
            let value = match field.kind() {
                ElementKind::Checkbox { checked } => Value::Bool(*checked),
                _ => Value::String(field.props.default_value.clone()),
            };
            (field.props.name.clone(), value)
        })
        .collect()
}
