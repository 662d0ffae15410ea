//! Template serialization

use crate::{Result, StoreError};
use serde_json::Value;
use template_model::TemplateState;

/// Keys every template file must carry
const REQUIRED_KEYS: [&str; 2] = ["elements", "nextId"];

/// Serialize a template state to its JSON file form
pub fn export_template(state: &TemplateState, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(state)?
    } else {
        serde_json::to_string(state)?
    };
    tracing::info!(
        elements = state.elements().len(),
        bytes = json.len(),
        "Exported template"
    );
    Ok(json)
}

/// Parse a template file.
///
/// Anything that is not a well-formed template is reported as
/// [`StoreError::MalformedImport`]; nothing is returned half-built.
pub fn import_template(json: &str) -> Result<TemplateState> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| StoreError::MalformedImport(format!("not valid JSON: {}", e)))?;

    let Some(object) = value.as_object() else {
        return Err(StoreError::MalformedImport(
            "expected a JSON object at the top level".to_string(),
        ));
    };
    if let Some(missing) = REQUIRED_KEYS.iter().find(|key| !object.contains_key(**key)) {
        return Err(StoreError::MalformedImport(format!(
            "missing required key '{}'",
            missing
        )));
    }
    if !object["elements"].is_array() {
        return Err(StoreError::MalformedImport(
            "'elements' must be an array".to_string(),
        ));
    }

    let state: TemplateState =
        serde_json::from_value(value).map_err(|e| StoreError::MalformedImport(e.to_string()))?;
    tracing::info!(elements = state.elements().len(), "Parsed template");
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use template_model::{ElementSpec, ElementType, FieldPath, StyleDefaults};

    fn sample_state() -> TemplateState {
        let defaults = StyleDefaults::default();
        let mut state = TemplateState::new();
        let row = state
            .elements_mut()
            .add_element(ElementSpec::of_type(ElementType::Row), None, &defaults)
            .unwrap();
        state
            .elements_mut()
            .add_element(ElementSpec::of_type(ElementType::Select), Some(row), &defaults)
            .unwrap();
        state
            .document_mut(&defaults)
            .set_field(&FieldPath::item("addresses", 0), json!("Da Nang"))
            .unwrap();
        state
    }

    #[test]
    fn test_export_import_export_identical() {
        let state = sample_state();
        for pretty in [false, true] {
            let first = export_template(&state, pretty).unwrap();
            let imported = import_template(&first).unwrap();
            let second = export_template(&imported, pretty).unwrap();
            assert_eq!(first, second);
            assert_eq!(imported, state);
        }
    }

    #[test]
    fn test_export_shape() {
        let json = export_template(&sample_state(), false).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nextId"], json!(3));
        assert_eq!(value["isPreviewMode"], json!(false));
        assert_eq!(value["elements"][0]["id"], json!("element-1"));
        assert_eq!(value["elements"][0]["children"][0]["type"], json!("select"));
        assert_eq!(value["documentContent"]["addresses"][0], json!("Da Nang"));
    }

    #[test]
    fn test_missing_keys_rejected() {
        for raw in [
            r#"{"nextId": 1}"#,
            r#"{"elements": []}"#,
            r#"[]"#,
            r#"{"elements": {}, "nextId": 1}"#,
            "not json",
        ] {
            assert!(
                matches!(import_template(raw), Err(StoreError::MalformedImport(_))),
                "accepted {}",
                raw
            );
        }
    }

    #[test]
    fn test_malformed_tree_rejected() {
        let duplicate = r#"{
            "elements": [
                {"id": "element-1", "type": "input"},
                {"id": "element-1", "type": "textarea"}
            ],
            "nextId": 2
        }"#;
        assert!(matches!(
            import_template(duplicate),
            Err(StoreError::MalformedImport(_))
        ));

        let leaf_with_children = r#"{
            "elements": [{"id": "element-1", "type": "checkbox", "children": [
                {"id": "element-2", "type": "input"}
            ]}],
            "nextId": 3
        }"#;
        assert!(matches!(
            import_template(leaf_with_children),
            Err(StoreError::MalformedImport(_))
        ));
    }

    #[test]
    fn test_minimal_import() {
        let state = import_template(r#"{"elements": [], "nextId": 7}"#).unwrap();
        assert!(state.elements().is_empty());
        assert_eq!(state.elements().next_id(), 7);
        assert!(state.document().is_none());
        assert!(state.selection().is_none());
    }
}
