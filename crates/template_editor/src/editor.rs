//! Template editor - the single writer of a template state

use crate::{EditError, ElementPreset, Result};
use serde_json::Value;
use std::borrow::Cow;
use template_model::{
    document_blocks, ContainerRef, DocumentBlock, DocumentContent, DocumentSection, EditorMode,
    Element, ElementId, ElementPatch, ElementSpec, ElementTree, FieldPath, ListField, ModelError,
    SelectOption, SelectionTarget, StyleDefaults, StyleRecord, TemplateState,
};

/// Partial update of one select option
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OptionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Owns a template state and applies every mutation to it
#[derive(Debug, Clone, Default)]
pub struct TemplateEditor {
    state: TemplateState,
    defaults: StyleDefaults,
}

impl TemplateEditor {
    /// Create an editor over an empty template
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: StyleDefaults) -> Self {
        Self {
            state: TemplateState::new(),
            defaults,
        }
    }

    /// Create an editor over an existing state
    pub fn with_state(state: TemplateState, defaults: StyleDefaults) -> Self {
        Self { state, defaults }
    }

    pub fn state(&self) -> &TemplateState {
        &self.state
    }

    pub fn into_state(self) -> TemplateState {
        self.state
    }

    pub fn defaults(&self) -> &StyleDefaults {
        &self.defaults
    }

    pub fn elements(&self) -> &ElementTree {
        self.state.elements()
    }

    pub fn find_element_by_id(&self, id: ElementId) -> Option<&Element> {
        self.state.elements().find_element_by_id(id)
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.state.mode().is_preview() {
            return Err(EditError::PreviewMode);
        }
        Ok(())
    }

    // =========================================================================
    // Element tree
    // =========================================================================

    /// Add an element at the end of `target` (a row or column) or at the top level
    pub fn add_element(&mut self, spec: ElementSpec, target: Option<ElementId>) -> Result<ElementId> {
        self.ensure_editable()?;
        let id = self
            .state
            .elements_mut()
            .add_element(spec, target, &self.defaults)?;
        tracing::debug!(id = %id, target = ?target, "Added element");
        Ok(id)
    }

    /// Add an element built from a palette preset
    pub fn add_preset(&mut self, preset: ElementPreset, target: Option<ElementId>) -> Result<ElementId> {
        let spec = preset.spec(self.state.elements().next_id());
        self.add_element(spec, target)
    }

    /// Add an element of a given spec and apply a property patch to it.
    ///
    /// The element is not kept if the patch is rejected.
    pub fn add_element_with(
        &mut self,
        spec: ElementSpec,
        target: Option<ElementId>,
        patch: &ElementPatch,
    ) -> Result<ElementId> {
        let id = self.add_element(spec, target)?;
        if let Err(err) = self.state.elements_mut().update_element_properties(id, patch) {
            self.state.elements_mut().remove_element(id)?;
            return Err(err.into());
        }
        Ok(id)
    }

    pub fn update_element_properties(&mut self, id: ElementId, patch: &ElementPatch) -> Result<()> {
        self.ensure_editable()?;
        self.state.elements_mut().update_element_properties(id, patch)?;
        tracing::debug!(id = %id, "Updated element properties");
        Ok(())
    }

    pub fn update_element_styles(&mut self, id: ElementId, patch: &StyleRecord) -> Result<()> {
        self.ensure_editable()?;
        self.state.elements_mut().update_element_styles(id, patch)?;
        tracing::debug!(id = %id, "Updated element styles");
        Ok(())
    }

    /// Remove an element with its subtree.
    ///
    /// Clears the selection when it pointed at any removed element.
    pub fn remove_element(&mut self, id: ElementId) -> Result<Vec<ElementId>> {
        self.ensure_editable()?;
        let removed = self.state.elements_mut().remove_element(id)?;

        let selected = self.state.selection().and_then(SelectionTarget::element_id);
        if selected.is_some_and(|selected| removed.contains(&selected)) {
            self.state.set_selection(None);
        }
        tracing::debug!(id = %id, count = removed.len(), "Removed element");
        Ok(removed)
    }

    /// Move an element between (or within) containers
    pub fn move_element(
        &mut self,
        source: ContainerRef,
        dest: ContainerRef,
        source_index: usize,
        dest_index: usize,
    ) -> Result<ElementId> {
        self.ensure_editable()?;
        let moved = self
            .state
            .elements_mut()
            .move_element(source, dest, source_index, dest_index)?;
        tracing::debug!(id = %moved, %source, %dest, source_index, dest_index, "Moved element");
        Ok(moved)
    }

    // =========================================================================
    // Select options
    // =========================================================================

    /// Append an auto-named option (`option<k>` / `Option <k>`) and return its index
    pub fn add_select_option(&mut self, id: ElementId) -> Result<usize> {
        self.ensure_editable()?;
        let options = self.state.elements_mut().select_options_mut(id)?;
        let k = options.len() + 1;
        options.push(SelectOption::new(format!("option{}", k), format!("Option {}", k)));
        Ok(k - 1)
    }

    pub fn update_select_option(&mut self, id: ElementId, index: usize, patch: &OptionPatch) -> Result<()> {
        self.ensure_editable()?;
        let options = self.state.elements_mut().select_options_mut(id)?;
        let len = options.len();
        let option = options.get_mut(index).ok_or_else(|| ModelError::IndexOutOfRange {
            field: "options".to_string(),
            index,
            len,
        })?;
        if let Some(value) = &patch.value {
            option.value = value.clone();
        }
        if let Some(label) = &patch.label {
            option.label = label.clone();
        }
        Ok(())
    }

    pub fn remove_select_option(&mut self, id: ElementId, index: usize) -> Result<SelectOption> {
        self.ensure_editable()?;
        let options = self.state.elements_mut().select_options_mut(id)?;
        if index >= options.len() {
            return Err(ModelError::IndexOutOfRange {
                field: "options".to_string(),
                index,
                len: options.len(),
            }
            .into());
        }
        Ok(options.remove(index))
    }

    // =========================================================================
    // Selection and mode
    // =========================================================================

    pub fn selection(&self) -> Option<&SelectionTarget> {
        self.state.selection()
    }

    /// The selected tree element, if the selection is one
    pub fn selected_element(&self) -> Option<&Element> {
        let id = self.state.selection()?.element_id()?;
        self.find_element_by_id(id)
    }

    /// Select a tree element, the logo, or a document field
    pub fn select(&mut self, target: SelectionTarget) -> Result<()> {
        self.ensure_editable()?;
        if let SelectionTarget::Element(id) = target {
            if !self.state.elements().contains(id) {
                return Err(ModelError::ElementNotFound(id).into());
            }
        }
        self.state.set_selection(Some(target));
        Ok(())
    }

    /// Select by wire ID (`element-<n>`, `logo-element`, `document-<path>`)
    pub fn select_id(&mut self, id: &str) -> Result<()> {
        let target: SelectionTarget = id.parse()?;
        self.select(target)
    }

    pub fn clear_selection(&mut self) {
        self.state.set_selection(None);
    }

    pub fn mode(&self) -> EditorMode {
        self.state.mode()
    }

    /// Switch modes. Entering preview clears the selection.
    pub fn set_preview_mode(&mut self, preview: bool) -> EditorMode {
        let mode = EditorMode::from_preview_flag(preview);
        if mode.is_preview() {
            self.state.set_selection(None);
        }
        if mode != self.state.mode() {
            tracing::debug!(mode = ?mode, "Switched editor mode");
        }
        self.state.set_mode(mode);
        mode
    }

    pub fn toggle_preview_mode(&mut self) -> EditorMode {
        self.set_preview_mode(!self.state.mode().is_preview())
    }

    // =========================================================================
    // Document content
    // =========================================================================

    /// Document content, the canonical document while uninitialized
    pub fn document(&self) -> Cow<'_, DocumentContent> {
        self.state.document_or_canonical(&self.defaults)
    }

    pub fn get_field(&self, path: &FieldPath) -> Value {
        self.document().get_field(path)
    }

    pub fn set_field(&mut self, path: &FieldPath, value: Value) -> Result<()> {
        self.ensure_editable()?;
        self.with_document(|document| document.set_field(path, value))?;
        tracing::debug!(path = %path, "Updated document field");
        Ok(())
    }

    pub fn set_field_style(&mut self, path: &FieldPath, patch: &StyleRecord) -> Result<()> {
        self.ensure_editable()?;
        self.state.document_mut(&self.defaults).set_field_style(path, patch);
        tracing::debug!(path = %path, "Updated document field style");
        Ok(())
    }

    pub fn add_address(&mut self, address: impl Into<String>) -> Result<usize> {
        self.ensure_editable()?;
        Ok(self.state.document_mut(&self.defaults).add_address(address))
    }

    pub fn add_section(&mut self, section: DocumentSection) -> Result<usize> {
        self.ensure_editable()?;
        Ok(self.state.document_mut(&self.defaults).add_section(section))
    }

    pub fn add_list_item(&mut self, item: impl Into<String>) -> Result<usize> {
        self.ensure_editable()?;
        Ok(self.state.document_mut(&self.defaults).add_list_item(item))
    }

    /// Remove a list entry. A selection on the removed entry is cleared.
    pub fn remove_list_entry(&mut self, list: ListField, index: usize) -> Result<()> {
        self.ensure_editable()?;
        self.with_document(|document| document.remove_list_entry(list, index))?;

        let selected_entry = match self.state.selection() {
            Some(SelectionTarget::DocumentField(path)) => {
                path.name() == list.as_str() && path.index().is_some_and(|i| i >= index)
            }
            _ => false,
        };
        if selected_entry {
            self.state.set_selection(None);
        }
        Ok(())
    }

    pub fn remove_address(&mut self, index: usize) -> Result<()> {
        self.remove_list_entry(ListField::Addresses, index)
    }

    pub fn remove_section(&mut self, index: usize) -> Result<()> {
        self.remove_list_entry(ListField::Sections, index)
    }

    pub fn remove_list_item(&mut self, index: usize) -> Result<()> {
        self.remove_list_entry(ListField::ListItems, index)
    }

    /// Resolved document blocks for export
    pub fn document_blocks(&self) -> Vec<DocumentBlock> {
        document_blocks(&self.document())
    }

    /// Run a fallible document edit without seeding the document if it fails
    fn with_document<T>(
        &mut self,
        edit: impl FnOnce(&mut DocumentContent) -> template_model::Result<T>,
    ) -> Result<T> {
        if self.state.document().is_some() {
            return Ok(edit(self.state.document_mut(&self.defaults))?);
        }
        let mut document = DocumentContent::canonical(&self.defaults);
        let result = edit(&mut document)?;
        tracing::debug!("Initializing document content from the canonical document");
        self.state.set_document(Some(document));
        Ok(result)
    }

    // =========================================================================
    // Whole-template operations
    // =========================================================================

    /// Replace the template with an imported one, keeping the current mode
    pub fn import_state(&mut self, mut imported: TemplateState) {
        imported.set_mode(self.state.mode());
        if imported.mode().is_preview() {
            imported.set_selection(None);
        }
        tracing::info!(elements = imported.elements().len(), "Imported template");
        self.state = imported;
    }

    /// Clear the template. The ID counter carries over so IDs are never reissued.
    pub fn reset_template(&mut self) -> Result<()> {
        self.ensure_editable()?;
        let next_id = self.state.elements().next_id();
        self.state = TemplateState::new();
        *self.state.elements_mut() = ElementTree::with_next_id(next_id);
        tracing::info!(next_id, "Reset template");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use template_model::{Display, ElementType, FlexSettings};

    fn editor_with_row() -> (TemplateEditor, ElementId) {
        let mut editor = TemplateEditor::new();
        let row = editor.add_preset(ElementPreset::Row, None).unwrap();
        (editor, row)
    }

    #[test]
    fn test_preset_names_use_assigned_id() {
        let (mut editor, row) = editor_with_row();
        let id = editor.add_preset(ElementPreset::TextInput, Some(row)).unwrap();
        let element = editor.find_element_by_id(id).unwrap();
        assert_eq!(element.props.name, format!("text-input_{}", id.raw()));
    }

    #[test]
    fn test_remove_clears_selection_of_descendant() {
        let (mut editor, row) = editor_with_row();
        let column = editor.add_preset(ElementPreset::Column, Some(row)).unwrap();
        let input = editor.add_preset(ElementPreset::EmailInput, Some(column)).unwrap();
        editor.select(input.into()).unwrap();

        editor.remove_element(row).unwrap();
        assert!(editor.selection().is_none());
        assert!(editor.elements().is_empty());
    }

    #[test]
    fn test_remove_keeps_unrelated_selection() {
        let (mut editor, row) = editor_with_row();
        let other = editor.add_preset(ElementPreset::Textarea, None).unwrap();
        editor.select(other.into()).unwrap();
        editor.remove_element(row).unwrap();
        assert_eq!(editor.selection(), Some(&SelectionTarget::Element(other)));
    }

    #[test]
    fn test_preview_mode_gates_mutations() {
        let (mut editor, row) = editor_with_row();
        editor.select(row.into()).unwrap();

        assert_eq!(editor.toggle_preview_mode(), EditorMode::Preview);
        assert!(editor.selection().is_none());

        assert!(matches!(
            editor.add_preset(ElementPreset::Checkbox, None),
            Err(EditError::PreviewMode)
        ));
        assert!(matches!(editor.remove_element(row), Err(EditError::PreviewMode)));
        assert!(matches!(
            editor.set_field(&FieldPath::field("title"), json!("x")),
            Err(EditError::PreviewMode)
        ));
        assert!(matches!(editor.select(row.into()), Err(EditError::PreviewMode)));
        assert_eq!(editor.elements().len(), 1);

        assert_eq!(editor.toggle_preview_mode(), EditorMode::Edit);
        editor.add_preset(ElementPreset::Checkbox, None).unwrap();
    }

    #[test]
    fn test_select_unknown_element_fails() {
        let mut editor = TemplateEditor::new();
        assert!(matches!(
            editor.select_id("element-3"),
            Err(EditError::Model(ModelError::ElementNotFound(_)))
        ));
        assert!(matches!(
            editor.select_id("bogus"),
            Err(EditError::Model(ModelError::InvalidSelectionId(_)))
        ));
        editor.select_id("logo-element").unwrap();
        editor.select_id("document-sections[1].title").unwrap();
    }

    #[test]
    fn test_select_options() {
        let mut editor = TemplateEditor::new();
        let select = editor.add_preset(ElementPreset::Select, None).unwrap();

        assert_eq!(editor.add_select_option(select).unwrap(), 2);
        editor
            .update_select_option(
                select,
                0,
                &OptionPatch {
                    label: Some("First".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        let removed = editor.remove_select_option(select, 1).unwrap();
        assert_eq!(removed.value, "option2");

        let options = editor.find_element_by_id(select).unwrap().options().unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].label, "First");
        assert_eq!(options[1], SelectOption::new("option3", "Option 3"));

        assert!(editor.remove_select_option(select, 5).is_err());
        let textarea = editor.add_preset(ElementPreset::Textarea, None).unwrap();
        assert!(matches!(
            editor.add_select_option(textarea),
            Err(EditError::Model(ModelError::InvalidProperty { .. }))
        ));
    }

    #[test]
    fn test_add_element_with_rejected_patch_keeps_nothing() {
        let mut editor = TemplateEditor::new();
        let patch = ElementPatch {
            checked: Some(true),
            ..Default::default()
        };
        let result = editor.add_element_with(ElementSpec::of_type(ElementType::Textarea), None, &patch);
        assert!(result.is_err());
        assert!(editor.elements().is_empty());
    }

    #[test]
    fn test_flex_style_scenario() {
        let (mut editor, row) = editor_with_row();
        editor
            .update_element_styles(
                row,
                &StyleRecord {
                    display: Some(Display::Flex),
                    flex: Some(FlexSettings {
                        grow: 1.0,
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            )
            .unwrap();
        let resolved = editor.find_element_by_id(row).unwrap().styles.resolve();
        assert_eq!(resolved.flex.as_ref().map(|f| f.flex_grow), Some(1.0));

        editor
            .update_element_styles(
                row,
                &StyleRecord {
                    display: Some(Display::Block),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(editor.find_element_by_id(row).unwrap().styles.resolve().flex.is_none());
    }

    #[test]
    fn test_document_lazily_initialized() {
        let mut editor = TemplateEditor::new();
        assert_eq!(editor.get_field(&FieldPath::field("date")), json!("18/02/2025"));
        assert!(editor.state().document().is_none());

        assert!(editor
            .set_field(&FieldPath::field("date"), json!(12))
            .is_err());
        assert!(editor.state().document().is_none());

        editor
            .set_field(&"addresses[1]".parse().unwrap(), json!("New City"))
            .unwrap();
        let document = editor.state().document().unwrap();
        assert_eq!(document.addresses[1], "New City");
        assert_eq!(document.addresses[0], "Vietnam Kon Tum Kon Tum");
    }

    #[test]
    fn test_remove_list_entry_clears_shifted_selection() {
        let mut editor = TemplateEditor::new();
        editor.select_id("document-addresses[2]").unwrap();
        editor.remove_list_entry(ListField::Addresses, 0).unwrap();
        assert!(editor.selection().is_none());
        assert_eq!(editor.document().addresses.len(), 2);
    }

    #[test]
    fn test_remove_section_and_list_item() {
        let mut editor = TemplateEditor::new();
        let sections = editor.document().sections.len();
        let second_title = editor.document().sections[1].title.clone();
        editor.remove_section(0).unwrap();
        assert_eq!(editor.document().sections.len(), sections - 1);
        assert_eq!(editor.document().sections[0].title, second_title);

        let items = editor.document().list_items.len();
        assert!(editor.remove_list_item(items).is_err());
        editor.remove_list_item(items - 1).unwrap();
        assert_eq!(editor.document().list_items.len(), items - 1);
    }

    #[test]
    fn test_reset_keeps_counter() {
        let (mut editor, row) = editor_with_row();
        editor.set_field(&FieldPath::field("title"), json!("Custom")).unwrap();
        editor.reset_template().unwrap();

        assert!(editor.elements().is_empty());
        assert!(editor.state().document().is_none());
        let next = editor.add_preset(ElementPreset::Row, None).unwrap();
        assert!(next > row);
    }

    #[test]
    fn test_import_keeps_mode() {
        let mut source = TemplateEditor::new();
        let id = source.add_preset(ElementPreset::Checkbox, None).unwrap();
        source.select(id.into()).unwrap();
        let imported = source.into_state();

        let mut editor = TemplateEditor::new();
        editor.set_preview_mode(true);
        editor.import_state(imported);

        assert_eq!(editor.mode(), EditorMode::Preview);
        assert!(editor.selection().is_none());
        assert_eq!(editor.elements().len(), 1);
    }
}
