//! Serializable edit commands
//!
//! Every mutation of [`TemplateEditor`] has a command form so a host can
//! funnel all edits through one dispatch queue. Commands are plain data and
//! use the same camelCase JSON shape as the template file.

use crate::{DropEvent, EditError, ElementPreset, OptionPatch, Result, TemplateEditor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use template_model::{
    ContainerRef, DocumentSection, EditorMode, ElementId, ElementPatch, ElementSpec, ElementType,
    FieldPath, ListField, SelectOption, SelectionTarget, StyleRecord, TemplateState,
};

/// A single edit request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EditCommand {
    AddElement {
        element_type: ElementType,
        #[serde(default)]
        target_id: Option<ElementId>,
        #[serde(default)]
        properties: ElementPatch,
    },
    AddPreset {
        preset: ElementPreset,
        #[serde(default)]
        target_id: Option<ElementId>,
    },
    UpdateElement {
        id: ElementId,
        properties: ElementPatch,
    },
    UpdateElementStyles {
        id: ElementId,
        styles: StyleRecord,
    },
    RemoveElement {
        id: ElementId,
    },
    MoveElement {
        source_id: ContainerRef,
        destination_id: ContainerRef,
        source_index: usize,
        destination_index: usize,
    },
    Drop {
        event: DropEvent,
    },
    AddSelectOption {
        id: ElementId,
    },
    UpdateSelectOption {
        id: ElementId,
        index: usize,
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        label: Option<String>,
    },
    RemoveSelectOption {
        id: ElementId,
        index: usize,
    },
    SelectElement {
        id: SelectionTarget,
    },
    ClearSelection,
    TogglePreviewMode,
    SetPreviewMode {
        enabled: bool,
    },
    UpdateDocumentContent {
        field: FieldPath,
        value: Value,
    },
    UpdateDocumentStyle {
        field: FieldPath,
        styles: StyleRecord,
    },
    AddAddress {
        value: String,
    },
    AddSection {
        #[serde(default)]
        title: String,
        #[serde(default)]
        content: String,
    },
    AddListItem {
        value: String,
    },
    RemoveListEntry {
        list: ListField,
        index: usize,
    },
    ImportTemplate {
        state: Box<TemplateState>,
    },
    ResetTemplate,
}

impl EditCommand {
    /// Parse a command from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| EditError::InvalidCommand(e.to_string()))
    }
}

/// What a successfully applied command produced
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "value", rename_all = "camelCase")]
pub enum CommandOutcome {
    Done,
    /// The drop was a no-op
    Ignored,
    ElementAdded(ElementId),
    ElementsRemoved(Vec<ElementId>),
    ElementMoved(ElementId),
    OptionAdded(usize),
    OptionRemoved(SelectOption),
    EntryAdded(usize),
    ModeChanged(EditorMode),
}

impl TemplateEditor {
    /// Apply one command
    pub fn apply(&mut self, command: EditCommand) -> Result<CommandOutcome> {
        let outcome = match command {
            EditCommand::AddElement {
                element_type,
                target_id,
                properties,
            } => CommandOutcome::ElementAdded(self.add_element_with(
                ElementSpec::of_type(element_type),
                target_id,
                &properties,
            )?),
            EditCommand::AddPreset { preset, target_id } => {
                CommandOutcome::ElementAdded(self.add_preset(preset, target_id)?)
            }
            EditCommand::UpdateElement { id, properties } => {
                self.update_element_properties(id, &properties)?;
                CommandOutcome::Done
            }
            EditCommand::UpdateElementStyles { id, styles } => {
                self.update_element_styles(id, &styles)?;
                CommandOutcome::Done
            }
            EditCommand::RemoveElement { id } => CommandOutcome::ElementsRemoved(self.remove_element(id)?),
            EditCommand::MoveElement {
                source_id,
                destination_id,
                source_index,
                destination_index,
            } => CommandOutcome::ElementMoved(self.move_element(
                source_id,
                destination_id,
                source_index,
                destination_index,
            )?),
            EditCommand::Drop { event } => match self.handle_drop(&event)? {
                Some(id) => CommandOutcome::ElementMoved(id),
                None => CommandOutcome::Ignored,
            },
            EditCommand::AddSelectOption { id } => CommandOutcome::OptionAdded(self.add_select_option(id)?),
            EditCommand::UpdateSelectOption { id, index, value, label } => {
                self.update_select_option(id, index, &OptionPatch { value, label })?;
                CommandOutcome::Done
            }
            EditCommand::RemoveSelectOption { id, index } => {
                CommandOutcome::OptionRemoved(self.remove_select_option(id, index)?)
            }
            EditCommand::SelectElement { id } => {
                self.select(id)?;
                CommandOutcome::Done
            }
            EditCommand::ClearSelection => {
                self.clear_selection();
                CommandOutcome::Done
            }
            EditCommand::TogglePreviewMode => CommandOutcome::ModeChanged(self.toggle_preview_mode()),
            EditCommand::SetPreviewMode { enabled } => CommandOutcome::ModeChanged(self.set_preview_mode(enabled)),
            EditCommand::UpdateDocumentContent { field, value } => {
                self.set_field(&field, value)?;
                CommandOutcome::Done
            }
            EditCommand::UpdateDocumentStyle { field, styles } => {
                self.set_field_style(&field, &styles)?;
                CommandOutcome::Done
            }
            EditCommand::AddAddress { value } => CommandOutcome::EntryAdded(self.add_address(value)?),
            EditCommand::AddSection { title, content } => {
                CommandOutcome::EntryAdded(self.add_section(DocumentSection::new(title, content))?)
            }
            EditCommand::AddListItem { value } => CommandOutcome::EntryAdded(self.add_list_item(value)?),
            EditCommand::RemoveListEntry { list, index } => {
                self.remove_list_entry(list, index)?;
                CommandOutcome::Done
            }
            EditCommand::ImportTemplate { state } => {
                self.import_state(*state);
                CommandOutcome::Done
            }
            EditCommand::ResetTemplate => {
                self.reset_template()?;
                CommandOutcome::Done
            }
        };
        Ok(outcome)
    }
}
