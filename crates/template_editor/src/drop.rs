//! Drag-and-drop completion handling
//!
//! A drag ends with a source location and an optional destination. Drags out
//! of the palette create a new element at the drop point; every other drag is
//! a move between containers.

use crate::{ElementPreset, Result, TemplateEditor};
use serde::{Deserialize, Serialize};
use template_model::{ContainerRef, ElementId, ModelError, MoveError};

/// Droppable ID of the element palette
pub const PALETTE_DROPPABLE: &str = "sidebar";

/// Prefix of draggable IDs of palette entries (`sidebar-<preset>`)
pub const PALETTE_DRAGGABLE_PREFIX: &str = "sidebar-";

/// One end of a drag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropLocation {
    /// `root`/`workspace`, a container element ID, or the palette
    pub droppable_id: String,
    pub index: usize,
}

impl DropLocation {
    pub fn new(droppable_id: impl Into<String>, index: usize) -> Self {
        Self {
            droppable_id: droppable_id.into(),
            index,
        }
    }
}

/// A completed drag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropEvent {
    #[serde(default)]
    pub draggable_id: String,
    pub source: DropLocation,
    #[serde(default)]
    pub destination: Option<DropLocation>,
}

fn container(droppable_id: &str) -> Result<ContainerRef> {
    ContainerRef::parse(droppable_id)
        .ok_or_else(|| ModelError::from(MoveError::UnknownContainer(droppable_id.to_string())).into())
}

impl TemplateEditor {
    /// Apply a completed drag.
    ///
    /// Returns `Ok(None)` when the drop is a no-op (no destination, or dropped
    /// where it started), otherwise the ID of the moved or created element.
    pub fn handle_drop(&mut self, event: &DropEvent) -> Result<Option<ElementId>> {
        let Some(destination) = &event.destination else {
            tracing::debug!("Drop outside any container ignored");
            return Ok(None);
        };
        if *destination == event.source {
            return Ok(None);
        }

        let dest = container(&destination.droppable_id)?;

        if event.source.droppable_id == PALETTE_DROPPABLE {
            let preset = event
                .draggable_id
                .strip_prefix(PALETTE_DRAGGABLE_PREFIX)
                .and_then(ElementPreset::from_key)
                .ok_or_else(|| MoveError::UnknownContainer(event.draggable_id.clone()))
                .map_err(ModelError::from)?;
            return self.drop_preset(preset, dest, destination.index).map(Some);
        }

        let source = container(&event.source.droppable_id)?;
        self.move_element(source, dest, event.source.index, destination.index)
            .map(Some)
    }

    /// Create a preset element at a position inside `dest`
    fn drop_preset(&mut self, preset: ElementPreset, dest: ContainerRef, index: usize) -> Result<ElementId> {
        let len = self.elements().children_of(dest)?.len();
        if index > len {
            return Err(ModelError::from(MoveError::DestinationIndexOutOfBounds { index, max: len }).into());
        }

        let target = match dest {
            ContainerRef::Root => None,
            ContainerRef::Element(id) => Some(id),
        };
        let id = self.add_preset(preset, target)?;
        if index < len {
            self.move_element(dest, dest, len, index)?;
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use template_model::ElementType;

    fn drag(source: DropLocation, destination: Option<DropLocation>) -> DropEvent {
        DropEvent {
            draggable_id: String::new(),
            source,
            destination,
        }
    }

    #[test]
    fn test_noop_drops() {
        let mut editor = TemplateEditor::new();
        editor.add_preset(ElementPreset::TextInput, None).unwrap();
        let before = editor.state().clone();

        assert_eq!(editor.handle_drop(&drag(DropLocation::new("root", 0), None)).unwrap(), None);
        assert_eq!(
            editor
                .handle_drop(&drag(DropLocation::new("root", 0), Some(DropLocation::new("root", 0))))
                .unwrap(),
            None
        );
        assert_eq!(editor.state(), &before);
    }

    #[test]
    fn test_workspace_sentinel_reorders_root() {
        let mut editor = TemplateEditor::new();
        let a = editor.add_preset(ElementPreset::TextInput, None).unwrap();
        let b = editor.add_preset(ElementPreset::Textarea, None).unwrap();

        let moved = editor
            .handle_drop(&drag(DropLocation::new("workspace", 0), Some(DropLocation::new("root", 1))))
            .unwrap();
        assert_eq!(moved, Some(a));
        assert_eq!(editor.elements().roots(), &[b, a]);
    }

    #[test]
    fn test_drop_into_column() {
        let mut editor = TemplateEditor::new();
        let column = editor.add_preset(ElementPreset::Column, None).unwrap();
        let input = editor.add_preset(ElementPreset::TextInput, None).unwrap();

        editor
            .handle_drop(&drag(
                DropLocation::new("root", 1),
                Some(DropLocation::new(column.to_string(), 0)),
            ))
            .unwrap();
        assert_eq!(editor.elements().children_of(column.into()).unwrap(), &[input]);
    }

    #[test]
    fn test_palette_drop_creates_element_at_index() {
        let mut editor = TemplateEditor::new();
        let first = editor.add_preset(ElementPreset::TextInput, None).unwrap();
        let second = editor.add_preset(ElementPreset::TextInput, None).unwrap();

        let event = DropEvent {
            draggable_id: "sidebar-checkbox".to_string(),
            source: DropLocation::new(PALETTE_DROPPABLE, 4),
            destination: Some(DropLocation::new("root", 1)),
        };
        let created = editor.handle_drop(&event).unwrap().unwrap();

        assert_eq!(editor.elements().roots(), &[first, created, second]);
        assert_eq!(
            editor.find_element_by_id(created).unwrap().element_type(),
            ElementType::Checkbox
        );
    }

    #[test]
    fn test_invalid_drops_rejected() {
        let mut editor = TemplateEditor::new();
        editor.add_preset(ElementPreset::TextInput, None).unwrap();
        let before = editor.state().clone();

        let to_palette = drag(DropLocation::new("root", 0), Some(DropLocation::new(PALETTE_DROPPABLE, 0)));
        assert!(editor.handle_drop(&to_palette).is_err());

        let out_of_range = drag(DropLocation::new("root", 3), Some(DropLocation::new("root", 0)));
        assert!(editor.handle_drop(&out_of_range).is_err());

        let unknown_preset = DropEvent {
            draggable_id: "sidebar-slider".to_string(),
            source: DropLocation::new(PALETTE_DROPPABLE, 0),
            destination: Some(DropLocation::new("root", 0)),
        };
        assert!(editor.handle_drop(&unknown_preset).is_err());

        assert_eq!(editor.state(), &before);
    }
}
