//! The complete template state

use crate::{
    DocumentContent, EditorMode, ElementTree, ModelError, SelectionTarget, StyleDefaults,
    TemplateStateRecord,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Element tree, selection, mode and document content of one template.
///
/// The document is `None` until first written; reads before that see the
/// canonical document without storing it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "TemplateStateRecord", try_from = "TemplateStateRecord")]
pub struct TemplateState {
    elements: ElementTree,
    selection: Option<SelectionTarget>,
    mode: EditorMode,
    document: Option<DocumentContent>,
}

impl TemplateState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &ElementTree {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut ElementTree {
        &mut self.elements
    }

    pub fn selection(&self) -> Option<&SelectionTarget> {
        self.selection.as_ref()
    }

    pub fn set_selection(&mut self, selection: Option<SelectionTarget>) {
        self.selection = selection;
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EditorMode) {
        self.mode = mode;
    }

    /// Stored document content, `None` while uninitialized
    pub fn document(&self) -> Option<&DocumentContent> {
        self.document.as_ref()
    }

    /// Document content for reading, falling back to the canonical document
    pub fn document_or_canonical(&self, defaults: &StyleDefaults) -> Cow<'_, DocumentContent> {
        match &self.document {
            Some(document) => Cow::Borrowed(document),
            None => Cow::Owned(DocumentContent::canonical(defaults)),
        }
    }

    /// Document content for writing, seeded from the canonical document on first use
    pub fn document_mut(&mut self, defaults: &StyleDefaults) -> &mut DocumentContent {
        self.document.get_or_insert_with(|| {
            tracing::debug!("Initializing document content from the canonical document");
            DocumentContent::canonical(defaults)
        })
    }

    pub fn set_document(&mut self, document: Option<DocumentContent>) {
        self.document = document;
    }

    pub fn to_record(&self) -> TemplateStateRecord {
        TemplateStateRecord {
            elements: self.elements.to_records(),
            selected_element_id: self.selection.as_ref().map(ToString::to_string),
            is_preview_mode: self.mode.is_preview(),
            next_id: self.elements.next_id(),
            document_content: self.document.clone(),
        }
    }

    /// Build a state from its wire form.
    ///
    /// Structural problems in the element tree are errors. A selection that is
    /// unparsable or names a missing element is dropped with a warning.
    pub fn from_record(record: TemplateStateRecord) -> Result<Self, ModelError> {
        let elements = ElementTree::from_records(record.elements, record.next_id)?;

        let selection = record.selected_element_id.and_then(|raw| {
            match SelectionTarget::parse(&raw) {
                Some(SelectionTarget::Element(id)) if !elements.contains(id) => {
                    tracing::warn!(selection = %raw, "Selected element does not exist, clearing selection");
                    None
                }
                Some(target) => Some(target),
                None => {
                    tracing::warn!(selection = %raw, "Unrecognised selection id, clearing selection");
                    None
                }
            }
        });

        Ok(Self {
            elements,
            selection,
            mode: EditorMode::from_preview_flag(record.is_preview_mode),
            document: record.document_content,
        })
    }
}

impl From<TemplateState> for TemplateStateRecord {
    fn from(state: TemplateState) -> Self {
        state.to_record()
    }
}

impl TryFrom<TemplateStateRecord> for TemplateState {
    type Error = ModelError;

    fn try_from(record: TemplateStateRecord) -> Result<Self, Self::Error> {
        TemplateState::from_record(record)
    }
}
