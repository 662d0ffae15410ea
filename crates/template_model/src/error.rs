//! Error types for template model operations

use crate::{ElementId, ElementType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    #[error("Element {id} is a {element_type} and cannot hold children")]
    NotAContainer { id: ElementId, element_type: ElementType },

    #[error("Invalid move: {0}")]
    InvalidMove(#[from] MoveError),

    #[error("Property '{property}' does not apply to {element_type} element {id}")]
    InvalidProperty {
        id: ElementId,
        property: &'static str,
        element_type: ElementType,
    },

    #[error("Invalid element id: {0}")]
    InvalidElementId(String),

    #[error("Invalid selection id: {0}")]
    InvalidSelectionId(String),

    #[error("Invalid field path: {0}")]
    InvalidFieldPath(String),

    #[error("Field '{path}' expects {expected}")]
    FieldTypeMismatch { path: String, expected: &'static str },

    #[error("Index {index} out of range for '{field}' (length {len})")]
    IndexOutOfRange {
        field: String,
        index: usize,
        len: usize,
    },

    #[error("Malformed element tree: {0}")]
    MalformedTree(String),
}

/// Reasons a move request is rejected. Every check runs before the tree is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("unknown container '{0}'")]
    UnknownContainer(String),

    #[error("{0} is not a row or column")]
    NotAContainer(ElementId),

    #[error("source index {index} out of bounds (length {len})")]
    SourceIndexOutOfBounds { index: usize, len: usize },

    #[error("destination index {index} out of bounds (max {max})")]
    DestinationIndexOutOfBounds { index: usize, max: usize },

    #[error("cannot move {0} into itself or one of its descendants")]
    IntoOwnDescendant(ElementId),
}

pub type Result<T> = std::result::Result<T, ModelError>;
