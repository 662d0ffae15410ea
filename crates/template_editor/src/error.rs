//! Error types for editing operations

use template_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("Template model error: {0}")]
    Model(#[from] ModelError),

    #[error("Template is in preview mode; switch to edit mode to make changes")]
    PreviewMode,

    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

pub type Result<T> = std::result::Result<T, EditError>;
