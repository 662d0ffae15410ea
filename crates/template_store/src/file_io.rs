//! Template files on disk
//!
//! A template file holds exactly what [`export_template`] produces. Loading goes
//! through [`import_template`], so a file that is not a template is reported as
//! malformed rather than half-loaded.

use crate::{export_template, import_template, Result, StoreError};
use std::path::Path;
use template_model::TemplateState;

/// Export `state` and write it to `path`, replacing any existing file
pub async fn save_template(state: &TemplateState, path: impl AsRef<Path>, pretty: bool) -> Result<()> {
    let json = export_template(state, pretty)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

/// Read and import the template at `path`.
///
/// A missing file is [`StoreError::FileNotFound`]; unreadable JSON or a
/// broken element tree is [`StoreError::MalformedImport`].
pub async fn load_template(path: impl AsRef<Path>) -> Result<TemplateState> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(StoreError::FileNotFound(path.display().to_string()));
    }

    let json = tokio::fs::read_to_string(path).await?;
    import_template(&json)
}

/// Blocking [`save_template`]
pub fn save_template_sync(state: &TemplateState, path: impl AsRef<Path>, pretty: bool) -> Result<()> {
    let json = export_template(state, pretty)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Blocking [`load_template`]
pub fn load_template_sync(path: impl AsRef<Path>) -> Result<TemplateState> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(StoreError::FileNotFound(path.display().to_string()));
    }

    let json = std::fs::read_to_string(path)?;
    import_template(&json)
}
