//! Template Store - Import/export, file I/O, and builder settings
//!
//! This crate turns a [`template_model::TemplateState`] into its JSON file
//! form and back, reads and writes template files, and persists the
//! builder's settings.

mod error;
mod serializer;
mod file_io;
mod settings;

pub use error::*;
pub use serializer::*;
pub use file_io::*;
pub use settings::*;
