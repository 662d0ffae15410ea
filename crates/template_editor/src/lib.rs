//! Template Editor - Mutation entry points, selection, and mode control
//!
//! [`TemplateEditor`] owns one [`template_model::TemplateState`] and is the
//! single writer for it. Every mutation is checked against the current mode
//! and either applies completely or returns an error with the state untouched.

mod error;
mod presets;
mod editor;
mod drop;
mod command;

pub use error::*;
pub use presets::*;
pub use editor::*;
pub use drop::*;
pub use command::*;
