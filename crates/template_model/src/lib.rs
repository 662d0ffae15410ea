//! Template Model - Core template state for the form/document builder
//!
//! This crate provides the template state model: an arena-backed tree of
//! layout and input elements with stable `element-<n>` IDs, per-element and
//! per-document-field style records, the document content store, and the
//! serialized wire form of the whole state.

mod error;
mod element_id;
mod keyword;
mod lenient;
pub mod spacing;
pub mod style;
mod config;
mod element;
mod tree;
pub mod field_path;
pub mod document;
pub mod document_view;
mod selection;
pub mod record;
mod state;

pub use error::*;
pub use element_id::*;
pub use keyword::*;
pub use spacing::*;
pub use style::*;
pub use config::*;
pub use element::*;
pub use tree::*;
pub use field_path::*;
pub use document::*;
pub use document_view::*;
pub use selection::*;
pub use record::*;
pub use state::*;
