//! Form Preview - Derived form views over a template's element tree
//!
//! Flattens the element tree into its leaf fields, seeds initial form values,
//! and builds a validation schema from each field's type and constraints.

mod fields;
mod rules;

pub use fields::*;
pub use rules::*;
