//! Field selection and presentation.
//!
//! A widget stores dot-delimited field paths into its provider's response.
//! This module resolves those paths, turns them into labels and display
//! strings, and lists the selectable fields of a sample response.

mod explorer;
mod field_presenter;
mod formatters;
mod path_resolver;

pub use explorer::{explore, leaves, toggle_field, FieldNode, FieldNodeKind, PREVIEW_CHARS};
pub use field_presenter::{coerce_number, display_string, display_value, label};
pub use formatters::{format_currency, format_number, format_percent};
pub use path_resolver::resolve;
