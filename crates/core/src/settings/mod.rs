//! Dashboard-wide preferences.

mod settings_model;
mod settings_service;

pub use settings_model::{ThemeMode, ThemeSettings};
pub use settings_service::{ThemeService, ThemeServiceTrait};
