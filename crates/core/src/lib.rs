//! Finboard Core - dashboard domain, persistence and presentation.
//!
//! This crate holds everything between the network layer in
//! `finboard-market-data` and whatever draws the dashboard:
//!
//! - [`widgets`] - widget configs, the ordered persisted registry, config files
//! - [`fields`] - path resolution, labels, value formatting, field discovery
//! - [`render`] - card, table and chart views of a widget's session state
//! - [`settings`] - the persisted theme preference
//! - [`storage`] - the durable key-value backend
//! - [`dashboard`] - ties the above to one polling session per widget

pub mod constants;
pub mod dashboard;
pub mod errors;
pub mod fields;
pub mod render;
pub mod settings;
pub mod storage;
pub mod widgets;

pub use dashboard::{Dashboard, DashboardConfig, SyncReport};
pub use widgets::{DisplayMode, NewWidget, WidgetConfig, WidgetRegistry, WidgetRegistryTrait};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
