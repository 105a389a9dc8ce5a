//! Dashboard module - wires the registry, theme, cache and polling sessions.

mod dashboard_model;
mod dashboard_service;


pub use dashboard_model::{DashboardConfig, SyncReport};
pub use dashboard_service::Dashboard;
