use crate::errors::Result;
use crate::widgets::widgets_model::{NewWidget, WidgetConfig};

/// Ordered, persisted collection of widget configs.
///
/// Every successful mutation is written to storage before it becomes
/// visible, so a failed write leaves the in-memory list unchanged.
pub trait WidgetRegistryTrait: Send + Sync {
    /// Snapshot in display order.
    fn widgets(&self) -> Vec<WidgetConfig>;

    fn get(&self, id: &str) -> Option<WidgetConfig>;

    /// Insert at the front. Fails on an invalid config or a duplicate id.
    fn add(&self, config: WidgetConfig) -> Result<()>;

    /// Assign a fresh id to `new_widget` and insert it at the front.
    fn create(&self, new_widget: NewWidget) -> Result<WidgetConfig>;

    /// Replace the config with the same id, keeping its position.
    fn update(&self, config: WidgetConfig) -> Result<()>;

    /// Remove by id. Returns `false` without touching storage when absent.
    fn remove(&self, id: &str) -> Result<bool>;

    /// Move the widget at `from` so it ends up at `to`.
    fn reorder(&self, from: usize, to: usize) -> Result<()>;

    /// Move `active_id` into the position currently held by `over_id`.
    /// Returns `false` if either id is unknown or they are equal.
    fn move_widget(&self, active_id: &str, over_id: &str) -> Result<bool>;

    /// Replace the whole list. All configs must be valid with unique ids.
    fn replace_all(&self, widgets: Vec<WidgetConfig>) -> Result<()>;

    /// Parse a config file and replace the list with it.
    fn import_json(&self, raw: &str) -> Result<usize>;

    /// Current list as a pretty-printed config file.
    fn export_json(&self) -> Result<String>;
}
