//! Widgets module - configs, the ordered registry, and config files.

mod widgets_io;
mod widgets_model;
mod widgets_registry;
mod widgets_traits;


pub use widgets_io::{export_widgets, parse_widgets};
pub use widgets_model::{DisplayMode, NewWidget, WidgetConfig, WidgetsRecord};
pub use widgets_registry::WidgetRegistry;
pub use widgets_traits::WidgetRegistryTrait;
