/// Storage key for the widget list record.
pub const WIDGETS_STORAGE_KEY: &str = "finboard-storage";

/// Storage key for the theme preference record.
pub const THEME_STORAGE_KEY: &str = "finboard-theme";

/// Suggested file name for exported dashboard configs.
pub const EXPORT_FILE_NAME: &str = "finboard-config.json";

/// Rows per page in table widgets.
pub const TABLE_PAGE_SIZE: usize = 5;

/// Default refresh interval for new widgets, in seconds.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;
