use std::time::Duration;

use finboard_market_data::{DEFAULT_API_BASE, DEFAULT_CACHE_TTL};

/// Settings for a dashboard instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Prefix for proxy request URLs built by the provider client.
    pub api_base_url: String,
    /// How long a fetched payload is served from the shared cache.
    pub cache_ttl: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

/// What a session sync changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub started: usize,
    pub restarted: usize,
    pub stopped: usize,
}

impl SyncReport {
    pub fn is_noop(&self) -> bool {
        self.started == 0 && self.restarted == 0 && self.stopped == 0
    }
}
