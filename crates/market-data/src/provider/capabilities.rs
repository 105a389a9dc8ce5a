//! Provider capabilities and rate limiting configuration.
//!
//! This module defines structures for describing what an upstream provider
//! exposes through the proxy and how hard it may be called.

use std::time::Duration;

/// Describes what an upstream provider can serve through the proxy.
#[derive(Clone, Debug)]
pub struct ProviderCapabilities {
    /// Endpoints (or functions) the proxy knows about for this provider.
    pub endpoints: &'static [&'static str],

    /// Endpoint used when the caller does not name one.
    pub default_endpoint: &'static str,

    /// Symbol used when the caller does not name one.
    pub default_symbol: &'static str,
}

/// Published rate limits of a provider's free tier.
///
/// Widget refresh intervals shorter than `min_delay` will mostly be
/// served from the fetch cache or answered with a rate limit.
#[derive(Clone, Debug)]
pub struct RateLimit {
    /// Maximum requests allowed per minute.
    pub requests_per_minute: u32,

    /// Maximum requests allowed per day, when the provider publishes one.
    pub requests_per_day: Option<u32>,

    /// Minimum delay between requests.
    pub min_delay: Duration,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            requests_per_minute: 60,
            requests_per_day: None,
            min_delay: Duration::from_secs(1),
        }
    }
}
