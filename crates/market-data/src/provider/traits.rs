//! Upstream provider trait definitions.
//!
//! This module defines the `UpstreamProvider` trait implemented by every
//! provider the proxy can forward to.

use serde::Deserialize;
use serde_json::Value;

use crate::errors::MarketDataError;

use super::capabilities::{ProviderCapabilities, RateLimit};

/// Query string accepted by the provider proxy endpoints.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ProxyQuery {
    pub symbol: Option<String>,
    pub endpoint: Option<String>,
    pub function: Option<String>,
}

/// Trait for upstream market data providers.
///
/// The proxy holds the credential and uses this trait to build the upstream
/// URL and to recognise the provider's own way of signalling a rate limit,
/// which it then translates into a plain HTTP 429.
///
/// # Example
///
/// ```ignore
/// struct MyProvider;
///
/// impl UpstreamProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     fn display_name(&self) -> &'static str {
///         "My Provider"
///     }
///
///     // ... capabilities, rate_limit, upstream_url
/// }
/// ```
pub trait UpstreamProvider: Send + Sync {
    /// Unique identifier for this provider, e.g. "FINNHUB".
    fn id(&self) -> &'static str;

    /// Human readable name used in proxy error bodies.
    fn display_name(&self) -> &'static str;

    /// Describes the endpoints and defaults of this provider.
    fn capabilities(&self) -> ProviderCapabilities;

    /// Published free-tier limits.
    fn rate_limit(&self) -> RateLimit;

    /// Build the upstream URL for a proxy query, credential included.
    fn upstream_url(&self, query: &ProxyQuery, api_key: &str) -> Result<String, MarketDataError>;

    /// Whether an upstream answer is a rate limit signal.
    ///
    /// Default implementation only looks at the status code.
    fn is_rate_limited(&self, status: u16, body: &Value) -> bool {
        let _ = body;
        status == 429
    }
}

/// Resolve the symbol of a query, falling back to the provider default.
pub(crate) fn query_symbol<'a>(query: &'a ProxyQuery, default: &'a str) -> &'a str {
    query
        .symbol
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
}

/// Only plain path-like identifiers may be forwarded as endpoint or function names.
pub(crate) fn validate_identifier(value: &str) -> Result<&str, MarketDataError> {
    let valid = !value.is_empty()
        && !value.contains("..")
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '/'));

    if valid {
        Ok(value)
    } else {
        Err(MarketDataError::InvalidRequest(format!(
            "invalid endpoint '{}'",
            value
        )))
    }
}
