//! Finnhub upstream provider.
//!
//! The proxy forwards `/api/finnhub?symbol=..&endpoint=..` to
//! `{base}/{endpoint}?symbol=..&token=..`:
//! - `quote` returns the short-coded price object (`c`, `d`, `dp`, `h`, `l`, `o`, `pc`)
//! - `profile2` returns the company profile
//! - `news` returns company news
//!
//! Finnhub free tier is limited to 60 API calls per minute.
//! API documentation: https://finnhub.io/docs/api

use std::time::Duration;

use crate::errors::MarketDataError;
use crate::provider::traits::{query_symbol, validate_identifier};
use crate::provider::{ProviderCapabilities, ProxyQuery, RateLimit, UpstreamProvider};

pub const BASE_URL: &str = "https://finnhub.io/api/v1";
const PROVIDER_ID: &str = "FINNHUB";

const ENDPOINTS: &[&str] = &["quote", "profile2", "news"];

/// Finnhub upstream provider.
pub struct FinnhubProvider {
    base_url: String,
}

impl FinnhubProvider {
    /// Create a provider pointing at the public Finnhub API.
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Create a provider pointing at another base URL (tests, mirrors).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for FinnhubProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl UpstreamProvider for FinnhubProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn display_name(&self) -> &'static str {
        "Finnhub"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            endpoints: ENDPOINTS,
            default_endpoint: "quote",
            default_symbol: "AAPL",
        }
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            requests_per_minute: 60,
            requests_per_day: None,
            min_delay: Duration::from_secs(1),
        }
    }

    fn upstream_url(&self, query: &ProxyQuery, api_key: &str) -> Result<String, MarketDataError> {
        let caps = self.capabilities();
        let symbol = query_symbol(query, caps.default_symbol);
        let endpoint = match query.endpoint.as_deref().map(str::trim) {
            Some(endpoint) if !endpoint.is_empty() => validate_identifier(endpoint)?,
            _ => caps.default_endpoint,
        };

        Ok(format!(
            "{}/{}?symbol={}&token={}",
            self.base_url,
            endpoint,
            urlencoding::encode(symbol),
            urlencoding::encode(api_key)
        ))
    }
}
