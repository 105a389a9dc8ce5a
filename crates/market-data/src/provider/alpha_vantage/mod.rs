//! Alpha Vantage upstream provider.
//!
//! The proxy forwards `/api/alphavantage?symbol=..&function=..` to
//! `{base}?function=..&symbol=..&apikey=..`. The default function is
//! `GLOBAL_QUOTE`, whose payload nests list-style keys under
//! `"Global Quote"` (e.g. `"05. price"`).
//!
//! Note: Alpha Vantage free tier is limited to 5 API calls per minute and
//! 25 per day. When exceeded it still answers HTTP 200 but the body carries
//! a `Note` member instead of data.

use std::time::Duration;

use serde_json::Value;

use crate::errors::MarketDataError;
use crate::provider::traits::{query_symbol, validate_identifier};
use crate::provider::{ProviderCapabilities, ProxyQuery, RateLimit, UpstreamProvider};

pub const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER_ID: &str = "ALPHA_VANTAGE";

const FUNCTIONS: &[&str] = &["GLOBAL_QUOTE", "TIME_SERIES_DAILY", "OVERVIEW"];

/// Alpha Vantage upstream provider.
pub struct AlphaVantageProvider {
    base_url: String,
}

impl AlphaVantageProvider {
    /// Create a provider pointing at the public Alpha Vantage API.
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

impl Default for AlphaVantageProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl UpstreamProvider for AlphaVantageProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn display_name(&self) -> &'static str {
        "Alpha Vantage"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            endpoints: FUNCTIONS,
            default_endpoint: "GLOBAL_QUOTE",
            default_symbol: "IBM",
        }
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            requests_per_minute: 5,
            requests_per_day: Some(25),
            min_delay: Duration::from_secs(12),
        }
    }

    fn upstream_url(&self, query: &ProxyQuery, api_key: &str) -> Result<String, MarketDataError> {
        let caps = self.capabilities();
        let symbol = query_symbol(query, caps.default_symbol);
        let function = match query.function.as_deref().map(str::trim) {
            Some(function) if !function.is_empty() => validate_identifier(function)?,
            _ => caps.default_endpoint,
        };

        Ok(format!(
            "{}?function={}&symbol={}&apikey={}",
            self.base_url,
            function,
            urlencoding::encode(symbol),
            urlencoding::encode(api_key)
        ))
    }

    fn is_rate_limited(&self, status: u16, body: &Value) -> bool {
        status == 429 || body.get("Note").is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_id() {
        let provider = AlphaVantageProvider::new();
        assert_eq!(provider.id(), "ALPHA_VANTAGE");
        assert_eq!(provider.display_name(), "Alpha Vantage");
    }

    #[test]
    fn test_rate_limit() {
        let limit = AlphaVantageProvider::new().rate_limit();
        assert_eq!(limit.requests_per_minute, 5);
        assert_eq!(limit.requests_per_day, Some(25));
        assert_eq!(limit.min_delay, Duration::from_secs(12));
    }

    #[test]
    fn test_upstream_url_defaults() {
        let provider = AlphaVantageProvider::new();
        let url = provider
            .upstream_url(&ProxyQuery::default(), "demo")
            .unwrap();
        assert_eq!(
            url,
            "https://www.alphavantage.co/query?function=GLOBAL_QUOTE&symbol=IBM&apikey=demo"
        );
    }

    #[test]
    fn test_upstream_url_with_function() {
        let provider = AlphaVantageProvider::with_base_url("http://localhost:1/query");
        let query = ProxyQuery {
            symbol: Some("MSFT".to_string()),
            endpoint: None,
            function: Some("TIME_SERIES_DAILY".to_string()),
        };
        let url = provider.upstream_url(&query, "k").unwrap();
        assert_eq!(
            url,
            "http://localhost:1/query?function=TIME_SERIES_DAILY&symbol=MSFT&apikey=k"
        );
    }

    #[test]
    fn test_note_is_rate_limit() {
        let provider = AlphaVantageProvider::new();
        let body = json!({
            "Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."
        });
        assert!(provider.is_rate_limited(200, &body));
        assert!(provider.is_rate_limited(429, &json!({})));
    }

    #[test]
    fn test_global_quote_is_not_rate_limit() {
        let provider = AlphaVantageProvider::new();
        let body = json!({
            "Global Quote": {
                "01. symbol": "IBM",
                "05. price": "182.5200",
                "10. change percent": "0.4512%"
            }
        });
        assert!(!provider.is_rate_limited(200, &body));
    }
}
