//! Request URL building for widget data sources.
//!
//! Widgets never talk to a provider directly. They poll the proxy endpoints
//! (`/api/finnhub`, `/api/alphavantage`) and the proxy injects the credential.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::cache::{fetch_json, HttpFetcher};
use crate::errors::MarketDataError;

/// Default mount point of the provider proxy.
pub const DEFAULT_API_BASE: &str = "/api";

/// Providers reachable through the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiProvider {
    Finnhub,
    AlphaVantage,
}

impl ApiProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Finnhub => "finnhub",
            Self::AlphaVantage => "alphavantage",
        }
    }
}

impl fmt::Display for ApiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiProvider {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "finnhub" => Ok(Self::Finnhub),
            "alphavantage" => Ok(Self::AlphaVantage),
            other => Err(MarketDataError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Finnhub endpoints exposed through the proxy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinnhubEndpoint {
    #[default]
    Quote,
    Profile2,
    News,
}

impl FinnhubEndpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quote => "quote",
            Self::Profile2 => "profile2",
            Self::News => "news",
        }
    }
}

impl FromStr for FinnhubEndpoint {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "quote" => Ok(Self::Quote),
            "profile2" => Ok(Self::Profile2),
            "news" => Ok(Self::News),
            other => Err(MarketDataError::InvalidRequest(format!(
                "unknown Finnhub endpoint '{}'",
                other
            ))),
        }
    }
}

/// Builds proxy request URLs and runs one-off connection tests.
///
/// No retries and no caching here; periodic polling goes through
/// [`FetchCache`](crate::cache::FetchCache).
#[derive(Clone)]
pub struct ProviderClient {
    base_url: String,
    fetcher: Arc<dyn HttpFetcher>,
}

impl ProviderClient {
    pub fn new(base_url: impl Into<String>, fetcher: Arc<dyn HttpFetcher>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            fetcher,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the proxy URL for a provider, symbol and (Finnhub only) endpoint.
    ///
    /// The symbol is trimmed and upper-cased, so `aapl` and `AAPL ` share
    /// one cache entry.
    pub fn request_url(
        &self,
        provider: ApiProvider,
        symbol: &str,
        endpoint: Option<FinnhubEndpoint>,
    ) -> Result<String, MarketDataError> {
        build_request_url(&self.base_url, provider, symbol, endpoint)
    }

    /// Fetch a URL once, bypassing the cache.
    ///
    /// Used while configuring a widget to discover the response shape.
    pub async fn test_connection(&self, url: &str) -> Result<Value, MarketDataError> {
        debug!("Testing connection to {}", url);
        fetch_json(self.fetcher.as_ref(), url).await
    }
}

/// Build a proxy request URL without a client instance.
pub fn build_request_url(
    base_url: &str,
    provider: ApiProvider,
    symbol: &str,
    endpoint: Option<FinnhubEndpoint>,
) -> Result<String, MarketDataError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(MarketDataError::InvalidRequest(
            "Please enter a symbol".to_string(),
        ));
    }
    let base_url = base_url.trim_end_matches('/');
    let symbol = urlencoding::encode(&symbol);

    let url = match provider {
        ApiProvider::Finnhub => format!(
            "{}/finnhub?symbol={}&endpoint={}",
            base_url,
            symbol,
            endpoint.unwrap_or_default().as_str()
        ),
        ApiProvider::AlphaVantage => format!("{}/alphavantage?symbol={}", base_url, symbol),
    };
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!("finnhub".parse::<ApiProvider>().unwrap(), ApiProvider::Finnhub);
        assert_eq!(
            "AlphaVantage".parse::<ApiProvider>().unwrap(),
            ApiProvider::AlphaVantage
        );
        assert!(matches!(
            "yahoo".parse::<ApiProvider>(),
            Err(MarketDataError::UnsupportedProvider(name)) if name == "yahoo"
        ));
    }

    #[test]
    fn test_finnhub_url_defaults_to_quote() {
        let url = build_request_url("/api", ApiProvider::Finnhub, "aapl", None).unwrap();
        assert_eq!(url, "/api/finnhub?symbol=AAPL&endpoint=quote");
    }

    #[test]
    fn test_finnhub_url_with_endpoint() {
        let url = build_request_url(
            "http://localhost:8080/api/",
            ApiProvider::Finnhub,
            " msft ",
            Some(FinnhubEndpoint::Profile2),
        )
        .unwrap();
        assert_eq!(
            url,
            "http://localhost:8080/api/finnhub?symbol=MSFT&endpoint=profile2"
        );
    }

    #[test]
    fn test_alpha_vantage_url_ignores_endpoint() {
        let url = build_request_url(
            "/api",
            ApiProvider::AlphaVantage,
            "ibm",
            Some(FinnhubEndpoint::News),
        )
        .unwrap();
        assert_eq!(url, "/api/alphavantage?symbol=IBM");
    }

    #[test]
    fn test_symbol_is_encoded() {
        let url = build_request_url("/api", ApiProvider::Finnhub, "brk b", None).unwrap();
        assert_eq!(url, "/api/finnhub?symbol=BRK%20B&endpoint=quote");
    }

    #[test]
    fn test_empty_symbol_rejected() {
        let result = build_request_url("/api", ApiProvider::Finnhub, "   ", None);
        assert!(matches!(result, Err(MarketDataError::InvalidRequest(_))));
    }

    #[test]
    fn test_endpoint_round_trip_names() {
        for endpoint in [
            FinnhubEndpoint::Quote,
            FinnhubEndpoint::Profile2,
            FinnhubEndpoint::News,
        ] {
            assert_eq!(endpoint.as_str().parse::<FinnhubEndpoint>().unwrap(), endpoint);
        }
        assert!("candles".parse::<FinnhubEndpoint>().is_err());
    }
}
