use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::MarketDataError;

/// Raw answer of a GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network seam used by the fetch cache and connection tests.
///
/// Implementations perform exactly one request per call. Status handling
/// (429, non-success) is done by [`fetch_json`], not by the fetcher.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<FetchResponse, MarketDataError>;
}

/// [`HttpFetcher`] backed by reqwest.
///
/// Relative URLs (`/api/finnhub?..`) are resolved against `base_url`.
pub struct ReqwestFetcher {
    client: Client,
    base_url: Option<String>,
}

impl ReqwestFetcher {
    pub fn new(base_url: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.map(|b| b.trim_end_matches('/').to_string()),
        }
    }

    fn absolute_url(&self, url: &str) -> String {
        match &self.base_url {
            Some(base) if url.starts_with('/') => format!("{}{}", base, url),
            _ => url.to_string(),
        }
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse, MarketDataError> {
        let target = self.absolute_url(url);
        debug!("GET {}", target);

        let response = self.client.get(&target).send().await.map_err(|e| {
            let message = if e.is_timeout() {
                "request timed out".to_string()
            } else {
                e.to_string()
            };
            MarketDataError::Transport {
                url: url.to_string(),
                message,
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| MarketDataError::Transport {
                url: url.to_string(),
                message: format!("Failed to read response: {}", e),
            })?;

        Ok(FetchResponse { status, body })
    }
}

/// Perform one request and interpret the answer as JSON.
///
/// - 429 fails with [`MarketDataError::RateLimited`]
/// - any other non-success status fails with [`MarketDataError::HttpStatus`]
/// - a body that is not JSON fails with [`MarketDataError::InvalidPayload`]
pub async fn fetch_json(fetcher: &dyn HttpFetcher, url: &str) -> Result<Value, MarketDataError> {
    let response = fetcher.get(url).await?;

    if response.status == 429 {
        warn!("Rate limited by {}", url);
        return Err(MarketDataError::RateLimited {
            url: url.to_string(),
        });
    }

    if !response.is_success() {
        warn!("HTTP {} from {}", response.status, url);
        return Err(MarketDataError::HttpStatus {
            url: url.to_string(),
            status: response.status,
        });
    }

    serde_json::from_str(&response.body)
        .map_err(|e| MarketDataError::InvalidPayload(format!("{}: {}", url, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FixedFetcher(FetchResponse);

    #[async_trait]
    impl HttpFetcher for FixedFetcher {
        async fn get(&self, _url: &str) -> Result<FetchResponse, MarketDataError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_absolute_url_joins_relative_paths() {
        let fetcher = ReqwestFetcher::new(
            Some("http://localhost:8080/".to_string()),
            Duration::from_secs(5),
        );
        assert_eq!(
            fetcher.absolute_url("/api/finnhub?symbol=AAPL"),
            "http://localhost:8080/api/finnhub?symbol=AAPL"
        );
        assert_eq!(
            fetcher.absolute_url("https://example.com/x"),
            "https://example.com/x"
        );
    }

    #[test]
    fn test_absolute_url_without_base() {
        let fetcher = ReqwestFetcher::new(None, Duration::from_secs(5));
        assert_eq!(fetcher.absolute_url("/api/x"), "/api/x");
    }

    #[tokio::test]
    async fn test_fetch_json_success() {
        let fetcher = FixedFetcher(FetchResponse::ok(r#"{"c": 150.25}"#));
        let value = fetch_json(&fetcher, "/api/finnhub").await.unwrap();
        assert_eq!(value, json!({"c": 150.25}));
    }

    #[tokio::test]
    async fn test_fetch_json_rate_limited() {
        let fetcher = FixedFetcher(FetchResponse::new(429, r#"{"error":"limit"}"#));
        let err = fetch_json(&fetcher, "/api/finnhub").await.unwrap_err();
        assert!(matches!(err, MarketDataError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn test_fetch_json_http_status() {
        let fetcher = FixedFetcher(FetchResponse::new(500, "oops"));
        let err = fetch_json(&fetcher, "/api/finnhub").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "API Error: 500");
    }

    #[tokio::test]
    async fn test_fetch_json_invalid_body() {
        let fetcher = FixedFetcher(FetchResponse::ok("<html>"));
        let err = fetch_json(&fetcher, "/api/finnhub").await.unwrap_err();
        assert!(matches!(err, MarketDataError::InvalidPayload(_)));
    }
}
