//! Error types and failure classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The error enum for every fetch and request-building operation
//! - [`ErrorKind`]: Classification used by polling sessions to preserve the failure kind

mod kind;

pub use kind::ErrorKind;

use thiserror::Error;

/// Errors that can occur while building or resolving a widget request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// The proxy (or the provider behind it) answered with HTTP 429.
    /// Never cached; the next scheduled poll retries.
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited {
        /// The URL that was rate limited
        url: String,
    },

    /// The server answered with a non-success status.
    #[error("API Error: {status}")]
    HttpStatus {
        /// The URL that failed
        url: String,
        /// The HTTP status code
        status: u16,
    },

    /// The request never produced a response (DNS, connect, timeout).
    #[error("Network error: {message}")]
    Transport {
        /// The URL that failed
        url: String,
        /// The transport error message
        message: String,
    },

    /// The response body was not valid JSON.
    #[error("Invalid response payload: {0}")]
    InvalidPayload(String),

    /// The provider name is not one we know how to build URLs for.
    #[error("Unsupported API provider: {0}")]
    UnsupportedProvider(String),

    /// The request parameters were rejected before any network access.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl MarketDataError {
    /// Returns the classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use finboard_market_data::errors::{ErrorKind, MarketDataError};
    ///
    /// let error = MarketDataError::RateLimited { url: "/api/finnhub?symbol=AAPL".to_string() };
    /// assert_eq!(error.kind(), ErrorKind::RateLimited);
    ///
    /// let error = MarketDataError::HttpStatus { url: "/api/finnhub".to_string(), status: 502 };
    /// assert_eq!(error.kind(), ErrorKind::Network);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::HttpStatus { .. } | Self::Transport { .. } => ErrorKind::Network,
            Self::InvalidPayload(_) => ErrorKind::Payload,
            Self::UnsupportedProvider(_) | Self::InvalidRequest(_) => ErrorKind::Request,
        }
    }

    /// The HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited { .. } => Some(429),
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
