//! Provider abstractions and implementations.
//!
//! This module contains:
//! - [`ProviderClient`]: builds the proxy request URL a widget polls
//! - The [`UpstreamProvider`] trait the proxy uses to reach a real provider
//! - Provider capabilities and published rate limits
//! - Concrete upstream providers (Finnhub, Alpha Vantage)
//!
//! # Architecture
//!
//! ```text
//! Widget --request_url--> /api/<provider>?symbol=.. --UpstreamProvider--> provider API
//! ```
//!
//! The client side only ever sees proxy URLs. Credentials and provider
//! specific rate-limit markers stay on the proxy side.

mod capabilities;
mod client;
mod traits;

pub mod alpha_vantage;
pub mod finnhub;

// Re-exports
pub use capabilities::{ProviderCapabilities, RateLimit};
pub use client::{build_request_url, ApiProvider, FinnhubEndpoint, ProviderClient, DEFAULT_API_BASE};
pub use traits::{ProxyQuery, UpstreamProvider};
