//! Finboard Market Data Crate
//!
//! This crate owns everything on the network side of the dashboard.
//!
//! # Overview
//!
//! - Proxy request URLs for Finnhub and Alpha Vantage widgets
//! - A process-wide, time-boxed response cache shared by all widgets
//! - Per-widget polling sessions with stale-while-revalidate semantics
//! - Upstream provider adapters used by the proxy server
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  WidgetConfig    | --> |  PollingSession  |  (one per widget, interval driven)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   FetchCache     |  (shared, keyed by URL, 30 s TTL)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   HttpFetcher    |  (reqwest, or a fake in tests)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  Provider proxy  |  (/api/finnhub, /api/alphavantage)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`ProviderClient`] - Builds proxy request URLs
//! - [`FetchCache`] - Shared per-URL response cache
//! - [`PollingSession`] - Repeating resolve of one URL with observable state
//! - [`SessionState`] - `{ data, loading, error }` snapshot
//! - [`MarketDataError`] / [`ErrorKind`] - Failures and their classification

pub mod cache;
pub mod errors;
pub mod polling;
pub mod provider;

pub use errors::{ErrorKind, MarketDataError};

pub use cache::{
    fetch_json, CacheEntry, Clock, FetchCache, FetchCacheConfig, FetchResponse, HttpFetcher,
    ManualClock, ReqwestFetcher, SystemClock, DEFAULT_CACHE_TTL,
};

pub use polling::{
    PollSpec, PollingSession, SessionError, SessionState, MAX_REFRESH_INTERVAL_SECS,
};

pub use provider::alpha_vantage::AlphaVantageProvider;
pub use provider::finnhub::FinnhubProvider;
pub use provider::{
    build_request_url, ApiProvider, FinnhubEndpoint, ProviderCapabilities, ProviderClient,
    ProxyQuery, RateLimit, UpstreamProvider, DEFAULT_API_BASE,
};
