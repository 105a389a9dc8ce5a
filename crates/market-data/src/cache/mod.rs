//! Process-wide, time-boxed response cache shared by every widget.
//!
//! - [`FetchCache`]: per-URL cache with a freshness window (30 s by default)
//! - [`HttpFetcher`]: the network seam, with [`ReqwestFetcher`] as the real implementation
//! - [`Clock`]: the time seam, with [`SystemClock`] and [`ManualClock`]

mod clock;
mod fetch_cache;
mod fetcher;

pub use clock::{Clock, ManualClock, SystemClock};
pub use fetch_cache::{CacheEntry, FetchCache, FetchCacheConfig, DEFAULT_CACHE_TTL};
pub use fetcher::{fetch_json, FetchResponse, HttpFetcher, ReqwestFetcher};
