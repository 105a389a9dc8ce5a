//! Time-boxed response cache keyed by request URL.
//!
//! Entries are never evicted. A stale entry stays in the map until the next
//! successful fetch of the same URL overwrites it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use super::clock::Clock;
use super::fetcher::{fetch_json, HttpFetcher};
use crate::errors::MarketDataError;

/// Default freshness window of a cached response.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_millis(30_000);

/// Fetch cache configuration.
#[derive(Clone, Debug)]
pub struct FetchCacheConfig {
    /// How long a response is served without touching the network.
    pub ttl: Duration,
}

impl Default for FetchCacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_CACHE_TTL,
        }
    }
}

/// A cached response. Immutable once written.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub url: String,
    pub payload: Arc<Value>,
    pub fetched_at_ms: i64,
}

impl CacheEntry {
    /// Fresh while `now - fetched_at < ttl`.
    pub fn is_fresh(&self, now_ms: i64, ttl: Duration) -> bool {
        now_ms - self.fetched_at_ms < ttl.as_millis() as i64
    }
}

/// Process-wide response cache shared by all polling sessions.
///
/// Two widgets polling the same URL share one entry. Concurrent callers that
/// find the same URL stale each issue their own request; the last write wins.
pub struct FetchCache {
    entries: Mutex<HashMap<String, Arc<CacheEntry>>>,
    fetcher: Arc<dyn HttpFetcher>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl FetchCache {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, clock: Arc<dyn Clock>) -> Self {
        Self::with_config(fetcher, clock, FetchCacheConfig::default())
    }

    pub fn with_config(
        fetcher: Arc<dyn HttpFetcher>,
        clock: Arc<dyn Clock>,
        config: FetchCacheConfig,
    ) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            fetcher,
            clock,
            ttl: config.ttl,
        }
    }

    /// Lock the entries map, recovering from poison if necessary.
    ///
    /// Entries are replaced whole, so a poisoned map still holds only
    /// complete entries.
    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, Arc<CacheEntry>>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("Fetch cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Resolve a URL to its JSON payload.
    ///
    /// A fresh entry is returned without network access. Otherwise exactly one
    /// request is made; only a successful JSON answer is written to the cache.
    pub async fn resolve(&self, url: &str) -> Result<Arc<Value>, MarketDataError> {
        let now = self.clock.now_millis();
        let cached = self.lock_entries().get(url).cloned();
        if let Some(entry) = cached {
            if entry.is_fresh(now, self.ttl) {
                debug!("Cache hit for {} (age {} ms)", url, now - entry.fetched_at_ms);
                return Ok(entry.payload.clone());
            }
        }

        debug!("Cache miss for {}", url);
        let payload = Arc::new(fetch_json(self.fetcher.as_ref(), url).await?);

        let entry = CacheEntry {
            url: url.to_string(),
            payload: payload.clone(),
            fetched_at_ms: self.clock.now_millis(),
        };
        self.lock_entries().insert(url.to_string(), Arc::new(entry));

        Ok(payload)
    }

    /// Current entry for a URL, fresh or not.
    pub fn entry(&self, url: &str) -> Option<Arc<CacheEntry>> {
        self.lock_entries().get(url).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }
}
