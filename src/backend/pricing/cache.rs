//! Exchange-rate cache with per-entry expiry.

use async_trait::async_trait;
use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;

use crate::shared::Currency;

/// Cache key for the rate of `currency`, e.g. `exchange_rate_USD`
pub fn rate_cache_key(currency: Currency) -> String {
    format!("exchange_rate_{}", currency.code())
}

/// Best-effort key/value store with TTL.
///
/// Neither method can fail: an unavailable cache behaves like an empty one.
#[async_trait]
pub trait RateCache: Send + Sync + std::fmt::Debug {
    /// Get a live value by key.
    async fn get(&self, key: &str) -> Option<String>;

    /// Store a value for `ttl`.
    async fn set(&self, key: &str, value: String, ttl: Duration);
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-process rate cache.
#[derive(Debug, Default)]
pub struct MemoryRateCache {
    entries: DashMap<String, CacheEntry>,
}

impl MemoryRateCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn evict_expired(&self) {
        self.entries.retain(|_, entry| !entry.is_expired());
    }
}

#[async_trait]
impl RateCache for MemoryRateCache {
    async fn get(&self, key: &str) -> Option<String> {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired() {
                return Some(entry.value.clone());
            }
            drop(entry);
            self.entries.remove(key);
        }
        None
    }

    /// Expired entries are dropped on every write.
    async fn set(&self, key: &str, value: String, ttl: Duration) {
        self.evict_expired();
        self.entries.insert(
            key.to_owned(),
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }
}
