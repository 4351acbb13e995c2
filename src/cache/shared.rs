//! Shared Cache Handle
//!
//! Cloneable, thread-safe wrapper for use from many concurrent tasks.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use crate::cache::{StatsReport, TtlCache};
use crate::config::CacheConfig;
use crate::error::Result;

// == Shared TTL Cache ==
/// Cloneable handle to a cache shared across tasks.
///
/// Each operation holds the write lock for its whole read-modify-write, so
/// no caller can ever observe the value map and expiry map out of sync. This
/// is the "one cache per process" deployment shape: construct one handle at
/// startup and clone it into whatever needs caching. Tests construct their
/// own isolated handles; there is no global instance.
#[derive(Clone)]
pub struct SharedTtlCache {
    inner: Arc<RwLock<TtlCache>>,
}

impl SharedTtlCache {
    /// Wraps an existing cache in a shared handle.
    pub fn new(cache: TtlCache) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cache)),
        }
    }

    /// Builds the cache from configuration and wraps it.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Ok(Self::new(TtlCache::new(config)?))
    }

    /// Retrieves a value by key.
    pub async fn get(&self, key: &str) -> Option<Value> {
        self.inner.write().await.get(key)
    }

    /// Stores a key-value pair with optional TTL in seconds.
    pub async fn set(&self, key: String, value: Value, ttl: Option<u64>) -> Result<()> {
        self.inner.write().await.set(key, value, ttl)
    }

    /// Removes a key; missing keys are a no-op success.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        self.inner.write().await.delete(key)
    }

    /// Empties the cache, keeping lifetime counters.
    pub async fn clear(&self) -> Result<()> {
        self.inner.write().await.clear()
    }

    /// Sweeps expired entries; returns the number removed.
    pub async fn cleanup_expired(&self) -> usize {
        self.inner.write().await.cleanup_expired()
    }

    /// Returns a point-in-time stats report.
    pub async fn stats(&self) -> StatsReport {
        self.inner.write().await.stats()
    }

    /// Compute-if-absent over the shared cache.
    ///
    /// The producer runs inside the critical section and must not call back
    /// into this cache; it receives no handle, which makes that hard to get
    /// wrong by accident.
    pub async fn get_or_compute<F>(&self, key: &str, ttl: Option<u64>, producer: F) -> Result<Value>
    where
        F: FnOnce() -> Value,
    {
        self.inner.write().await.get_or_compute(key, ttl, producer)
    }

    /// Current number of stored entries.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Returns true if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
