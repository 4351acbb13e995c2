//! Cache Statistics Module
//!
//! Tracks lifetime performance counters and derives the per-snapshot stats
//! report returned by `TtlCache::stats`.

use serde::Serialize;

use crate::cache::entry::current_timestamp_ms;

// == Cache Stats ==
/// Lifetime performance counters.
///
/// These survive `clear`: they describe the cache's whole history, not its
/// current contents.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hit_count: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub miss_count: u64,
    /// Total number of `get` calls, hits and misses alike
    pub total_requests: u64,
    /// Number of entries evicted under size pressure
    pub evictions: u64,
    /// Number of entries reclaimed because their TTL elapsed
    pub expired_removed: u64,
    /// Timestamp of the last expired-entry sweep (Unix milliseconds)
    pub last_cleanup_ms: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self {
            last_cleanup_ms: current_timestamp_ms(),
            ..Self::default()
        }
    }

    // == Record Request ==
    /// Counts a `get` call, before its outcome is known.
    pub fn record_request(&mut self) {
        self.total_requests += 1;
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hit_count += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.miss_count += 1;
    }

    // == Record Eviction ==
    /// Counts entries removed under size pressure.
    pub fn record_evictions(&mut self, count: u64) {
        self.evictions += count;
    }

    // == Record Cleanup ==
    /// Counts expired entries reclaimed by a sweep and stamps the sweep time.
    pub fn record_cleanup(&mut self, removed: u64) {
        self.expired_removed += removed;
        self.last_cleanup_ms = current_timestamp_ms();
    }
}

// == Stats Report ==
/// Point-in-time snapshot derived from the counters and the live entry set.
///
/// Every ratio uses a `max(denominator, 1)` floor so an empty or never-used
/// cache reports zeros instead of dividing by zero.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    /// Number of live (unexpired) entries
    pub total_keys: usize,
    /// Sum of access_count across all live entries
    pub total_access: u64,
    /// total_access / max(total_keys, 1)
    pub hit_ratio: f64,
    /// hit_count / max(total_requests, 1) * 100
    pub hit_rate_percent: f64,
    /// miss_count / max(total_requests, 1) * 100
    pub miss_rate_percent: f64,
    /// Coarse estimate: key bytes plus serialized value bytes
    pub memory_usage_bytes: usize,
    /// Seconds since the last expired-entry sweep
    pub time_since_cleanup_secs: u64,
    /// total_keys / max_size * 100
    pub utilization_percent: f64,
    /// Same quantity as hit_ratio, reported under its conventional name
    pub average_access_per_key: f64,
}

impl StatsReport {
    /// Derives a report from the counters and the live entry aggregates.
    pub fn derive(
        stats: &CacheStats,
        total_keys: usize,
        total_access: u64,
        memory_usage_bytes: usize,
        max_size: usize,
    ) -> Self {
        let key_denom = total_keys.max(1) as f64;
        let request_denom = stats.total_requests.max(1) as f64;
        let now = current_timestamp_ms();

        let hit_ratio = total_access as f64 / key_denom;

        Self {
            total_keys,
            total_access,
            hit_ratio,
            hit_rate_percent: stats.hit_count as f64 / request_denom * 100.0,
            miss_rate_percent: stats.miss_count as f64 / request_denom * 100.0,
            memory_usage_bytes,
            time_since_cleanup_secs: now.saturating_sub(stats.last_cleanup_ms) / 1000,
            utilization_percent: total_keys as f64 / max_size.max(1) as f64 * 100.0,
            average_access_per_key: hit_ratio,
        }
    }
}
