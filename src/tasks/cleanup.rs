//! TTL Cleanup Task
//!
//! Optional background task that periodically removes expired cache entries.
//!
//! The cache expires lazily on its own; this task only accelerates the
//! reclaim of entries nobody reads again, keeping the stats report and
//! memory footprint closer to the live working set.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedTtlCache;

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// The task loops forever, sleeping for the configured interval between
/// sweeps. Abort the returned handle during shutdown.
///
/// # Example
/// ```ignore
/// let cache = SharedTtlCache::from_config(&config)?;
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), config.cleanup_interval);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: SharedTtlCache, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup_expired().await;

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
