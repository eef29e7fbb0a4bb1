//! Expiry Sweep Task
//!
//! Background task that periodically removes expired memory-tier entries.
//! Lazy expiry on access remains the correctness mechanism; the sweep
//! only bounds how long a stale entry can occupy a slot unobserved.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::memory::MemoryStore;

/// Spawns a background task that periodically sweeps expired entries
/// from a shared memory store.
///
/// The task sleeps for `interval` between sweeps and runs until aborted.
///
/// # Arguments
/// * `store` - Shared reference to the memory store to sweep
/// * `interval` - Time between sweep runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort it
/// during shutdown.
pub fn spawn_sweep_task<V>(
    store: Arc<RwLock<MemoryStore<V>>>,
    interval: Duration,
) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(
            "starting expiry sweep task with interval of {} ms",
            interval.as_millis()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut store = store.write().await;
                store.sweep_expired()
            };

            if removed > 0 {
                info!("expiry sweep removed {} stale entries", removed);
            } else {
                debug!("expiry sweep found no stale entries");
            }
        }
    })
}
