//! Global Registry Module
//!
//! Process-wide shared cache instances: one tiered cache for query
//! results and one bounded memory store for derived assets (decoded
//! images and the like). Both are constructed lazily on first use, never
//! at load time, and can be explicitly installed or torn down so test
//! runs do not leak state across cases.

use std::sync::{Arc, RwLock as StdRwLock};
use std::time::Duration;

use once_cell::sync::Lazy;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::memory::{MemoryStats, MemoryStore};
use crate::persist::{Codec, MemoryBackend, StorageBackend};
use crate::tiered::TieredCache;

// == Registry ==
/// The shared cache instances owned by the process.
pub struct Registry {
    queries: Arc<TieredCache<Value>>,
    assets: Arc<RwLock<MemoryStore<Vec<u8>>>>,
}

impl Registry {
    /// Builds a registry from configuration plus injected capabilities.
    pub fn new(
        config: &Config,
        backend: Arc<dyn StorageBackend>,
        codec: Option<Arc<dyn Codec>>,
    ) -> Self {
        Self {
            queries: Arc::new(TieredCache::new(config, backend, codec)),
            assets: Arc::new(RwLock::new(MemoryStore::new(
                config.asset_max_entries,
                config.asset_default_ttl,
            ))),
        }
    }

    /// The shared query-result cache.
    pub fn queries(&self) -> Arc<TieredCache<Value>> {
        Arc::clone(&self.queries)
    }

    /// A delegating handle to the shared asset store.
    pub fn assets(&self) -> AssetStore {
        AssetStore {
            inner: Arc::clone(&self.assets),
        }
    }
}

/// The process-wide registry slot. Empty until first use or `init`.
static REGISTRY: Lazy<StdRwLock<Option<Arc<Registry>>>> = Lazy::new(|| StdRwLock::new(None));

// == Init ==
/// Installs the process-wide registry with explicit configuration and
/// capabilities, replacing any previously installed or lazily-built one.
pub fn init(
    config: &Config,
    backend: Arc<dyn StorageBackend>,
    codec: Option<Arc<dyn Codec>>,
) -> Arc<Registry> {
    let registry = Arc::new(Registry::new(config, backend, codec));
    *REGISTRY.write().expect("registry lock poisoned") = Some(Arc::clone(&registry));
    registry
}

// == Teardown ==
/// Drops the process-wide registry. The next access lazily builds a
/// fresh one. Intended for test isolation and host shutdown.
pub fn teardown() {
    *REGISTRY.write().expect("registry lock poisoned") = None;
}

// == Query Cache Handle ==
/// The shared query-result cache, built on first use if `init` was never
/// called (env-derived config, in-process backend, no codec).
pub fn query_cache() -> Arc<TieredCache<Value>> {
    current().queries()
}

// == Asset Store Handle ==
/// The shared asset store, built on first use if `init` was never
/// called.
pub fn asset_store() -> AssetStore {
    current().assets()
}

fn current() -> Arc<Registry> {
    if let Some(registry) = REGISTRY.read().expect("registry lock poisoned").as_ref() {
        return Arc::clone(registry);
    }

    let mut slot = REGISTRY.write().expect("registry lock poisoned");
    // Someone else may have filled the slot between the locks
    if let Some(registry) = slot.as_ref() {
        return Arc::clone(registry);
    }

    let registry = Arc::new(Registry::new(
        &Config::from_env(),
        Arc::new(MemoryBackend::new()),
        None,
    ));
    *slot = Some(Arc::clone(&registry));
    registry
}

// == Asset Store ==
/// Stable handle over the shared asset store.
///
/// Methods simply delegate to the underlying singleton through its lock;
/// the handle itself is cheap to clone and pass around.
#[derive(Clone)]
pub struct AssetStore {
    inner: Arc<RwLock<MemoryStore<Vec<u8>>>>,
}

impl AssetStore {
    /// Retrieves a cached asset.
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.inner.write().await.get(key)
    }

    /// Stores an asset with an optional TTL.
    pub async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) {
        self.inner.write().await.set(key, value, ttl);
    }

    /// Checks whether a live asset exists for the key.
    pub async fn has(&self, key: &str) -> bool {
        self.inner.write().await.has(key)
    }

    /// Removes an asset. Returns whether one existed.
    pub async fn remove(&self, key: &str) -> bool {
        self.inner.write().await.remove(key)
    }

    /// Removes every asset.
    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }

    /// Sweeps expired assets, then returns the remaining count.
    pub async fn len(&self) -> usize {
        self.inner.write().await.len()
    }

    /// Returns true if the store holds no live assets.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Returns a statistics snapshot.
    pub async fn stats(&self) -> MemoryStats {
        self.inner.read().await.stats()
    }

    /// Shared handle to the underlying store, for expiry sweeps.
    pub fn store(&self) -> Arc<RwLock<MemoryStore<Vec<u8>>>> {
        Arc::clone(&self.inner)
    }
}
