//! Tiered Cache Module
//!
//! One cache interface over both tiers: memory-tier speed with
//! persistent-tier durability. Reads check memory first and promote
//! persistent hits back into memory (write-back-on-read); writes and
//! invalidations go to both tiers.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::Config;
use crate::memory::MemoryStore;
use crate::persist::{Codec, PersistentStore, StorageBackend};

// == Tiered Cache ==
/// Two-tier cache facade composing a [`MemoryStore`] and a
/// [`PersistentStore`].
///
/// The two tiers carry independent TTLs: the memory copy of an entry may
/// expire before or after the persistent copy. That divergence is a
/// designed property - a short memory TTL bounds staleness of the hot
/// path while the durable copy keeps serving across restarts.
pub struct TieredCache<T> {
    memory: Arc<RwLock<MemoryStore<T>>>,
    persistent: PersistentStore<T>,
    storage_default_ttl: Duration,
}

impl<T> TieredCache<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync,
{
    // == Constructor ==
    /// Creates a tiered cache from configuration, an injected storage
    /// backend, and an optional compression codec.
    pub fn new(
        config: &Config,
        backend: Arc<dyn StorageBackend>,
        codec: Option<Arc<dyn Codec>>,
    ) -> Self {
        let memory = MemoryStore::new(config.memory_max_entries, config.memory_default_ttl);
        let mut persistent = PersistentStore::new(backend, config.storage_prefix.clone());
        if let Some(codec) = codec {
            persistent = persistent.with_codec(codec);
        }

        Self {
            memory: Arc::new(RwLock::new(memory)),
            persistent,
            storage_default_ttl: config.storage_default_ttl,
        }
    }

    // == Get ==
    /// Retrieves a value, checking the memory tier first.
    ///
    /// On a memory miss the persistent tier is consulted; a persistent hit
    /// is promoted into the memory tier (under the memory tier's default
    /// TTL) before being returned, so the next read is fast.
    pub async fn get(&self, key: &str) -> Option<T> {
        {
            let mut memory = self.memory.write().await;
            if let Some(value) = memory.get(key) {
                return Some(value);
            }
        }

        let value = self.persistent.get(key).await?;
        debug!("promoting '{}' from persistent tier", key);
        {
            let mut memory = self.memory.write().await;
            memory.set(key, value.clone(), None);
        }
        Some(value)
    }

    // == Set ==
    /// Writes a value to both tiers.
    ///
    /// `memory_ttl` and `storage_ttl` default to each tier's configured
    /// TTL and are deliberately independent of each other.
    pub async fn set(
        &self,
        key: &str,
        value: T,
        memory_ttl: Option<Duration>,
        storage_ttl: Option<Duration>,
    ) {
        {
            let mut memory = self.memory.write().await;
            memory.set(key, value.clone(), memory_ttl);
        }
        let ttl = storage_ttl.unwrap_or(self.storage_default_ttl);
        self.persistent.set(key, &value, ttl).await;
    }

    // == Invalidate ==
    /// Deletes a key from both tiers. Deleting an absent key is not an
    /// error.
    pub async fn invalidate(&self, key: &str) {
        {
            let mut memory = self.memory.write().await;
            memory.remove(key);
        }
        self.persistent.remove(key).await;
    }

    // == Invalidate Pattern ==
    /// Deletes every memory-tier key containing `pattern` as a plain
    /// substring (no glob/regex), cascading each deletion to the
    /// persistent tier. Returns the number of keys invalidated.
    ///
    /// Known limitation: only keys currently present in the memory tier
    /// are scanned. An entry living solely in the persistent tier (never
    /// read, or already expired from memory) is not discoverable here and
    /// survives until its TTL or a direct `invalidate`.
    pub async fn invalidate_pattern(&self, pattern: &str) -> usize {
        let matches: Vec<String> = {
            let memory = self.memory.read().await;
            memory
                .keys()
                .into_iter()
                .filter(|key| key.contains(pattern))
                .collect()
        };

        for key in &matches {
            self.invalidate(key).await;
        }
        matches.len()
    }

    // == Clear ==
    /// Clears both tiers unconditionally.
    pub async fn clear(&self) {
        {
            let mut memory = self.memory.write().await;
            memory.clear();
        }
        self.persistent.clear().await;
    }

    // == Memory Handle ==
    /// Shared handle to the memory tier, for expiry sweeps and
    /// tier-level inspection.
    pub fn memory(&self) -> Arc<RwLock<MemoryStore<T>>> {
        Arc::clone(&self.memory)
    }
}
