//! Storage Backend Module
//!
//! The storage capability consumed by the persistent tier. Any conforming
//! host implementation (a browser-style local store, a file-backed K/V, an
//! in-memory fake) plugs in unmodified.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::Result;

// == Storage Backend Trait ==
/// Text-valued key/value storage consumed by [`PersistentStore`].
///
/// Key enumeration exists so the store can implement a namespace-scoped
/// `clear` without touching keys owned by other namespaces.
///
/// [`PersistentStore`]: crate::persist::PersistentStore
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Reads the value stored under `key`, or None if absent.
    async fn read(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, overwriting any previous value.
    async fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the value stored under `key`. Removing an absent key is not
    /// an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Enumerates every key currently held by the backend.
    async fn keys(&self) -> Result<Vec<String>>;
}

// == Memory Backend ==
/// In-process [`StorageBackend`] over a plain HashMap.
///
/// Serves tests and hosts that want the tiered interface without real
/// durability.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Creates a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.lock().await.keys().cloned().collect())
    }
}
