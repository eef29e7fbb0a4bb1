//! Memoizing Wrapper Module
//!
//! Caches the result of an arbitrary asynchronous producer behind the
//! tiered cache. The producer's failures are never cached: a failed call
//! propagates verbatim and the next identical call runs the producer
//! again.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::tiered::TieredCache;

// == Memoizer ==
/// Wraps async producers with read-through caching on a [`TieredCache`].
///
/// Callers supply the cache key (typically via [`build_key`]) and their
/// own TTL choices; the memoizer has no knowledge of what is being
/// produced.
///
/// There is no request coalescing: two concurrent calls for the same
/// not-yet-cached key both invoke the producer, and the last write wins.
///
/// [`build_key`]: crate::key::build_key
pub struct Memoizer<T> {
    cache: Arc<TieredCache<T>>,
    memory_ttl: Option<Duration>,
    storage_ttl: Option<Duration>,
}

impl<T> Memoizer<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync,
{
    // == Constructor ==
    /// Creates a memoizer over the given cache using the cache's default
    /// TTLs.
    pub fn new(cache: Arc<TieredCache<T>>) -> Self {
        Self {
            cache,
            memory_ttl: None,
            storage_ttl: None,
        }
    }

    /// Overrides the memory-tier TTL for values stored by this memoizer.
    pub fn with_memory_ttl(mut self, ttl: Duration) -> Self {
        self.memory_ttl = Some(ttl);
        self
    }

    /// Overrides the persistent-tier TTL for values stored by this
    /// memoizer.
    pub fn with_storage_ttl(mut self, ttl: Duration) -> Self {
        self.storage_ttl = Some(ttl);
        self
    }

    // == Get Or Fetch ==
    /// Returns the cached value for `key`, or runs `producer` to make one.
    ///
    /// On a cache hit the producer is not invoked. On a miss the producer
    /// runs; a successful result is stored in both tiers before being
    /// returned, while an error propagates unchanged and nothing is
    /// stored (no negative caching).
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, producer: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.cache.get(key).await {
            return Ok(cached);
        }

        let value = producer().await?;
        self.cache
            .set(key, value.clone(), self.memory_ttl, self.storage_ttl)
            .await;
        Ok(value)
    }
}
