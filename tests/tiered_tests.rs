//! Integration Tests for the Tiered Cache
//!
//! Exercises the cross-component behavior: tier promotion, divergent
//! TTLs, memoization, corruption self-healing, and degradation under a
//! failing storage backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use tiercache::{
    build_key, CacheError, Config, Memoizer, MemoryBackend, Result, StorageBackend, TieredCache,
};

// == Helper Functions ==

fn test_config() -> Config {
    Config::default()
        .with_memory(50, Duration::from_secs(300))
        .with_storage_prefix("it:")
        .with_storage_ttl(Duration::from_secs(3600))
}

fn new_cache(backend: Arc<dyn StorageBackend>) -> TieredCache<Value> {
    TieredCache::new(&test_config(), backend, None)
}

/// Backend whose every operation fails, for degradation tests.
struct FailingBackend;

#[async_trait]
impl StorageBackend for FailingBackend {
    async fn read(&self, _key: &str) -> Result<Option<String>> {
        Err(CacheError::Storage("read failed".to_string()))
    }

    async fn write(&self, _key: &str, _value: &str) -> Result<()> {
        Err(CacheError::Storage("write failed".to_string()))
    }

    async fn remove(&self, _key: &str) -> Result<()> {
        Err(CacheError::Storage("remove failed".to_string()))
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Err(CacheError::Storage("keys failed".to_string()))
    }
}

// == Tier Promotion Tests ==

#[tokio::test]
async fn test_persistent_hit_promotes_into_memory() {
    let cache = new_cache(Arc::new(MemoryBackend::new()));

    cache.set("key1", json!("v1"), None, None).await;

    // Drop the memory copy; the durable copy remains
    cache.memory().write().await.clear();
    assert!(!cache.memory().write().await.has("key1"));

    // The read resolves via the persistent tier...
    assert_eq!(cache.get("key1").await, Some(json!("v1")));

    // ...and repopulated the memory tier as a side effect
    assert!(cache.memory().write().await.has("key1"));
}

#[tokio::test]
async fn test_divergent_tier_ttls() {
    let cache = new_cache(Arc::new(MemoryBackend::new()));

    // Memory copy expires almost immediately; durable copy lives on
    cache
        .set(
            "key1",
            json!("v"),
            Some(Duration::from_millis(30)),
            Some(Duration::from_secs(10)),
        )
        .await;

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(!cache.memory().write().await.has("key1"));

    // Still served, from the persistent tier, and promoted back
    assert_eq!(cache.get("key1").await, Some(json!("v")));
    assert!(cache.memory().write().await.has("key1"));
}

#[tokio::test]
async fn test_both_tiers_expired_is_a_miss() {
    let cache = new_cache(Arc::new(MemoryBackend::new()));

    cache
        .set(
            "key1",
            json!("v"),
            Some(Duration::from_millis(30)),
            Some(Duration::from_millis(30)),
        )
        .await;

    tokio::time::sleep(Duration::from_millis(80)).await;

    assert_eq!(cache.get("key1").await, None);
}

// == Invalidation Tests ==

#[tokio::test]
async fn test_invalidate_pattern_cascades_to_persistent_tier() {
    let cache = new_cache(Arc::new(MemoryBackend::new()));

    cache.set("reviews:page:1", json!(1), None, None).await;
    cache.set("reviews:page:2", json!(2), None, None).await;
    cache.set("users:1", json!(3), None, None).await;

    assert_eq!(cache.invalidate_pattern("reviews").await, 2);

    // Clearing memory proves the persistent copies are gone too
    cache.memory().write().await.clear();
    assert_eq!(cache.get("reviews:page:1").await, None);
    assert_eq!(cache.get("reviews:page:2").await, None);
    assert_eq!(cache.get("users:1").await, Some(json!(3)));
}

// == Corruption Self-Healing Tests ==

#[tokio::test]
async fn test_corrupted_persistent_value_heals_to_miss() {
    let backend = Arc::new(MemoryBackend::new());
    let cache = new_cache(backend.clone());

    // A value written by some earlier, buggier process
    backend.write("it:poisoned", "\u{1}garbage\u{2}").await.unwrap();

    assert_eq!(cache.get("poisoned").await, None);
    // The offending key was removed from storage
    assert_eq!(backend.read("it:poisoned").await.unwrap(), None);

    // The slot is usable again
    cache.set("poisoned", json!("clean"), None, None).await;
    assert_eq!(cache.get("poisoned").await, Some(json!("clean")));
}

// == Degradation Tests ==

#[tokio::test]
async fn test_failing_backend_degrades_to_memory_only() {
    let cache = new_cache(Arc::new(FailingBackend));

    // Writes and reads must not panic or error; memory tier still works
    cache.set("key1", json!(1), None, None).await;
    assert_eq!(cache.get("key1").await, Some(json!(1)));

    // Once the memory copy is gone the cache simply always misses
    cache.memory().write().await.clear();
    assert_eq!(cache.get("key1").await, None);

    // Invalidation and clear stay safe no-ops on the broken tier
    cache.invalidate("key1").await;
    cache.clear().await;
}

// == Memoization Tests ==

#[tokio::test]
async fn test_memoizer_with_built_keys() {
    let cache = Arc::new(new_cache(Arc::new(MemoryBackend::new())));
    let memo = Memoizer::new(Arc::clone(&cache));
    let calls = AtomicUsize::new(0);

    // Argument order must not defeat memoization
    let key_a = build_key("reviews", [("status", json!("A")), ("page", json!(1))]);
    let key_b = build_key("reviews", [("page", json!(1)), ("status", json!("A"))]);
    assert_eq!(key_a, key_b);

    for key in [&key_a, &key_b] {
        let result: std::result::Result<Value, String> = memo
            .get_or_fetch(key, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(json!(["review"]))
            })
            .await;
        assert_eq!(result.unwrap(), json!(["review"]));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_memoizer_hits_persistent_tier_after_memory_expiry() {
    let cache = Arc::new(new_cache(Arc::new(MemoryBackend::new())));
    let memo = Memoizer::new(Arc::clone(&cache))
        .with_memory_ttl(Duration::from_millis(30))
        .with_storage_ttl(Duration::from_secs(10));
    let calls = AtomicUsize::new(0);

    let producer = || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok::<_, String>(json!("produced"))
    };

    memo.get_or_fetch("slow:query", producer).await.unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;

    // Memory copy expired, but the durable copy still short-circuits the
    // producer
    let second = memo.get_or_fetch("slow:query", producer).await.unwrap();
    assert_eq!(second, json!("produced"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// == Concurrency Tests ==

#[tokio::test]
async fn test_concurrent_writes_last_writer_wins() {
    let cache = Arc::new(new_cache(Arc::new(MemoryBackend::new())));

    // Two logically concurrent writers race on the same key. Either may
    // win; the accepted semantics is last-writer-wins, so the only
    // requirement is a coherent final value.
    let a = {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move { cache.set("raced", json!("from_a"), None, None).await })
    };
    let b = {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move { cache.set("raced", json!("from_b"), None, None).await })
    };
    a.await.unwrap();
    b.await.unwrap();

    let value = cache.get("raced").await.unwrap();
    assert!(value == json!("from_a") || value == json!("from_b"));
}

#[tokio::test]
async fn test_concurrent_memoizer_misses_both_produce() {
    let cache = Arc::new(new_cache(Arc::new(MemoryBackend::new())));
    let calls = Arc::new(AtomicUsize::new(0));

    // No single-flight: concurrent misses for the same key may each run
    // the producer. Both tasks must still resolve to a produced value.
    let mut handles = Vec::new();
    for _ in 0..2 {
        let memo = Memoizer::new(Arc::clone(&cache));
        let calls = Arc::clone(&calls);
        handles.push(tokio::spawn(async move {
            memo.get_or_fetch("uncoalesced", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok::<_, String>(json!("value"))
            })
            .await
            .unwrap()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), json!("value"));
    }

    let producer_runs = calls.load(Ordering::SeqCst);
    assert!(producer_runs >= 1 && producer_runs <= 2);
    assert_eq!(cache.get("uncoalesced").await, Some(json!("value")));
}
