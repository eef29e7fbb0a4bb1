//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::time::Duration;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the query memory tier can hold
    pub memory_max_entries: usize,
    /// Default TTL for memory-tier entries without an explicit TTL
    pub memory_default_ttl: Duration,
    /// Default TTL for persistent-tier entries without an explicit TTL
    pub storage_default_ttl: Duration,
    /// Namespace prefix for persistent-tier keys
    pub storage_prefix: String,
    /// Maximum number of entries the asset store can hold
    pub asset_max_entries: usize,
    /// Default TTL for asset store entries
    pub asset_default_ttl: Duration,
    /// Background expiry sweep interval
    pub sweep_interval: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MEMORY_MAX_ENTRIES` - Maximum memory-tier entries (default: 200)
    /// - `CACHE_MEMORY_TTL_MS` - Default memory TTL in milliseconds (default: 300000)
    /// - `CACHE_STORAGE_TTL_MS` - Default persistent TTL in milliseconds (default: 86400000)
    /// - `CACHE_STORAGE_PREFIX` - Persistent key namespace prefix (default: "tiercache:")
    /// - `CACHE_ASSET_MAX_ENTRIES` - Maximum asset store entries (default: 100)
    /// - `CACHE_ASSET_TTL_MS` - Default asset TTL in milliseconds (default: 1800000)
    /// - `CACHE_SWEEP_INTERVAL_MS` - Expiry sweep frequency in milliseconds (default: 60000)
    pub fn from_env() -> Self {
        Self {
            memory_max_entries: env_usize("CACHE_MEMORY_MAX_ENTRIES", 200),
            memory_default_ttl: env_duration_ms("CACHE_MEMORY_TTL_MS", Duration::from_secs(300)),
            storage_default_ttl: env_duration_ms(
                "CACHE_STORAGE_TTL_MS",
                Duration::from_secs(86_400),
            ),
            storage_prefix: env::var("CACHE_STORAGE_PREFIX")
                .unwrap_or_else(|_| "tiercache:".to_string()),
            asset_max_entries: env_usize("CACHE_ASSET_MAX_ENTRIES", 100),
            asset_default_ttl: env_duration_ms("CACHE_ASSET_TTL_MS", Duration::from_secs(1800)),
            sweep_interval: env_duration_ms("CACHE_SWEEP_INTERVAL_MS", Duration::from_secs(60)),
        }
    }

    /// Sets the memory-tier capacity and default TTL.
    pub fn with_memory(mut self, max_entries: usize, default_ttl: Duration) -> Self {
        self.memory_max_entries = max_entries;
        self.memory_default_ttl = default_ttl;
        self
    }

    /// Sets the persistent-tier namespace prefix.
    pub fn with_storage_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.storage_prefix = prefix.into();
        self
    }

    /// Sets the persistent-tier default TTL.
    pub fn with_storage_ttl(mut self, default_ttl: Duration) -> Self {
        self.storage_default_ttl = default_ttl;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            memory_max_entries: 200,
            memory_default_ttl: Duration::from_secs(300),
            storage_default_ttl: Duration::from_secs(86_400),
            storage_prefix: "tiercache:".to_string(),
            asset_max_entries: 100,
            asset_default_ttl: Duration::from_secs(1800),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_duration_ms(name: &str, default: Duration) -> Duration {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}
