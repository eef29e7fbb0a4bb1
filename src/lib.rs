//! Tiercache - a two-tier caching subsystem
//!
//! Composes a capacity-bounded in-memory store (TTL expiration + LRU
//! eviction) with a durable key/value tier behind an injected storage
//! capability, plus the glue a caching client needs: canonical key
//! construction, producer memoization, and process-wide registry handles.

pub mod config;
pub mod error;
pub mod key;
pub mod memo;
pub mod memory;
pub mod persist;
pub mod registry;
pub mod tasks;
pub mod tiered;

pub use config::Config;
pub use error::{CacheError, Result};
pub use key::build_key;
pub use memo::Memoizer;
pub use memory::{ItemStats, MemoryStats, MemoryStore};
pub use persist::{Codec, DeflateCodec, MemoryBackend, PersistentStore, StorageBackend};
pub use registry::AssetStore;
pub use tasks::spawn_sweep_task;
pub use tiered::TieredCache;
