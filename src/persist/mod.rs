//! Persistent Tier Module
//!
//! Durable key/value cache layer atop an injected storage capability, with
//! optional best-effort compression.

mod backend;
mod codec;
mod store;

// Re-export public types
pub use backend::{MemoryBackend, StorageBackend};
pub use codec::{Codec, DeflateCodec};
pub use store::PersistentStore;
