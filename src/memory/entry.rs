//! Memory Entry Module
//!
//! Defines the structure for individual memory-tier entries with TTL support.

use std::time::{Duration, Instant};

// == Memory Entry ==
/// Represents a single memory-tier entry with value and metadata.
#[derive(Debug, Clone)]
pub struct MemoryEntry<V> {
    /// The stored value
    pub value: V,
    /// Insertion time
    pub inserted_at: Instant,
    /// Time-to-live from insertion
    pub ttl: Duration,
    /// Number of successful retrievals of this entry
    pub hits: u64,
}

impl<V> MemoryEntry<V> {
    // == Constructor ==
    /// Creates a new entry with the given TTL, inserted now.
    pub fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
            ttl,
            hits: 0,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has outlived its TTL.
    ///
    /// The comparison is strict: an entry whose age equals its TTL exactly
    /// is still live. Only `age > ttl` counts as expired.
    pub fn is_expired(&self) -> bool {
        self.inserted_at.elapsed() > self.ttl
    }

    // == Age ==
    /// Returns how long ago the entry was inserted.
    pub fn age(&self) -> Duration {
        self.inserted_at.elapsed()
    }
}
