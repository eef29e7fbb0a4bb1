//! Memory Tier Statistics Module
//!
//! Snapshot of memory-tier occupancy and per-entry access counts.

use serde::Serialize;
use std::time::Duration;

// == Item Stats ==
/// Per-entry statistics included in a stats snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct ItemStats {
    /// The entry's key
    pub key: String,
    /// Number of successful retrievals of this entry
    pub hits: u64,
    /// Time since the entry was inserted, in milliseconds
    pub age_ms: u64,
}

// == Memory Stats ==
/// Snapshot of memory-tier statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MemoryStats {
    /// Current number of entries
    pub size: usize,
    /// Configured capacity
    pub max_size: usize,
    /// Hit rate, computed as `total_hits / (total_hits + size)`.
    ///
    /// Compatibility note: this is deliberately NOT the conventional
    /// hits/(hits+misses) ratio. Downstream consumers depend on this exact
    /// formula; do not "correct" it.
    pub hit_rate: f64,
    /// Per-entry breakdown
    pub items: Vec<ItemStats>,
}

impl MemoryStats {
    /// Computes the hit rate from a hit total and a live item count.
    pub(crate) fn compute_hit_rate(total_hits: u64, item_count: usize) -> f64 {
        let denominator = total_hits + item_count as u64;
        if denominator == 0 {
            0.0
        } else {
            total_hits as f64 / denominator as f64
        }
    }
}

impl ItemStats {
    pub(crate) fn new(key: &str, hits: u64, age: Duration) -> Self {
        Self {
            key: key.to_string(),
            hits,
            age_ms: age.as_millis() as u64,
        }
    }
}
