//! Error types for the caching subsystem
//!
//! Provides unified error handling using thiserror.
//!
//! Errors only exist at the capability seams (storage backend, codec,
//! serialization). The cache surface itself never returns them: the
//! persistent tier catches, logs, and degrades to a miss or no-op.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the caching subsystem.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Storage backend failure (quota exceeded, I/O error, ...)
    #[error("storage backend error: {0}")]
    Storage(String),

    /// Compression or decompression failure
    #[error("codec error: {0}")]
    Codec(String),

    /// Entry (de)serialization failure
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the caching subsystem.
pub type Result<T> = std::result::Result<T, CacheError>;
