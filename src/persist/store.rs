//! Persistent Store Module
//!
//! Durable cache tier over an injected [`StorageBackend`], with optional
//! best-effort compression. Nothing here ever surfaces an error: backend
//! failures are logged and degrade the operation to a miss or no-op, and
//! corrupt or expired entries are deleted on access (self-healing) rather
//! than returned.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::persist::{Codec, StorageBackend};

// == Persistent Envelope ==
/// What actually lands in storage: the value plus expiry metadata.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    data: T,
    stored_at: DateTime<Utc>,
    ttl_ms: u64,
}

// == Persistent Store ==
/// Durable key/value cache layer with namespaced keys.
///
/// Values are serialized to a JSON envelope carrying `stored_at` and the
/// TTL. When a codec is attached, the envelope is compressed and
/// base64-encoded so the binary payload fits a text-valued backend.
pub struct PersistentStore<T> {
    backend: Arc<dyn StorageBackend>,
    codec: Option<Arc<dyn Codec>>,
    prefix: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PersistentStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    // == Constructor ==
    /// Creates a store over `backend`, owning every key under `prefix`.
    pub fn new(backend: Arc<dyn StorageBackend>, prefix: impl Into<String>) -> Self {
        Self {
            backend,
            codec: None,
            prefix: prefix.into(),
            _marker: PhantomData,
        }
    }

    /// Attaches a compression codec.
    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = Some(codec);
        self
    }

    // == Set ==
    /// Serializes and writes a value under the namespaced key.
    ///
    /// Codec failures fall back to writing the uncompressed envelope;
    /// backend failures (quota exceeded, I/O error) are logged and the
    /// write degrades to a silent no-op.
    pub async fn set(&self, key: &str, value: &T, ttl: Duration) {
        let envelope = Envelope {
            data: value,
            stored_at: Utc::now(),
            ttl_ms: ttl.as_millis() as u64,
        };

        let json = match serde_json::to_string(&envelope) {
            Ok(json) => json,
            Err(e) => {
                warn!("persistent set of '{}' failed to serialize: {}", key, e);
                return;
            }
        };

        let payload = self.encode(&json).await;
        if let Err(e) = self.backend.write(&self.storage_key(key), &payload).await {
            warn!("persistent set of '{}' failed, entry not stored: {}", key, e);
        }
    }

    // == Get ==
    /// Reads and deserializes the value stored under the namespaced key.
    ///
    /// Returns None when the key is absent, the backend fails, the stored
    /// text cannot be decoded/parsed (the entry is deleted), or the entry
    /// has outlived its TTL (the entry is deleted).
    pub async fn get(&self, key: &str) -> Option<T> {
        let storage_key = self.storage_key(key);

        let raw = match self.backend.read(&storage_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("persistent get of '{}' failed, treating as miss: {}", key, e);
                return None;
            }
        };

        let json = self.decode(raw).await;
        let envelope: Envelope<T> = match serde_json::from_str(&json) {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!("removing undecodable persistent entry '{}': {}", key, e);
                self.remove_raw(&storage_key).await;
                return None;
            }
        };

        let age_ms = Utc::now()
            .signed_duration_since(envelope.stored_at)
            .num_milliseconds();
        if age_ms > i64::try_from(envelope.ttl_ms).unwrap_or(i64::MAX) {
            debug!("removing expired persistent entry '{}'", key);
            self.remove_raw(&storage_key).await;
            return None;
        }

        Some(envelope.data)
    }

    // == Remove ==
    /// Removes the entry stored under the namespaced key.
    pub async fn remove(&self, key: &str) {
        self.remove_raw(&self.storage_key(key)).await;
    }

    // == Clear ==
    /// Removes every entry under this store's namespace prefix.
    ///
    /// Keys owned by other namespaces in the same backend are left alone.
    pub async fn clear(&self) {
        let keys = match self.backend.keys().await {
            Ok(keys) => keys,
            Err(e) => {
                warn!("persistent clear failed to enumerate keys: {}", e);
                return;
            }
        };

        for key in keys.into_iter().filter(|k| k.starts_with(&self.prefix)) {
            self.remove_raw(&key).await;
        }
    }

    /// Maps a logical key to its namespaced storage key.
    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Removes a storage-level key, logging instead of failing.
    async fn remove_raw(&self, storage_key: &str) {
        if let Err(e) = self.backend.remove(storage_key).await {
            warn!("persistent remove of '{}' failed: {}", storage_key, e);
        }
    }

    /// Compresses serialized text when a codec is attached.
    ///
    /// The compressed bytes are base64-encoded so they survive a
    /// text-valued backend. A codec failure degrades to plain text.
    async fn encode(&self, json: &str) -> String {
        if let Some(codec) = &self.codec {
            match codec.compress(json).await {
                Ok(bytes) => return BASE64.encode(bytes),
                Err(e) => warn!("compression failed, storing uncompressed: {}", e),
            }
        }
        json.to_string()
    }

    /// Recovers serialized text from a stored payload.
    ///
    /// With a codec attached the payload is expected to be base64-wrapped
    /// compressed bytes, but a value written before compression was enabled
    /// decodes as neither - in that case the raw text is returned as-is and
    /// the JSON parse decides whether it is usable.
    async fn decode(&self, raw: String) -> String {
        let Some(codec) = &self.codec else {
            return raw;
        };

        let bytes = match BASE64.decode(raw.as_bytes()) {
            Ok(bytes) => bytes,
            Err(_) => return raw,
        };
        match codec.decompress(&bytes).await {
            Ok(text) => text,
            Err(_) => raw,
        }
    }
}
