//! Codec Module
//!
//! The optional compression capability consumed by the persistent tier.
//! The store treats a codec as best-effort: a missing or failing codec
//! reduces space savings, never correctness.

use std::io::{Read, Write};

use async_trait::async_trait;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{CacheError, Result};

// == Codec Trait ==
/// Text compression capability.
///
/// Hosts inject whichever implementation suits the platform; the cache core
/// never hard-wires one compression primitive.
#[async_trait]
pub trait Codec: Send + Sync {
    /// Compresses text into an opaque byte payload.
    async fn compress(&self, text: &str) -> Result<Vec<u8>>;

    /// Recovers the original text from a compressed payload.
    async fn decompress(&self, bytes: &[u8]) -> Result<String>;
}

// == Deflate Codec ==
/// Zlib/deflate [`Codec`] backed by flate2.
#[derive(Debug, Clone)]
pub struct DeflateCodec {
    level: Compression,
}

impl DeflateCodec {
    /// Creates a codec with the default compression level.
    pub fn new() -> Self {
        Self {
            level: Compression::default(),
        }
    }

    /// Creates a codec with an explicit compression level (0-9).
    pub fn with_level(level: u32) -> Self {
        Self {
            level: Compression::new(level),
        }
    }
}

impl Default for DeflateCodec {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Codec for DeflateCodec {
    async fn compress(&self, text: &str) -> Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), self.level);
        encoder
            .write_all(text.as_bytes())
            .map_err(|e| CacheError::Codec(e.to_string()))?;
        encoder.finish().map_err(|e| CacheError::Codec(e.to_string()))
    }

    async fn decompress(&self, bytes: &[u8]) -> Result<String> {
        let mut decoder = ZlibDecoder::new(bytes);
        let mut text = String::new();
        decoder
            .read_to_string(&mut text)
            .map_err(|e| CacheError::Codec(e.to_string()))?;
        Ok(text)
    }
}
