//! Text encoder capability
//!
//! Encoders turn text into fixed-length vectors for similarity comparison.
//! The engine treats the encoder as an optional, pluggable capability.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::Result;

/// Pluggable text-to-vector encoder
#[async_trait]
pub trait TextEncoder: Send + Sync {
    /// Encode text into a fixed-length vector
    async fn encode(&self, text: &str) -> Result<Vec<f32>>;

    /// Output vector length
    fn dimension(&self) -> usize;
}

/// Caches encodings keyed by input text
///
/// Repeated lookups (query re-runs, concurrent backfill of the same text)
/// skip the underlying model call.
pub struct CachingEncoder<E> {
    inner: E,
    cache: DashMap<String, Vec<f32>>,
}

impl<E: TextEncoder> CachingEncoder<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
        }
    }

    /// Number of cached encodings
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    /// Clear the cache
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

#[async_trait]
impl<E: TextEncoder> TextEncoder for CachingEncoder<E> {
    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(cached) = self.cache.get(text) {
            return Ok(cached.clone());
        }

        let embedding = self.inner.encode(text).await?;
        self.cache.insert(text.to_string(), embedding.clone());
        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}
