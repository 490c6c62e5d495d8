//! JSON payload codec over the cache backend.

use std::time::Duration;

use polyconf_core::ResolvedConfiguration;

use super::backend::CacheBackend;

/// Typed cache for resolved configurations.
///
/// Values are stored as UTF-8 JSON so they survive process restarts
/// and stay inspectable with standard Redis tooling. A value that no
/// longer decodes (schema drift, corruption) reads as a miss and the
/// poisoned key is dropped so the next write repairs it.
#[derive(Clone)]
pub struct PayloadCache {
    backend: CacheBackend,
    default_ttl: Duration,
}

impl PayloadCache {
    /// Wraps a backend with the process-wide default TTL.
    pub fn new(backend: CacheBackend, default_ttl: Duration) -> Self {
        Self {
            backend,
            default_ttl,
        }
    }

    /// The backend this cache writes through to.
    pub fn backend(&self) -> &CacheBackend {
        &self.backend
    }

    /// The default TTL applied by [`PayloadCache::set`].
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Reads and decodes a resolved configuration. Decode failures are
    /// treated as misses.
    pub async fn get(&self, key: &str) -> Option<ResolvedConfiguration> {
        let bytes = self.backend.get(key).await?;
        match serde_json::from_slice(&bytes) {
            Ok(resolved) => Some(resolved),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Dropping undecodable cache entry");
                crate::metrics::record_cache_error("decode");
                self.backend.delete(key).await;
                None
            }
        }
    }

    /// Encodes and writes a resolved configuration with the default
    /// TTL.
    pub async fn set(&self, key: &str, value: &ResolvedConfiguration) {
        self.set_with_ttl(key, value, self.default_ttl).await;
    }

    /// Encodes and writes a resolved configuration with an explicit
    /// TTL.
    pub async fn set_with_ttl(&self, key: &str, value: &ResolvedConfiguration, ttl: Duration) {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.backend.set(key, bytes, ttl).await,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to encode cache entry");
                crate::metrics::record_cache_error("encode");
            }
        }
    }

    /// Invalidates a key.
    pub async fn invalidate(&self, key: &str) {
        self.backend.delete(key).await;
    }
}
