//! Cache backend with local (DashMap) and Redis modes.

use dashmap::DashMap;
use deadpool_redis::Pool;
use redis::AsyncCommands;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A cached entry with TTL support.
///
/// The data is wrapped in `Arc` so cache hits clone a pointer, not the
/// payload bytes.
#[derive(Clone, Debug)]
pub struct CachedEntry {
    pub data: Arc<Vec<u8>>,
    pub cached_at: Instant,
    pub ttl: Duration,
}

impl CachedEntry {
    /// Create a new cached entry.
    pub fn new(data: Vec<u8>, ttl: Duration) -> Self {
        Self {
            data: Arc::new(data),
            cached_at: Instant::now(),
            ttl,
        }
    }

    /// Check if this entry has expired.
    pub fn is_expired(&self) -> bool {
        self.cached_at.elapsed() > self.ttl
    }
}

/// Cache backend for resolved-configuration payloads.
///
/// ## Cache Modes
///
/// - **Disabled**: every read is a miss, every write a no-op
/// - **Local**: single-instance mode using a DashMap
/// - **Redis**: shared cache over a deadpool-redis pool
///
/// All operations are infallible from the caller's perspective. Redis
/// failures are logged with `tracing::warn!`, counted in metrics, and
/// degrade to a miss or no-op. Writes and deletes are awaited so that
/// callers can rely on invalidation having completed before they
/// return.
#[derive(Clone)]
pub enum CacheBackend {
    /// Caching turned off in configuration.
    Disabled,

    /// Single-instance: local DashMap only.
    Local(Arc<DashMap<String, CachedEntry>>),

    /// Shared cache store.
    Redis { pool: Pool },
}

impl CacheBackend {
    /// Create a disabled cache backend.
    pub fn new_disabled() -> Self {
        CacheBackend::Disabled
    }

    /// Create a new local-only cache backend.
    pub fn new_local() -> Self {
        CacheBackend::Local(Arc::new(DashMap::new()))
    }

    /// Create a new Redis-backed cache backend.
    pub fn new_redis(pool: Pool) -> Self {
        CacheBackend::Redis { pool }
    }

    /// Whether this backend actually stores anything. Observability
    /// only; callers must not branch resolution logic on it.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, CacheBackend::Disabled)
    }

    /// Mode label for logs and metrics.
    pub fn mode(&self) -> &'static str {
        match self {
            CacheBackend::Disabled => "disabled",
            CacheBackend::Local(_) => "local",
            CacheBackend::Redis { .. } => "redis",
        }
    }

    /// Get a value from the cache. Absent, expired and failed lookups
    /// all come back as `None`.
    pub async fn get(&self, key: &str) -> Option<Arc<Vec<u8>>> {
        match self {
            CacheBackend::Disabled => None,
            CacheBackend::Local(map) => {
                if let Some(entry) = map.get(key) {
                    if !entry.is_expired() {
                        crate::metrics::record_cache_hit(self.mode());
                        return Some(Arc::clone(&entry.data));
                    }
                    drop(entry);
                    map.remove(key);
                }
                crate::metrics::record_cache_miss();
                None
            }
            CacheBackend::Redis { pool } => match pool.get().await {
                Ok(mut conn) => match conn.get::<_, Option<Vec<u8>>>(key).await {
                    Ok(Some(data)) => {
                        tracing::debug!(key = %key, "cache hit");
                        crate::metrics::record_cache_hit(self.mode());
                        Some(Arc::new(data))
                    }
                    Ok(None) => {
                        tracing::debug!(key = %key, "cache miss");
                        crate::metrics::record_cache_miss();
                        None
                    }
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "Redis GET error");
                        crate::metrics::record_cache_error("get");
                        None
                    }
                },
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to get Redis connection");
                    crate::metrics::record_cache_error("get");
                    None
                }
            },
        }
    }

    /// Set a value in the cache with TTL.
    ///
    /// The Redis write is awaited; its failure is logged and swallowed.
    pub async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        match self {
            CacheBackend::Disabled => {}
            CacheBackend::Local(map) => {
                map.insert(key.to_string(), CachedEntry::new(value, ttl));
            }
            CacheBackend::Redis { pool } => {
                let ttl_secs = ttl.as_secs();
                match pool.get().await {
                    Ok(mut conn) => {
                        if let Err(e) = conn.set_ex::<_, _, ()>(key, value, ttl_secs).await {
                            tracing::warn!(key = %key, error = %e, "Redis SET error");
                            crate::metrics::record_cache_error("set");
                        } else {
                            tracing::debug!(key = %key, ttl_secs = %ttl_secs, "cache set");
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to get Redis connection");
                        crate::metrics::record_cache_error("set");
                    }
                }
            }
        }
    }

    /// Delete a cache entry.
    ///
    /// Awaited, so the entry is gone (or the failure is logged) before
    /// the caller returns. Deleting an absent key is a no-op.
    pub async fn delete(&self, key: &str) {
        match self {
            CacheBackend::Disabled => {}
            CacheBackend::Local(map) => {
                map.remove(key);
                tracing::debug!(key = %key, "cache invalidated");
            }
            CacheBackend::Redis { pool } => match pool.get().await {
                Ok(mut conn) => {
                    if let Err(e) = conn.del::<_, ()>(key).await {
                        tracing::warn!(key = %key, error = %e, "Redis DEL error");
                        crate::metrics::record_cache_error("delete");
                    } else {
                        tracing::debug!(key = %key, "cache invalidated");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to get Redis connection");
                    crate::metrics::record_cache_error("delete");
                }
            },
        }
    }

    /// Check if Redis is reachable (for health checks).
    pub async fn is_redis_available(&self) -> bool {
        match self {
            CacheBackend::Redis { pool } => pool.get().await.is_ok(),
            _ => false,
        }
    }
}
