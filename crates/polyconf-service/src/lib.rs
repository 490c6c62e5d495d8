//! The resolution engine: domain name → localized configuration
//! payload, through a cache-aside read path and language negotiation.

pub mod cache;
pub mod config;
pub mod i18n;
pub mod metrics;
pub mod observability;
pub mod resolution;

pub use cache::{CacheBackend, CachedEntry, PayloadCache};
pub use config::{AppConfig, CacheSettings, ConfigError, I18nSettings, LoggingConfig, RedisConfig};
pub use i18n::{LanguageNegotiator, ResolvedTranslation, TranslationResolver};
pub use observability::{init_tracing, init_tracing_with_level};
pub use resolution::DomainResolutionService;

use polyconf_core::LanguageCode;
use polyconf_storage::StorageError;

/// Create a cache backend based on configuration.
///
/// ## Cache Modes
///
/// - **Cache disabled**: Returns a disabled backend (every read misses)
/// - **Redis disabled**: Returns local-only cache (DashMap)
/// - **Redis enabled**: Attempts to connect to Redis, falls back to local on failure
///
/// ## Graceful Degradation
///
/// If the Redis connection fails, the system automatically falls back
/// to local-only mode. The cache is an accelerator, never a source of
/// truth, so resolution keeps working either way.
pub async fn create_cache_backend(
    cache: &config::CacheSettings,
    redis: &config::RedisConfig,
) -> CacheBackend {
    use std::time::Duration;

    if !cache.enabled {
        tracing::info!("Caching disabled in configuration");
        return CacheBackend::new_disabled();
    }

    if !redis.enabled {
        tracing::info!("Redis disabled, using local cache only");
        return CacheBackend::new_local();
    }

    tracing::info!(url = %redis.url, "Connecting to Redis");

    let mut redis_config = deadpool_redis::Config::from_url(&redis.url);
    if let Some(ref mut pool_config) = redis_config.pool {
        pool_config.max_size = redis.pool_size;
        pool_config.timeouts.wait = Some(Duration::from_millis(redis.timeout_ms));
        pool_config.timeouts.create = Some(Duration::from_millis(redis.timeout_ms));
        pool_config.timeouts.recycle = Some(Duration::from_millis(redis.timeout_ms));
    }

    let pool = match redis_config.create_pool(Some(deadpool_redis::Runtime::Tokio1)) {
        Ok(pool) => pool,
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Failed to create Redis pool. Falling back to local cache."
            );
            return CacheBackend::new_local();
        }
    };

    match pool.get().await {
        Ok(_) => {
            tracing::info!("Connected to Redis successfully");
            CacheBackend::new_redis(pool)
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Redis unreachable. Falling back to local cache."
            );
            CacheBackend::new_local()
        }
    }
}

/// Builds a negotiator from validated i18n settings.
///
/// # Errors
///
/// Returns `StorageError::InvalidInput` if a configured tag is
/// malformed. `AppConfig::validate` catches this earlier in normal
/// startup.
pub fn build_negotiator(
    settings: &config::I18nSettings,
) -> Result<LanguageNegotiator, StorageError> {
    let default = LanguageCode::parse(&settings.default_language)
        .map_err(|e| StorageError::invalid_input(e.to_string()))?;
    let supported = settings
        .supported
        .iter()
        .map(|tag| LanguageCode::parse(tag).map_err(|e| StorageError::invalid_input(e.to_string())))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(LanguageNegotiator::new(supported, default))
}
