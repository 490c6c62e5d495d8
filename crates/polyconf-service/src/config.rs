//! Service configuration, loaded from TOML with per-field defaults.

use std::path::Path;

use polyconf_core::LanguageCode;
use polyconf_db_postgres::PostgresConfig;
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Relational store settings.
    #[serde(default)]
    pub postgres: PostgresConfig,

    /// Redis cache store settings.
    #[serde(default)]
    pub redis: RedisConfig,

    /// Cache behavior settings.
    #[serde(default)]
    pub cache: CacheSettings,

    /// Language negotiation settings.
    #[serde(default)]
    pub i18n: I18nSettings,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or
    /// fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&raw)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string does not parse or fails
    /// validation.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Validates cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message for the first violation found.
    pub fn validate(&self) -> Result<(), String> {
        if self.cache.ttl_secs == 0 {
            return Err("cache.ttl_secs must be > 0".into());
        }
        if self.redis.enabled && self.redis.url.is_empty() {
            return Err("redis.url must be set when redis is enabled".into());
        }

        let default = LanguageCode::parse(&self.i18n.default_language)
            .map_err(|e| format!("i18n.default_language: {e}"))?;
        let mut supported = Vec::with_capacity(self.i18n.supported.len());
        for tag in &self.i18n.supported {
            supported
                .push(LanguageCode::parse(tag).map_err(|e| format!("i18n.supported {tag:?}: {e}"))?);
        }
        if !supported.is_empty() && !supported.contains(&default) {
            return Err("i18n.default_language must be in i18n.supported".into());
        }

        Ok(())
    }
}

/// Redis cache store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Whether to use Redis. When false, the cache runs in local mode.
    #[serde(default = "default_redis_enabled")]
    pub enabled: bool,

    /// Connection URL: `redis://host:port/db`.
    #[serde(default = "default_redis_url")]
    pub url: String,

    /// Connection pool size.
    #[serde(default = "default_redis_pool_size")]
    pub pool_size: usize,

    /// Pool wait/create/recycle timeout in milliseconds.
    #[serde(default = "default_redis_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_redis_enabled() -> bool {
    false
}

fn default_redis_url() -> String {
    "redis://localhost:6379".into()
}

fn default_redis_pool_size() -> usize {
    5
}

fn default_redis_timeout_ms() -> u64 {
    5000
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            enabled: default_redis_enabled(),
            url: default_redis_url(),
            pool_size: default_redis_pool_size(),
            timeout_ms: default_redis_timeout_ms(),
        }
    }
}

/// Cache behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Whether caching is on at all. When false the backend is
    /// `Disabled` and every read goes to the store.
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    /// Process-wide default TTL in seconds for cached payloads.
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl_secs() -> u64 {
    600
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

/// Language negotiation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct I18nSettings {
    /// The supported language set. Negotiation never returns a code
    /// outside this set.
    #[serde(default = "default_supported_languages")]
    pub supported: Vec<String>,

    /// The default language, served when negotiation matches nothing
    /// and as the translation fallback.
    #[serde(default = "default_language")]
    pub default_language: String,
}

fn default_supported_languages() -> Vec<String> {
    vec!["zh-cn".into(), "en-us".into(), "ja-jp".into()]
}

fn default_language() -> String {
    "zh-cn".into()
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            supported: default_supported_languages(),
            default_language: default_language(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter, e.g. `info` or `polyconf_service=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl_secs, 600);
        assert!(!config.redis.enabled);
        assert_eq!(config.i18n.default_language, "zh-cn");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_sections_keep_field_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [cache]
            ttl_secs = 60

            [i18n]
            default_language = "en-us"
            supported = ["en-us", "fr-fr"]
            "#,
        )
        .unwrap();

        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.i18n.default_language, "en-us");
    }

    #[test]
    fn validation_catches_bad_language_settings() {
        let err = AppConfig::from_toml(
            r#"
            [i18n]
            default_language = "en us"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = AppConfig::from_toml(
            r#"
            [i18n]
            default_language = "fr-fr"
            supported = ["en-us"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let err = AppConfig::from_toml("[cache]\nttl_secs = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn load_reads_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("polyconf.toml");
        std::fs::write(&path, "[cache]\nttl_secs = 120\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.cache.ttl_secs, 120);
    }
}
