//! Persistent domain entities.
//!
//! Three records make up the data model: a [`Configuration`] owns the
//! language-independent payload, a [`Translation`] carries the
//! language-dependent fields for one `(config_id, language)` pair, and
//! a [`DomainRecord`] maps a unique domain name onto a configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::language::LanguageCode;

/// A base configuration: the language-independent half of the model.
///
/// `links` and `permissions` are opaque JSON objects at this layer;
/// any deeper validation belongs to upstream collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// The configuration ID.
    pub id: i64,
    /// Arbitrary nested link definitions.
    #[serde(default)]
    pub links: Map<String, Value>,
    /// Arbitrary nested permission flags.
    #[serde(default)]
    pub permissions: Map<String, Value>,
    /// When the configuration was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the configuration was last updated.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A translation: the language-dependent half of the model.
///
/// At most one translation exists per `(config_id, language)` pair;
/// the storage layer enforces this with a unique index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    /// The translation ID.
    pub id: i64,
    /// The configuration this translation belongs to.
    pub config_id: i64,
    /// The normalized language code.
    pub language: LanguageCode,
    /// Localized title.
    pub title: String,
    /// Localized author attribution.
    pub author: String,
    /// Localized description.
    pub description: String,
    /// Localized keyword list.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// A domain record mapping a unique domain name to a configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRecord {
    /// The domain ID.
    pub id: i64,
    /// The unique domain name (e.g. `example.com`).
    pub name: String,
    /// The configuration this domain resolves to.
    pub config_id: i64,
    /// When the domain was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the domain was last updated.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
