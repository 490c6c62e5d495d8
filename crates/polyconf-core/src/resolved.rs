//! The merge engine: combining a configuration with a translation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::entities::{Configuration, Translation};
use crate::language::LanguageCode;

/// A fully resolved configuration payload.
///
/// This is the record handed to callers (and cached): the base
/// configuration's language-independent fields overlaid with one
/// translation's language-dependent fields, stamped with the language
/// that was actually served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedConfiguration {
    /// The configuration ID.
    pub id: i64,
    /// The effective language of this payload. May differ from the
    /// requested language when the fallback chain was taken.
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
    /// Language-independent link definitions.
    #[serde(default)]
    pub links: Map<String, Value>,
    /// Language-independent permission flags.
    #[serde(default)]
    pub permissions: Map<String, Value>,
    /// When the base configuration was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the base configuration was last updated.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Merges a base configuration with a resolved translation.
///
/// Pure and total: no I/O, deterministic, every output field comes
/// from exactly one of the two inputs plus the effective language.
#[must_use]
pub fn merge(
    configuration: &Configuration,
    translation: Translation,
    actual_language: LanguageCode,
) -> ResolvedConfiguration {
    ResolvedConfiguration {
        id: configuration.id,
        language: actual_language,
        title: translation.title,
        author: translation.author,
        description: translation.description,
        keywords: translation.keywords,
        links: configuration.links.clone(),
        permissions: configuration.permissions.clone(),
        created_at: configuration.created_at,
        updated_at: configuration.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now_utc;

    fn sample_configuration() -> Configuration {
        let mut links = Map::new();
        links.insert("home".into(), serde_json::json!({"href": "/"}));
        let mut permissions = Map::new();
        permissions.insert("comments".into(), serde_json::json!(true));
        let now = now_utc();
        Configuration {
            id: 7,
            links,
            permissions,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_translation(language: &str) -> Translation {
        Translation {
            id: 1,
            config_id: 7,
            language: LanguageCode::parse(language).unwrap(),
            title: "Example".into(),
            author: "Team".into(),
            description: "An example site".into(),
            keywords: vec!["example".into(), "demo".into()],
        }
    }

    #[test]
    fn merge_overlays_translation_onto_base() {
        let configuration = sample_configuration();
        let translation = sample_translation("en-us");
        let language = translation.language.clone();

        let resolved = merge(&configuration, translation, language);

        assert_eq!(resolved.id, 7);
        assert_eq!(resolved.title, "Example");
        assert_eq!(resolved.language.as_str(), "en-us");
        assert_eq!(resolved.links["home"]["href"], "/");
        assert_eq!(resolved.permissions["comments"], true);
        assert_eq!(resolved.created_at, configuration.created_at);
    }

    #[test]
    fn merge_stamps_the_actual_language_not_the_translation_row() {
        // The effective language is the caller's decision: when the
        // fallback chain was taken it must reflect what was served.
        let configuration = sample_configuration();
        let translation = sample_translation("zh-cn");

        let resolved = merge(
            &configuration,
            translation,
            LanguageCode::parse("zh-cn").unwrap(),
        );

        assert_eq!(resolved.language.as_str(), "zh-cn");
    }

    #[test]
    fn resolved_configuration_json_round_trip() {
        let configuration = sample_configuration();
        let translation = sample_translation("ja-jp");
        let language = translation.language.clone();
        let resolved = merge(&configuration, translation, language);

        let json = serde_json::to_vec(&resolved).unwrap();
        let back: ResolvedConfiguration = serde_json::from_slice(&json).unwrap();
        assert_eq!(back, resolved);
    }
}
