//! Translation lookup with a default-language fallback chain.

use std::sync::Arc;

use polyconf_core::{LanguageCode, Translation};
use polyconf_storage::{ConfigStorage, StorageError};

/// A translation plus the language that was actually served.
///
/// `actual_language` may differ from the requested one when the
/// fallback chain kicked in; callers surface it so clients can detect
/// fallback.
#[derive(Debug, Clone)]
pub struct ResolvedTranslation {
    pub translation: Translation,
    pub actual_language: LanguageCode,
}

/// Resolves translations through the chain preferred language →
/// configured default → NotFound.
///
/// A configuration with no translation for either language is an
/// authoring gap and surfaces as `StorageError::NotFound`, never as an
/// empty record.
#[derive(Clone)]
pub struct TranslationResolver {
    storage: Arc<dyn ConfigStorage>,
    default_language: LanguageCode,
}

impl TranslationResolver {
    pub fn new(storage: Arc<dyn ConfigStorage>, default_language: LanguageCode) -> Self {
        Self {
            storage,
            default_language,
        }
    }

    /// Loads the translation for `(config_id, preferred)`, falling
    /// back to the configured default language.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` when the chain is exhausted,
    /// or an infrastructure error from the store.
    pub async fn resolve(
        &self,
        config_id: i64,
        preferred: &LanguageCode,
    ) -> Result<ResolvedTranslation, StorageError> {
        if let Some(translation) = self.storage.get_translation(config_id, preferred).await? {
            return Ok(ResolvedTranslation {
                translation,
                actual_language: preferred.clone(),
            });
        }

        if *preferred != self.default_language {
            if let Some(translation) = self
                .storage
                .get_translation(config_id, &self.default_language)
                .await?
            {
                tracing::debug!(
                    config_id,
                    requested = %preferred,
                    served = %self.default_language,
                    "translation fallback"
                );
                crate::metrics::record_language_fallback();
                return Ok(ResolvedTranslation {
                    translation,
                    actual_language: self.default_language.clone(),
                });
            }
        }

        Err(StorageError::not_found(
            "translation",
            format!("{config_id}/{preferred}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyconf_db_memory::MemoryStorage;

    fn language(tag: &str) -> LanguageCode {
        LanguageCode::parse(tag).unwrap()
    }

    fn resolver_over(storage: MemoryStorage, default: &str) -> TranslationResolver {
        TranslationResolver::new(Arc::new(storage), language(default))
    }

    #[tokio::test]
    async fn preferred_language_is_served_when_present() {
        let storage = MemoryStorage::new();
        storage.insert_translation(1, language("en-us"), "Example", "", "", vec![]);
        storage.insert_translation(1, language("zh-cn"), "示例", "", "", vec![]);

        let resolver = resolver_over(storage, "zh-cn");
        let resolved = resolver.resolve(1, &language("en-us")).await.unwrap();
        assert_eq!(resolved.translation.title, "Example");
        assert_eq!(resolved.actual_language.as_str(), "en-us");
    }

    #[tokio::test]
    async fn falls_back_to_the_default_language() {
        let storage = MemoryStorage::new();
        storage.insert_translation(1, language("zh-cn"), "示例", "", "", vec![]);

        let resolver = resolver_over(storage, "zh-cn");
        let resolved = resolver.resolve(1, &language("ja-jp")).await.unwrap();
        assert_eq!(resolved.translation.title, "示例");
        assert_eq!(resolved.actual_language.as_str(), "zh-cn");
    }

    #[tokio::test]
    async fn exhausted_chain_is_not_found() {
        let resolver = resolver_over(MemoryStorage::new(), "zh-cn");
        let err = resolver.resolve(1, &language("ja-jp")).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
