//! The domain resolution service: cache-aside reads and
//! invalidate-after-write mutations over the storage contract.

use std::sync::Arc;

use tracing::instrument;

use polyconf_core::{DomainRecord, LanguageCode, ResolvedConfiguration, merge};
use polyconf_storage::{
    ConfigStorage, DomainUpdate, NewDomain, Page, PageParams, Pagination, StorageError,
};

use crate::cache::{PayloadCache, keys};
use crate::i18n::{LanguageNegotiator, TranslationResolver};

/// Resolves domain names and configuration ids into localized payloads.
///
/// Reads are cache-aside: the cache is checked before the store and
/// populated on a miss. Mutations write to the store first and
/// invalidate afterwards, so no stale entry survives a successful
/// write; a crash in between is bounded by the entry TTL.
#[derive(Clone)]
pub struct DomainResolutionService {
    storage: Arc<dyn ConfigStorage>,
    cache: PayloadCache,
    negotiator: LanguageNegotiator,
    resolver: TranslationResolver,
}

impl DomainResolutionService {
    pub fn new(
        storage: Arc<dyn ConfigStorage>,
        cache: PayloadCache,
        negotiator: LanguageNegotiator,
    ) -> Self {
        let resolver =
            TranslationResolver::new(Arc::clone(&storage), negotiator.default_language().clone());
        Self {
            storage,
            cache,
            negotiator,
            resolver,
        }
    }

    /// The negotiator in use, for callers that need the supported set.
    pub fn negotiator(&self) -> &LanguageNegotiator {
        &self.negotiator
    }

    /// Resolves a domain name into a localized configuration payload.
    ///
    /// The domain-name entry is served directly when its effective
    /// language matches the negotiated one. When it does not (another
    /// language was cached, or the entry was written through the
    /// fallback chain), the negotiated-language configuration key is
    /// consulted before the store, so repeat requests for a missing
    /// translation stay cache hits. The result's `language` field is
    /// the effective language, which may differ from the requested
    /// one.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the domain or every translation in the
    ///   fallback chain is absent.
    /// - `Internal` when the domain row points at a missing
    ///   configuration (data-integrity fault).
    #[instrument(skip(self, header))]
    pub async fn resolve_by_domain(
        &self,
        name: &str,
        explicit_language: Option<&str>,
        header: Option<&str>,
    ) -> Result<ResolvedConfiguration, StorageError> {
        let language = self.negotiator.negotiate(explicit_language, header);
        let key = keys::domain_key(name);

        if let Some(cached) = self.cache.get(&key).await {
            if cached.language == language {
                crate::metrics::record_resolution("cache");
                return Ok(cached);
            }
            // The entry carries the configuration id, so the
            // language-scoped key can answer without a store read.
            let lang_key = keys::config_lang_key(cached.id, &language);
            if let Some(cached) = self.cache.get(&lang_key).await {
                crate::metrics::record_resolution("cache");
                return Ok(cached);
            }
        }

        let domain = self
            .storage
            .get_domain_by_name(name)
            .await?
            .ok_or_else(|| StorageError::not_found("domain", name))?;

        let resolved = self.load_and_merge(&domain, &language).await?;

        self.cache.set(&key, &resolved).await;
        self.cache
            .set(&keys::config_lang_key(domain.config_id, &language), &resolved)
            .await;

        crate::metrics::record_resolution("store");
        Ok(resolved)
    }

    /// Resolves a configuration id directly, bypassing the domain
    /// table. Administrative access path.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the configuration or every translation in the
    ///   fallback chain is absent.
    #[instrument(skip(self, header))]
    pub async fn resolve_by_id(
        &self,
        config_id: i64,
        explicit_language: Option<&str>,
        header: Option<&str>,
    ) -> Result<ResolvedConfiguration, StorageError> {
        let language = self.negotiator.negotiate(explicit_language, header);
        let key = keys::config_lang_key(config_id, &language);

        if let Some(cached) = self.cache.get(&key).await {
            crate::metrics::record_resolution("cache");
            return Ok(cached);
        }

        let configuration = self
            .storage
            .get_configuration(config_id)
            .await?
            .ok_or_else(|| StorageError::not_found("configuration", config_id.to_string()))?;

        let resolved_translation = self.resolver.resolve(config_id, &language).await?;
        let actual_language = resolved_translation.actual_language.clone();
        let resolved = merge(
            &configuration,
            resolved_translation.translation,
            actual_language.clone(),
        );

        // Populate the requested-language key so the fallback result
        // is a hit next time, and the actual-language key when the
        // chain was taken.
        self.cache.set(&key, &resolved).await;
        if actual_language != language {
            self.cache
                .set(&keys::config_lang_key(config_id, &actual_language), &resolved)
                .await;
        }

        crate::metrics::record_resolution("store");
        Ok(resolved)
    }

    /// Lists one page of domains. Bypasses the cache entirely; the
    /// page and the total count are queried concurrently.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues.
    pub async fn list_domains(
        &self,
        params: PageParams,
    ) -> Result<Page<DomainRecord>, StorageError> {
        let (data, total) = tokio::try_join!(
            self.storage.list_domains(params),
            self.storage.count_domains()
        )?;

        Ok(Page {
            data,
            pagination: Pagination::of(params, total),
        })
    }

    /// Creates a domain. The cache is not warmed; the next read
    /// populates it.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` when the name is taken, whether found
    /// by the pre-check or by losing a race on the unique index.
    #[instrument(skip(self))]
    pub async fn create_domain(&self, new: NewDomain) -> Result<DomainRecord, StorageError> {
        if self.storage.get_domain_by_name(&new.name).await?.is_some() {
            return Err(StorageError::already_exists("domain", &new.name));
        }
        self.storage.create_domain(new).await
    }

    /// Applies a partial update, then invalidates the old-name key
    /// (and the new-name key on a rename).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the domain does not exist and
    /// `AlreadyExists` if a rename collides.
    #[instrument(skip(self))]
    pub async fn update_domain(
        &self,
        id: i64,
        update: DomainUpdate,
    ) -> Result<DomainRecord, StorageError> {
        let existing = self
            .storage
            .get_domain(id)
            .await?
            .ok_or_else(|| StorageError::not_found("domain", id.to_string()))?;

        let updated = self.storage.update_domain(id, update).await?;

        // Language-keyed configuration entries stay valid: repointing
        // a domain changes which configuration it resolves to, not
        // what any configuration id resolves to.
        self.cache.invalidate(&keys::domain_key(&existing.name)).await;
        if updated.name != existing.name {
            self.cache.invalidate(&keys::domain_key(&updated.name)).await;
        }

        Ok(updated)
    }

    /// Deletes a domain, then invalidates its key. The store delete is
    /// confirmed before invalidation; an invalidation failure is
    /// swallowed by the cache adapter.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the domain does not exist.
    #[instrument(skip(self))]
    pub async fn delete_domain(&self, id: i64) -> Result<DomainRecord, StorageError> {
        let deleted = self.storage.delete_domain(id).await?;
        self.cache.invalidate(&keys::domain_key(&deleted.name)).await;
        Ok(deleted)
    }

    async fn load_and_merge(
        &self,
        domain: &DomainRecord,
        language: &LanguageCode,
    ) -> Result<ResolvedConfiguration, StorageError> {
        // The foreign key guarantees the configuration row; its
        // absence is a data-integrity fault, not a user error.
        let configuration = self
            .storage
            .get_configuration(domain.config_id)
            .await?
            .ok_or_else(|| {
                StorageError::internal(format!(
                    "Domain {} references missing configuration {}",
                    domain.name, domain.config_id
                ))
            })?;

        let resolved_translation = self.resolver.resolve(domain.config_id, language).await?;
        let actual_language = resolved_translation.actual_language.clone();
        Ok(merge(
            &configuration,
            resolved_translation.translation,
            actual_language,
        ))
    }
}
