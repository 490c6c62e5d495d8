//! Storage traits implemented by the relational backends.

use async_trait::async_trait;

use polyconf_core::{Configuration, DomainRecord, LanguageCode, Translation};

use crate::error::StorageError;
use crate::types::{DomainUpdate, NewConfiguration, NewDomain, PageParams};

/// The storage contract for configurations, translations and domains.
///
/// Implementations must be thread-safe (`Send + Sync`). The cache is
/// never consulted at this layer; every call goes to the source of
/// truth.
///
/// # Example
///
/// ```ignore
/// use polyconf_storage::{ConfigStorage, StorageError};
///
/// async fn config_for_domain(
///     storage: &dyn ConfigStorage,
///     name: &str,
/// ) -> Result<i64, StorageError> {
///     let domain = storage
///         .get_domain_by_name(name)
///         .await?
///         .ok_or_else(|| StorageError::not_found("domain", name))?;
///     Ok(domain.config_id)
/// }
/// ```
#[async_trait]
pub trait ConfigStorage: Send + Sync {
    // ==================== Domains ====================

    /// Creates a new domain.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` if the domain name is
    /// taken — including when a concurrent insert wins the race, which
    /// backends must map from their unique-constraint violation.
    async fn create_domain(&self, new: NewDomain) -> Result<DomainRecord, StorageError>;

    /// Reads a domain by id. Returns `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues.
    async fn get_domain(&self, id: i64) -> Result<Option<DomainRecord>, StorageError>;

    /// Reads a domain by its unique name. Returns `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues.
    async fn get_domain_by_name(&self, name: &str) -> Result<Option<DomainRecord>, StorageError>;

    /// Applies a partial update to a domain and returns the updated
    /// record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the domain does not exist
    /// and `StorageError::AlreadyExists` if a rename collides with an
    /// existing name.
    async fn update_domain(
        &self,
        id: i64,
        update: DomainUpdate,
    ) -> Result<DomainRecord, StorageError>;

    /// Deletes a domain and returns the deleted record, so callers can
    /// derive the cache keys to invalidate from the old name.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the domain does not exist.
    async fn delete_domain(&self, id: i64) -> Result<DomainRecord, StorageError>;

    /// Lists one page of domains ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues.
    async fn list_domains(&self, params: PageParams) -> Result<Vec<DomainRecord>, StorageError>;

    /// Counts all domains.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues.
    async fn count_domains(&self) -> Result<u64, StorageError>;

    // ==================== Configurations ====================

    /// Creates a new base configuration.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues.
    async fn create_configuration(
        &self,
        new: NewConfiguration,
    ) -> Result<Configuration, StorageError>;

    /// Reads a configuration by id. Returns `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues.
    async fn get_configuration(&self, id: i64) -> Result<Option<Configuration>, StorageError>;

    // ==================== Translations ====================

    /// Reads the translation for `(config_id, language)`. Returns
    /// `None` if absent; the fallback chain is the caller's concern.
    ///
    /// Translation authoring lives outside this contract.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues.
    async fn get_translation(
        &self,
        config_id: i64,
        language: &LanguageCode,
    ) -> Result<Option<Translation>, StorageError>;

    // ==================== Metadata ====================

    /// Returns the name of this backend for logging.
    fn backend_name(&self) -> &'static str;
}
