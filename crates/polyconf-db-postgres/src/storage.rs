//! PostgreSQL implementation of the storage contract.

use async_trait::async_trait;
use sqlx_postgres::PgPool;
use tracing::{info, instrument};

use polyconf_core::{Configuration, DomainRecord, LanguageCode, Translation};
use polyconf_storage::{
    ConfigStorage, DomainUpdate, NewConfiguration, NewDomain, PageParams, StorageError,
};

use crate::config::PostgresConfig;
use crate::error::Result;
use crate::{migrations, pool, queries};

/// PostgreSQL storage backend.
///
/// Thin facade over a connection pool; the SQL lives in the `queries`
/// modules. Cheap to clone, the pool is reference counted.
#[derive(Debug, Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Connects a new storage backend, running migrations if the
    /// configuration asks for them.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be created or a migration
    /// fails.
    #[instrument(skip(config))]
    pub async fn new(config: &PostgresConfig) -> Result<Self> {
        let pool = pool::create_pool(config).await?;

        if config.run_migrations {
            migrations::run(&pool).await?;
        }

        info!("PostgreSQL storage backend ready");

        Ok(Self { pool })
    }

    /// Wraps an existing pool. Migrations are the caller's concern.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Upserts a translation row, keyed by `(config_id, language)`.
    ///
    /// Translation authoring is outside the `ConfigStorage` contract;
    /// fixtures and seeding tools write rows through this helper.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidInput` if the configuration does
    /// not exist.
    pub async fn upsert_translation(
        &self,
        config_id: i64,
        language: &LanguageCode,
        title: &str,
        author: &str,
        description: &str,
        keywords: &[String],
    ) -> std::result::Result<Translation, StorageError> {
        queries::translations::upsert(
            &self.pool,
            config_id,
            language,
            title,
            author,
            description,
            keywords,
        )
        .await
    }
}

#[async_trait]
impl ConfigStorage for PostgresStorage {
    async fn create_domain(&self, new: NewDomain) -> std::result::Result<DomainRecord, StorageError> {
        queries::domains::create(&self.pool, new).await
    }

    async fn get_domain(&self, id: i64) -> std::result::Result<Option<DomainRecord>, StorageError> {
        queries::domains::get(&self.pool, id).await
    }

    async fn get_domain_by_name(
        &self,
        name: &str,
    ) -> std::result::Result<Option<DomainRecord>, StorageError> {
        queries::domains::get_by_name(&self.pool, name).await
    }

    async fn update_domain(
        &self,
        id: i64,
        update: DomainUpdate,
    ) -> std::result::Result<DomainRecord, StorageError> {
        queries::domains::update(&self.pool, id, update).await
    }

    async fn delete_domain(&self, id: i64) -> std::result::Result<DomainRecord, StorageError> {
        queries::domains::delete(&self.pool, id).await
    }

    async fn list_domains(
        &self,
        params: PageParams,
    ) -> std::result::Result<Vec<DomainRecord>, StorageError> {
        queries::domains::list(&self.pool, params).await
    }

    async fn count_domains(&self) -> std::result::Result<u64, StorageError> {
        queries::domains::count(&self.pool).await
    }

    async fn create_configuration(
        &self,
        new: NewConfiguration,
    ) -> std::result::Result<Configuration, StorageError> {
        queries::configurations::create(&self.pool, new).await
    }

    async fn get_configuration(
        &self,
        id: i64,
    ) -> std::result::Result<Option<Configuration>, StorageError> {
        queries::configurations::get(&self.pool, id).await
    }

    async fn get_translation(
        &self,
        config_id: i64,
        language: &LanguageCode,
    ) -> std::result::Result<Option<Translation>, StorageError> {
        queries::translations::get(&self.pool, config_id, language).await
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
