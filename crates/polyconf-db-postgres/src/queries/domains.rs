//! Queries against the `domains` table.

use chrono::{DateTime, Utc};
use sqlx_core::query_as::query_as;
use sqlx_core::query_scalar::query_scalar;
use sqlx_postgres::PgPool;

use polyconf_core::DomainRecord;
use polyconf_storage::{DomainUpdate, NewDomain, PageParams, StorageError};

use crate::error::{is_foreign_key_violation, is_unique_violation, storage_error};

use super::chrono_to_time;

type DomainRow = (i64, String, i64, DateTime<Utc>, DateTime<Utc>);

fn row_to_record(row: DomainRow) -> DomainRecord {
    DomainRecord {
        id: row.0,
        name: row.1,
        config_id: row.2,
        created_at: chrono_to_time(row.3),
        updated_at: chrono_to_time(row.4),
    }
}

/// Inserts a new domain.
///
/// A 23505 on the unique name maps to `AlreadyExists`, a 23503 on the
/// configuration reference maps to `InvalidInput`.
pub async fn create(pool: &PgPool, new: NewDomain) -> Result<DomainRecord, StorageError> {
    let row: DomainRow = query_as(
        r#"INSERT INTO domains (name, config_id)
           VALUES ($1, $2)
           RETURNING id, name, config_id, created_at, updated_at"#,
    )
    .bind(&new.name)
    .bind(new.config_id)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            StorageError::already_exists("domain", &new.name)
        } else if is_foreign_key_violation(&e) {
            StorageError::invalid_input(format!(
                "Configuration {} does not exist",
                new.config_id
            ))
        } else {
            storage_error("Failed to create domain", e)
        }
    })?;

    Ok(row_to_record(row))
}

/// Reads a domain by id. Returns `None` if absent.
pub async fn get(pool: &PgPool, id: i64) -> Result<Option<DomainRecord>, StorageError> {
    let row: Option<DomainRow> = query_as(
        r#"SELECT id, name, config_id, created_at, updated_at
           FROM domains
           WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| storage_error("Failed to read domain", e))?;

    Ok(row.map(row_to_record))
}

/// Reads a domain by its unique name. Returns `None` if absent.
pub async fn get_by_name(pool: &PgPool, name: &str) -> Result<Option<DomainRecord>, StorageError> {
    let row: Option<DomainRow> = query_as(
        r#"SELECT id, name, config_id, created_at, updated_at
           FROM domains
           WHERE name = $1"#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await
    .map_err(|e| storage_error("Failed to read domain by name", e))?;

    Ok(row.map(row_to_record))
}

/// Applies a partial update. Absent fields keep their current value
/// via COALESCE.
pub async fn update(
    pool: &PgPool,
    id: i64,
    update: DomainUpdate,
) -> Result<DomainRecord, StorageError> {
    let row: Option<DomainRow> = query_as(
        r#"UPDATE domains
           SET name = COALESCE($2, name),
               config_id = COALESCE($3, config_id),
               updated_at = now()
           WHERE id = $1
           RETURNING id, name, config_id, created_at, updated_at"#,
    )
    .bind(id)
    .bind(update.name.as_deref())
    .bind(update.config_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            StorageError::already_exists("domain", update.name.as_deref().unwrap_or_default())
        } else if is_foreign_key_violation(&e) {
            StorageError::invalid_input(format!(
                "Configuration {} does not exist",
                update.config_id.unwrap_or_default()
            ))
        } else {
            storage_error("Failed to update domain", e)
        }
    })?;

    row.map(row_to_record)
        .ok_or_else(|| StorageError::not_found("domain", id.to_string()))
}

/// Deletes a domain and returns the deleted record.
pub async fn delete(pool: &PgPool, id: i64) -> Result<DomainRecord, StorageError> {
    let row: Option<DomainRow> = query_as(
        r#"DELETE FROM domains
           WHERE id = $1
           RETURNING id, name, config_id, created_at, updated_at"#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| storage_error("Failed to delete domain", e))?;

    row.map(row_to_record)
        .ok_or_else(|| StorageError::not_found("domain", id.to_string()))
}

/// Lists one page of domains ordered by id.
pub async fn list(pool: &PgPool, params: PageParams) -> Result<Vec<DomainRecord>, StorageError> {
    let rows: Vec<DomainRow> = query_as(
        r#"SELECT id, name, config_id, created_at, updated_at
           FROM domains
           ORDER BY id
           LIMIT $1 OFFSET $2"#,
    )
    .bind(i64::from(params.page_size()))
    .bind(params.offset() as i64)
    .fetch_all(pool)
    .await
    .map_err(|e| storage_error("Failed to list domains", e))?;

    Ok(rows.into_iter().map(row_to_record).collect())
}

/// Counts all domains.
pub async fn count(pool: &PgPool) -> Result<u64, StorageError> {
    let total: i64 = query_scalar("SELECT COUNT(*) FROM domains")
        .fetch_one(pool)
        .await
        .map_err(|e| storage_error("Failed to count domains", e))?;

    Ok(total as u64)
}
