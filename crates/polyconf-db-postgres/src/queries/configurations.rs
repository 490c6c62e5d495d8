//! Queries against the `configurations` table.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx_core::query_as::query_as;
use sqlx_postgres::PgPool;

use polyconf_core::Configuration;
use polyconf_storage::{NewConfiguration, StorageError};

use crate::error::storage_error;

use super::{chrono_to_time, json_object};

type ConfigurationRow = (i64, Value, Value, DateTime<Utc>, DateTime<Utc>);

fn row_to_configuration(row: ConfigurationRow) -> Result<Configuration, StorageError> {
    Ok(Configuration {
        id: row.0,
        links: json_object("links", row.1)?,
        permissions: json_object("permissions", row.2)?,
        created_at: chrono_to_time(row.3),
        updated_at: chrono_to_time(row.4),
    })
}

/// Inserts a new base configuration.
pub async fn create(
    pool: &PgPool,
    new: NewConfiguration,
) -> Result<Configuration, StorageError> {
    let row: ConfigurationRow = query_as(
        r#"INSERT INTO configurations (links, permissions)
           VALUES ($1, $2)
           RETURNING id, links, permissions, created_at, updated_at"#,
    )
    .bind(Value::Object(new.links))
    .bind(Value::Object(new.permissions))
    .fetch_one(pool)
    .await
    .map_err(|e| storage_error("Failed to create configuration", e))?;

    row_to_configuration(row)
}

/// Reads a configuration by id. Returns `None` if absent.
pub async fn get(pool: &PgPool, id: i64) -> Result<Option<Configuration>, StorageError> {
    let row: Option<ConfigurationRow> = query_as(
        r#"SELECT id, links, permissions, created_at, updated_at
           FROM configurations
           WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| storage_error("Failed to read configuration", e))?;

    row.map(row_to_configuration).transpose()
}
