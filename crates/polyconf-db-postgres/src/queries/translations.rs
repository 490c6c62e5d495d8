//! Queries against the `translations` table.

use sqlx_core::query_as::query_as;
use sqlx_postgres::PgPool;

use polyconf_core::{LanguageCode, Translation};
use polyconf_storage::StorageError;

use crate::error::{is_foreign_key_violation, storage_error};

use super::stored_language;

type TranslationRow = (i64, i64, String, String, String, String, Vec<String>);

fn row_to_translation(row: TranslationRow) -> Result<Translation, StorageError> {
    Ok(Translation {
        id: row.0,
        config_id: row.1,
        language: stored_language(&row.2)?,
        title: row.3,
        author: row.4,
        description: row.5,
        keywords: row.6,
    })
}

/// Reads the translation for `(config_id, language)`. Returns `None`
/// if absent.
pub async fn get(
    pool: &PgPool,
    config_id: i64,
    language: &LanguageCode,
) -> Result<Option<Translation>, StorageError> {
    let row: Option<TranslationRow> = query_as(
        r#"SELECT id, config_id, language_code, title, author, description, keywords
           FROM translations
           WHERE config_id = $1 AND language_code = $2"#,
    )
    .bind(config_id)
    .bind(language.as_str())
    .fetch_optional(pool)
    .await
    .map_err(|e| storage_error("Failed to read translation", e))?;

    row.map(row_to_translation).transpose()
}

/// Upserts a translation row, keyed by `(config_id, language)`.
///
/// Translation authoring is outside the storage contract; fixtures and
/// seeding tools write rows through this query.
pub async fn upsert(
    pool: &PgPool,
    config_id: i64,
    language: &LanguageCode,
    title: &str,
    author: &str,
    description: &str,
    keywords: &[String],
) -> Result<Translation, StorageError> {
    let row: TranslationRow = query_as(
        r#"INSERT INTO translations (config_id, language_code, title, author, description, keywords)
           VALUES ($1, $2, $3, $4, $5, $6)
           ON CONFLICT ON CONSTRAINT translations_config_language_key
           DO UPDATE SET title = EXCLUDED.title,
                         author = EXCLUDED.author,
                         description = EXCLUDED.description,
                         keywords = EXCLUDED.keywords
           RETURNING id, config_id, language_code, title, author, description, keywords"#,
    )
    .bind(config_id)
    .bind(language.as_str())
    .bind(title)
    .bind(author)
    .bind(description)
    .bind(keywords)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_foreign_key_violation(&e) {
            StorageError::invalid_input(format!("Configuration {config_id} does not exist"))
        } else {
            storage_error("Failed to upsert translation", e)
        }
    })?;

    row_to_translation(row)
}
