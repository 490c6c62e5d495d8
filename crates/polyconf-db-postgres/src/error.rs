//! Error types for the PostgreSQL storage backend.

use polyconf_storage::StorageError;
use sqlx_core::error::Error as SqlxError;

/// PostgreSQL error code for a unique-constraint violation (23505).
pub const PG_UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL error code for a foreign-key violation (23503).
pub const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

/// Checks if a sqlx error has a specific PostgreSQL error code.
pub fn has_pg_error_code(err: &SqlxError, code: &str) -> bool {
    if let SqlxError::Database(db_err) = err {
        db_err.code().as_deref() == Some(code)
    } else {
        false
    }
}

/// Checks if a sqlx error is a unique-constraint violation (23505).
///
/// Create/rename races on the unique domain name surface as this code
/// and must map to `StorageError::AlreadyExists`, never to a generic
/// failure.
pub fn is_unique_violation(err: &SqlxError) -> bool {
    has_pg_error_code(err, PG_UNIQUE_VIOLATION)
}

/// Checks if a sqlx error is a foreign-key violation (23503).
pub fn is_foreign_key_violation(err: &SqlxError) -> bool {
    has_pg_error_code(err, PG_FOREIGN_KEY_VIOLATION)
}

/// Maps a sqlx error into the storage taxonomy.
///
/// Store-unreachable conditions (pool exhaustion, closed pool, I/O or
/// TLS failures) surface as `ConnectionError` so callers can tell an
/// infrastructure outage from a query bug; everything else is
/// `Internal`.
pub(crate) fn storage_error(context: &str, err: SqlxError) -> StorageError {
    match err {
        SqlxError::PoolTimedOut
        | SqlxError::PoolClosed
        | SqlxError::WorkerCrashed
        | SqlxError::Io(_)
        | SqlxError::Tls(_) => StorageError::connection_error(format!("{context}: {err}")),
        other => StorageError::internal(format!("{context}: {other}")),
    }
}

/// Errors specific to the PostgreSQL storage backend.
#[derive(Debug, thiserror::Error)]
pub enum PostgresError {
    /// Database connection error.
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx_core::error::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(String),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl PostgresError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<PostgresError> for StorageError {
    fn from(err: PostgresError) -> Self {
        match err {
            PostgresError::Connection(e) => StorageError::connection_error(e.to_string()),
            PostgresError::Migration(e) => StorageError::internal(format!("Migration error: {e}")),
            PostgresError::Config { message } => {
                StorageError::internal(format!("Configuration error: {message}"))
            }
        }
    }
}

/// Result type alias for PostgreSQL operations.
pub type Result<T> = std::result::Result<T, PostgresError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PostgresError::config("invalid URL");
        assert!(err.to_string().contains("Configuration error"));

        let err = PostgresError::Migration("schema drift".into());
        assert!(err.to_string().contains("Migration error"));
    }

    #[test]
    fn test_conversion_to_storage_error() {
        let pg_err = PostgresError::config("test error");
        let storage_err: StorageError = pg_err.into();
        assert!(matches!(storage_err, StorageError::Internal { .. }));
    }

    #[test]
    fn test_non_database_errors_are_not_code_matches() {
        let err = SqlxError::PoolTimedOut;
        assert!(!is_unique_violation(&err));
        assert!(!is_foreign_key_violation(&err));
    }

    #[test]
    fn test_storage_error_separates_connection_failures() {
        let err = storage_error("Failed to read domain", SqlxError::PoolTimedOut);
        assert!(matches!(err, StorageError::ConnectionError { .. }));

        let err = storage_error("Failed to read domain", SqlxError::RowNotFound);
        assert!(matches!(err, StorageError::Internal { .. }));
        assert!(err.to_string().contains("Failed to read domain"));
    }
}
