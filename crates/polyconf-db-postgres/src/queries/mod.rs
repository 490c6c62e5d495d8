//! SQL query implementations, grouped per table.

pub mod configurations;
pub mod domains;
pub mod translations;

use chrono::{DateTime, Utc};
use polyconf_core::LanguageCode;
use polyconf_storage::StorageError;
use serde_json::{Map, Value};
use time::OffsetDateTime;

/// Converts chrono DateTime to time OffsetDateTime.
fn chrono_to_time(dt: DateTime<Utc>) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(dt.timestamp()).unwrap_or(OffsetDateTime::UNIX_EPOCH)
        + time::Duration::nanoseconds(dt.timestamp_subsec_nanos() as i64)
}

/// Unwraps a JSONB column into a JSON object.
///
/// The schema defaults these columns to `'{}'::jsonb`, so a non-object
/// value is a data-integrity fault and surfaces as `Internal`.
fn json_object(column: &str, value: Value) -> Result<Map<String, Value>, StorageError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StorageError::internal(format!(
            "Column {column} holds a non-object JSON value: {other}"
        ))),
    }
}

/// Parses a stored language code column.
///
/// Codes are normalized before insert, so a parse failure here is a
/// data-integrity fault and surfaces as `Internal`.
fn stored_language(code: &str) -> Result<LanguageCode, StorageError> {
    LanguageCode::parse(code).map_err(|e| {
        StorageError::internal(format!("Stored language code {code:?} is invalid: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chrono_to_time_preserves_subsecond_precision() {
        let dt = DateTime::parse_from_rfc3339("2025-03-01T12:30:45.123456Z")
            .unwrap()
            .with_timezone(&Utc);
        let converted = chrono_to_time(dt);
        assert_eq!(converted.unix_timestamp(), dt.timestamp());
        assert_eq!(converted.microsecond(), 123_456);
    }

    #[test]
    fn test_json_object_rejects_non_objects() {
        assert!(json_object("links", json!({"docs": "/docs"})).is_ok());

        let err = json_object("links", json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, StorageError::Internal { .. }));
    }

    #[test]
    fn test_stored_language_rejects_garbage() {
        assert_eq!(stored_language("en-us").unwrap().as_str(), "en-us");
        assert!(stored_language("en us").is_err());
    }
}
