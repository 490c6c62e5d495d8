//! Storage error types shared by every backend.

use std::fmt;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested record was not found.
    #[error("{kind} not found: {key}")]
    NotFound {
        /// The kind of record that was not found ("domain",
        /// "configuration", "translation").
        kind: &'static str,
        /// The lookup key (id or name) that missed.
        key: String,
    },

    /// Attempted to create a record whose unique key already exists.
    #[error("{kind} already exists: {key}")]
    AlreadyExists {
        /// The kind of record that already exists.
        kind: &'static str,
        /// The conflicting unique key.
        key: String,
    },

    /// The caller supplied invalid input.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to reach the storage backend.
    #[error("Connection error: {message}")]
    ConnectionError {
        /// Description of the connection error.
        message: String,
    },

    /// An internal storage error occurred, including data-integrity
    /// faults such as a domain row pointing at a missing configuration.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    /// Creates a new `AlreadyExists` error.
    #[must_use]
    pub fn already_exists(kind: &'static str, key: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind,
            key: key.into(),
        }
    }

    /// Creates a new `InvalidInput` error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a new `ConnectionError` error.
    #[must_use]
    pub fn connection_error(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is an already exists error.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Returns `true` if this is a validation error.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// Returns the error category for status mapping and monitoring.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::AlreadyExists { .. } => ErrorCategory::Conflict,
            Self::InvalidInput { .. } => ErrorCategory::Validation,
            Self::ConnectionError { .. } => ErrorCategory::Infrastructure,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of storage errors for status mapping and monitoring.
///
/// An HTTP-layer collaborator maps these to status codes without
/// inspecting message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Record not found (including an exhausted translation fallback).
    NotFound,
    /// Unique-key conflict.
    Conflict,
    /// Validation error.
    Validation,
    /// Infrastructure/connection error.
    Infrastructure,
    /// Internal error.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::Validation => write!(f, "validation"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::not_found("domain", "example.com");
        assert_eq!(err.to_string(), "domain not found: example.com");

        let err = StorageError::already_exists("domain", "example.com");
        assert_eq!(err.to_string(), "domain already exists: example.com");

        let err = StorageError::invalid_input("page must be >= 1");
        assert_eq!(err.to_string(), "Invalid input: page must be >= 1");
    }

    #[test]
    fn test_error_predicates() {
        let err = StorageError::not_found("translation", "7/zh-cn");
        assert!(err.is_not_found());
        assert!(!err.is_already_exists());

        let err = StorageError::already_exists("domain", "example.com");
        assert!(err.is_already_exists());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            StorageError::not_found("domain", "example.com").category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            StorageError::already_exists("domain", "example.com").category(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            StorageError::invalid_input("bad page").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            StorageError::connection_error("pool exhausted").category(),
            ErrorCategory::Infrastructure
        );
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::NotFound.to_string(), "not_found");
        assert_eq!(ErrorCategory::Conflict.to_string(), "conflict");
        assert_eq!(ErrorCategory::Infrastructure.to_string(), "infrastructure");
    }
}
