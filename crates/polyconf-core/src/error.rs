use thiserror::Error;

/// Core error types for Polyconf domain operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid language code: {0}")]
    InvalidLanguageCode(String),
}

impl CoreError {
    /// Create a new InvalidLanguageCode error
    pub fn invalid_language_code(code: impl Into<String>) -> Self {
        Self::InvalidLanguageCode(code.into())
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
