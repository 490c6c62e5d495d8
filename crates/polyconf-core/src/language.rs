//! Normalized language codes.
//!
//! Language codes are BCP-47-like tags stored in a canonical form:
//! lowercase, hyphen-separated (`en-us`, `zh-cn`). Underscore
//! separators are accepted on input and normalized to hyphens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A normalized language code.
///
/// The inner string is always lowercase with hyphen separators.
/// Construction goes through [`LanguageCode::parse`], so a value of
/// this type is never malformed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Parses and normalizes a language tag.
    ///
    /// Lowercases the tag and converts underscores to hyphens. Tags
    /// that are empty or contain characters outside
    /// `[a-z0-9-]` after normalization are rejected.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidLanguageCode` for malformed tags.
    pub fn parse(tag: &str) -> Result<Self> {
        let normalized = normalize(tag);
        if normalized.is_empty() {
            return Err(CoreError::invalid_language_code(tag));
        }
        let valid = normalized
            .split('-')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_alphanumeric()));
        if !valid {
            return Err(CoreError::invalid_language_code(tag));
        }
        Ok(Self(normalized))
    }

    /// Returns the canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the code, returning the canonical string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LanguageCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lowercases a tag and converts underscore separators to hyphens.
fn normalize(tag: &str) -> String {
    tag.trim().to_ascii_lowercase().replace('_', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_separators() {
        assert_eq!(LanguageCode::parse("en-US").unwrap().as_str(), "en-us");
        assert_eq!(LanguageCode::parse("zh_CN").unwrap().as_str(), "zh-cn");
        assert_eq!(LanguageCode::parse("  ja-JP ").unwrap().as_str(), "ja-jp");
    }

    #[test]
    fn parse_accepts_bare_primary_tags() {
        assert_eq!(LanguageCode::parse("fr").unwrap().as_str(), "fr");
    }

    #[test]
    fn parse_rejects_malformed_tags() {
        assert!(LanguageCode::parse("").is_err());
        assert!(LanguageCode::parse("   ").is_err());
        assert!(LanguageCode::parse("en--us").is_err());
        assert!(LanguageCode::parse("-en").is_err());
        assert!(LanguageCode::parse("en us").is_err());
        assert!(LanguageCode::parse("en;q=1").is_err());
    }

    #[test]
    fn serde_round_trip_is_transparent() {
        let code = LanguageCode::parse("zh-CN").unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"zh-cn\"");
        let back: LanguageCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, code);
    }
}
