//! Shared time helpers.

use time::OffsetDateTime;

/// Returns the current UTC time.
#[must_use]
pub fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}
