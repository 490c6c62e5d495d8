//! Cache store adapter.
//!
//! The adapter is value-or-absent from the caller's perspective: a
//! transport or serialization failure is logged, counted and treated
//! as a miss (or a no-op on writes), never surfaced as an error.

pub mod backend;
pub mod keys;
pub mod payload;

pub use backend::{CacheBackend, CachedEntry};
pub use payload::PayloadCache;
