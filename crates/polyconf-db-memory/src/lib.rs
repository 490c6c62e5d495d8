//! In-memory storage backend for Polyconf.
//!
//! Implements the `ConfigStorage` trait over concurrent maps. Used by
//! tests and single-node development; it upholds the same contracts as
//! the PostgreSQL backend, including unique domain names and the
//! one-translation-per-`(config_id, language)` invariant.

mod storage;

pub use polyconf_storage::{ConfigStorage, StorageError};
pub use storage::MemoryStorage;

/// Type alias for a shareable ConfigStorage instance.
pub type DynConfigStorage = std::sync::Arc<dyn ConfigStorage>;

/// Creates a new in-memory ConfigStorage instance.
pub fn create_memory_storage() -> DynConfigStorage {
    std::sync::Arc::new(MemoryStorage::new())
}
