//! Storage abstraction layer for Polyconf.
//!
//! Defines the [`ConfigStorage`] trait implemented by the relational
//! backends, the [`StorageError`] taxonomy shared by every backend,
//! and the pagination types used by list operations.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{ErrorCategory, StorageError};
pub use traits::ConfigStorage;
pub use types::{
    DEFAULT_PAGE_SIZE, DomainUpdate, MAX_PAGE_SIZE, NewConfiguration, NewDomain, Page, PageParams,
    Pagination,
};
