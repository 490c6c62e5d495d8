//! Input and pagination types used by the storage traits.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StorageError;

/// Default page size for list operations.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound on page size, to keep list queries bounded.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Input for creating a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDomain {
    /// The unique domain name.
    pub name: String,
    /// The configuration the domain resolves to.
    pub config_id: i64,
}

/// Partial update for a domain. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainUpdate {
    /// New domain name, if renaming.
    pub name: Option<String>,
    /// New configuration id, if repointing.
    pub config_id: Option<i64>,
}

/// Input for creating a base configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewConfiguration {
    /// Opaque link definitions.
    #[serde(default)]
    pub links: Map<String, Value>,
    /// Opaque permission flags.
    #[serde(default)]
    pub permissions: Map<String, Value>,
}

/// Validated pagination parameters (1-based page numbers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    page: u32,
    page_size: u32,
}

impl PageParams {
    /// Creates validated pagination parameters.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidInput` when `page` is zero or
    /// `page_size` is zero or exceeds [`MAX_PAGE_SIZE`].
    pub fn new(page: u32, page_size: u32) -> Result<Self, StorageError> {
        if page == 0 {
            return Err(StorageError::invalid_input("page must be >= 1"));
        }
        if page_size == 0 {
            return Err(StorageError::invalid_input("page_size must be >= 1"));
        }
        if page_size > MAX_PAGE_SIZE {
            return Err(StorageError::invalid_input(format!(
                "page_size must be <= {MAX_PAGE_SIZE}"
            )));
        }
        Ok(Self { page, page_size })
    }

    /// Returns the 1-based page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the row offset for this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// The 1-based page number served.
    pub page: u32,
    /// The requested page size.
    pub page_size: u32,
    /// Total number of matching records.
    pub total: u64,
    /// Total number of pages: `ceil(total / page_size)`.
    pub total_pages: u64,
}

impl Pagination {
    /// Builds pagination metadata from the request parameters and the
    /// total record count.
    #[must_use]
    pub fn of(params: PageParams, total: u64) -> Self {
        let page_size = u64::from(params.page_size());
        Self {
            page: params.page(),
            page_size: params.page_size(),
            total,
            total_pages: total.div_ceil(page_size),
        }
    }
}

/// A page of results plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The records on this page. Never longer than `page_size`.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_params_validation() {
        assert!(PageParams::new(0, 10).is_err());
        assert!(PageParams::new(1, 0).is_err());
        assert!(PageParams::new(1, MAX_PAGE_SIZE + 1).is_err());

        let params = PageParams::new(3, 25).unwrap();
        assert_eq!(params.page(), 3);
        assert_eq!(params.page_size(), 25);
        assert_eq!(params.offset(), 50);
    }

    #[test]
    fn pagination_total_pages_is_ceiling_division() {
        let params = PageParams::new(1, 10).unwrap();
        assert_eq!(Pagination::of(params, 0).total_pages, 0);
        assert_eq!(Pagination::of(params, 1).total_pages, 1);
        assert_eq!(Pagination::of(params, 10).total_pages, 1);
        assert_eq!(Pagination::of(params, 11).total_pages, 2);
        assert_eq!(Pagination::of(params, 99).total_pages, 10);
        assert_eq!(Pagination::of(params, 100).total_pages, 10);
    }

    #[test]
    fn pagination_holds_for_arbitrary_sizes() {
        for page_size in 1..=17u32 {
            let params = PageParams::new(1, page_size).unwrap();
            for total in 0..=200u64 {
                let pagination = Pagination::of(params, total);
                let expected = total.div_ceil(u64::from(page_size));
                assert_eq!(pagination.total_pages, expected);
            }
        }
    }
}
