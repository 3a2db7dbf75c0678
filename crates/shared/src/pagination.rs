//! Offset pagination utilities.
//!
//! Paged queries share one contract: `page` starts at 1, `limit` is clamped
//! to a sane ceiling, the filtered total is counted before the page is cut,
//! and `pages = ceil(total / limit)`.

use serde::Serialize;
use thiserror::Error;

/// Page size applied when the caller does not send one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Upper bound on page size; larger requests are clamped, not rejected.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Error type for pagination parameters.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("page must be 1 or greater")]
    InvalidPage,
    #[error("limit must be 1 or greater")]
    InvalidLimit,
}

/// Validated page/limit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    page: i64,
    limit: i64,
}

impl PageParams {
    /// Builds validated parameters, applying defaults for absent values.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Result<Self, PageError> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);

        if page < 1 {
            return Err(PageError::InvalidPage);
        }
        if limit < 1 {
            return Err(PageError::InvalidLimit);
        }

        Ok(Self {
            page,
            limit: limit.min(MAX_PAGE_SIZE),
        })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Row offset of the first item on this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Assembles response metadata for a filtered total.
    pub fn meta(&self, total: i64) -> PageMeta {
        PageMeta {
            page: self.page,
            limit: self.limit,
            total,
            pages: total_pages(total, self.limit),
        }
    }
}

/// Pagination block returned alongside paged collections.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

/// Number of pages needed for `total` rows at `limit` per page.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 {
        0
    } else {
        (total + limit - 1) / limit
    }
}
