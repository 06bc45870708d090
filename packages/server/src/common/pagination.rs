//! Offset-based pagination types shared by the query engine and the
//! HTTP boundary.
//!
//! Pages are 1-based fixed-size windows over a filtered, totally-ordered
//! result set. A page past the end of the result set is an empty item
//! list, not an error.

use serde::Serialize;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: i64 = 12;

/// Upper bound on the page size a caller may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Validated pagination parameters.
///
/// Out-of-range input clamps rather than errors: `page` has a floor of 1,
/// `page_size` is clamped into [1, MAX_PAGE_SIZE].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: i64,
    pub page_size: i64,
}

impl PageParams {
    /// Build params from raw caller input, applying defaults and clamping.
    pub fn clamped(page: Option<i64>, page_size: Option<i64>) -> Self {
        PageParams {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Row offset of the first item on this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

impl Default for PageParams {
    fn default() -> Self {
        PageParams {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus the pre-pagination total.
///
/// Echoes the effective `page`/`page_size` so callers see the clamped
/// values actually applied.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Number of pages needed to cover `total` rows.
    pub fn page_count(&self) -> i64 {
        if self.total == 0 {
            0
        } else {
            (self.total + self.page_size - 1) / self.page_size
        }
    }
}
