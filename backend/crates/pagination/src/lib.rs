//! Offset pagination primitives shared by back-office repositories.
//!
//! Every list operation in the back office pages through rows with the same
//! algorithm: a 1-based page number and a page size translate into a SQL
//! `LIMIT`/`OFFSET` pair, and the result travels back as a [`Page`] carrying
//! the page's items plus the total number of rows matching the filter.
//!
//! ```
//! use pagination::{Page, PageRequest};
//!
//! let request = PageRequest::new(3, 15).expect("valid page request");
//! assert_eq!(request.offset(), 30);
//! assert_eq!(request.limit(), 15);
//!
//! let page = Page::new(vec!["a", "b"], 32);
//! assert_eq!(page.total(), 32);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size applied when a caller omits `itemsPerPage`.
pub const DEFAULT_ITEMS_PER_PAGE: i64 = 15;

/// Largest page size a caller may request.
pub const MAX_ITEMS_PER_PAGE: i64 = 100;

/// Compute the row offset for a 1-based page.
///
/// `page <= 1` always yields `0`, whatever `items_per_page` holds, so a
/// zero or negative page size can never push the first page past the start
/// of the result set. Larger pages saturate instead of overflowing.
///
/// ```
/// use pagination::offset_for;
///
/// assert_eq!(offset_for(1, 15), 0);
/// assert_eq!(offset_for(1, -4), 0);
/// assert_eq!(offset_for(4, 10), 30);
/// ```
#[must_use]
pub fn offset_for(page: i64, items_per_page: i64) -> i64 {
    if page <= 1 {
        return 0;
    }
    let size = items_per_page.max(0);
    (page - 1).saturating_mul(size)
}

/// Validation failures raised by [`PageRequest::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// The page number was zero or negative.
    #[error("page must be at least 1, got {page}")]
    NonPositivePage {
        /// Rejected page number.
        page: i64,
    },
    /// The page size was zero or negative.
    #[error("itemsPerPage must be at least 1, got {items_per_page}")]
    NonPositiveItemsPerPage {
        /// Rejected page size.
        items_per_page: i64,
    },
    /// The page size exceeded [`MAX_ITEMS_PER_PAGE`].
    #[error("itemsPerPage must be at most {max}, got {items_per_page}")]
    ItemsPerPageTooLarge {
        /// Rejected page size.
        items_per_page: i64,
        /// Upper bound that was exceeded.
        max: i64,
    },
}

/// Validated 1-based page selection.
///
/// ## Invariants
/// - `page >= 1`.
/// - `1 <= items_per_page <= MAX_ITEMS_PER_PAGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: i64,
    items_per_page: i64,
}

impl PageRequest {
    /// Validate a page number and page size.
    ///
    /// # Errors
    ///
    /// Returns a [`PageRequestError`] when either value is out of range.
    pub const fn new(page: i64, items_per_page: i64) -> Result<Self, PageRequestError> {
        if page < 1 {
            return Err(PageRequestError::NonPositivePage { page });
        }
        if items_per_page < 1 {
            return Err(PageRequestError::NonPositiveItemsPerPage { items_per_page });
        }
        if items_per_page > MAX_ITEMS_PER_PAGE {
            return Err(PageRequestError::ItemsPerPageTooLarge {
                items_per_page,
                max: MAX_ITEMS_PER_PAGE,
            });
        }
        Ok(Self {
            page,
            items_per_page,
        })
    }

    /// Build a request from optional caller input, applying the defaults
    /// (`page = 1`, `items_per_page = DEFAULT_ITEMS_PER_PAGE`).
    ///
    /// # Errors
    ///
    /// Returns a [`PageRequestError`] when a supplied value is out of range.
    pub fn from_optional(
        page: Option<i64>,
        items_per_page: Option<i64>,
    ) -> Result<Self, PageRequestError> {
        Self::new(
            page.unwrap_or(1),
            items_per_page.unwrap_or(DEFAULT_ITEMS_PER_PAGE),
        )
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> i64 {
        self.page
    }

    /// Maximum number of rows on this page.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.items_per_page
    }

    /// Number of rows skipped before this page starts.
    #[must_use]
    pub fn offset(&self) -> i64 {
        offset_for(self.page, self.items_per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

/// One page of results plus the total number of matching rows.
///
/// Serializes as `{"items": [...], "total": n}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    items: Vec<T>,
    total: i64,
}

impl<T> Page<T> {
    /// Assemble a page from its rows and the filter-wide row count.
    #[must_use]
    pub const fn new(items: Vec<T>, total: i64) -> Self {
        Self { items, total }
    }

    /// An empty page with a zero total.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }

    /// Rows on this page, in repository order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Count of all rows matching the filter, across every page.
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.total
    }

    /// Consume the page, returning its rows.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Convert every row while keeping the total.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Offset arithmetic and page envelope behaviour.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 15, 0)]
    #[case(2, 15, 15)]
    #[case(3, 7, 14)]
    #[case(10, 1, 9)]
    fn offset_is_previous_pages_times_size(
        #[case] page: i64,
        #[case] items_per_page: i64,
        #[case] expected: i64,
    ) {
        assert_eq!(offset_for(page, items_per_page), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    #[case(15)]
    #[case(i64::MAX)]
    fn first_page_always_starts_at_zero(#[case] items_per_page: i64) {
        assert_eq!(offset_for(1, items_per_page), 0);
    }

    #[rstest]
    fn negative_page_size_never_produces_negative_offset() {
        assert_eq!(offset_for(5, -10), 0);
    }

    #[rstest]
    fn huge_pages_saturate() {
        assert_eq!(offset_for(i64::MAX, i64::MAX), i64::MAX);
    }

    #[rstest]
    #[case(0, 15, PageRequestError::NonPositivePage { page: 0 })]
    #[case(-1, 15, PageRequestError::NonPositivePage { page: -1 })]
    #[case(1, 0, PageRequestError::NonPositiveItemsPerPage { items_per_page: 0 })]
    #[case(1, 101, PageRequestError::ItemsPerPageTooLarge { items_per_page: 101, max: 100 })]
    fn invalid_requests_are_rejected(
        #[case] page: i64,
        #[case] items_per_page: i64,
        #[case] expected: PageRequestError,
    ) {
        assert_eq!(PageRequest::new(page, items_per_page), Err(expected));
    }

    #[rstest]
    fn optional_input_falls_back_to_defaults() {
        let request = PageRequest::from_optional(None, None).expect("defaults are valid");
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), DEFAULT_ITEMS_PER_PAGE);
        assert_eq!(request.offset(), 0);
    }

    #[rstest]
    fn page_serializes_items_and_total() {
        let page = Page::new(vec![1, 2], 9);
        let value = serde_json::to_value(&page).expect("page serializes");
        assert_eq!(value, serde_json::json!({ "items": [1, 2], "total": 9 }));
    }

    #[rstest]
    fn map_keeps_total() {
        let page = Page::new(vec![1, 2, 3], 12).map(|n| n * 2);
        assert_eq!(page.items(), &[2, 4, 6]);
        assert_eq!(page.total(), 12);
    }
}
