//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size.
pub const DEFAULT_PER_PAGE: u64 = 20;
/// Maximum page size.
pub const MAX_PER_PAGE: u64 = 100;
/// Largest offset a SQL `OFFSET` (a signed 64-bit value) accepts.
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub per_page: u64,
}

impl PageRequest {
    /// Create a new page request, clamping out-of-range values.
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Number of items to skip, saturating at [`MAX_OFFSET`].
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.per_page)
            .min(MAX_OFFSET)
    }

    /// Number of items to return.
    pub fn limit(&self) -> u64 {
        self.per_page
    }

    /// The offset as a bind parameter for `OFFSET`.
    pub fn sql_offset(&self) -> i64 {
        i64::try_from(self.offset()).unwrap_or(i64::MAX)
    }

    /// The limit as a bind parameter for `LIMIT`.
    pub fn sql_limit(&self) -> i64 {
        i64::try_from(self.limit()).unwrap_or(i64::MAX)
    }

    /// Whether this is the default first page.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Current page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub per_page: u64,
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Total number of pages.
    pub total_pages: u64,
    /// Whether there is a next page.
    pub has_next: bool,
    /// Whether there is a previous page.
    pub has_previous: bool,
}

impl<T> PageResponse<T> {
    /// Create a new paginated response.
    pub fn new(items: Vec<T>, page: &PageRequest, total_items: u64) -> Self {
        let total_pages = if total_items == 0 {
            1
        } else {
            total_items.div_ceil(page.per_page)
        };
        Self {
            items,
            page: page.page,
            per_page: page.per_page,
            total_items,
            total_pages,
            has_next: page.page < total_pages,
            has_previous: page.page > 1,
        }
    }

    /// Transform the items while keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResponse<U> {
        PageResponse {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_clamps() {
        let req = PageRequest::new(0, 1000);
        assert_eq!(req.page, 1);
        assert_eq!(req.per_page, MAX_PER_PAGE);
        assert_eq!(req.offset(), 0);
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
    }

    #[test]
    fn test_huge_page_saturates_offset() {
        let req = PageRequest::new(u64::MAX, MAX_PER_PAGE);
        assert_eq!(req.offset(), MAX_OFFSET);
        assert_eq!(req.sql_offset(), i64::MAX);
        assert_eq!(req.sql_limit(), MAX_PER_PAGE as i64);

        let req = PageRequest {
            page: u64::MAX,
            per_page: u64::MAX,
        };
        assert_eq!(req.sql_offset(), i64::MAX);
        assert_eq!(req.sql_limit(), i64::MAX);
    }

    #[test]
    fn test_page_response_counts() {
        let req = PageRequest::new(2, 10);
        let page = PageResponse::new(vec![1, 2, 3], &req, 23);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
        assert!(page.has_previous);

        let empty: PageResponse<i32> = PageResponse::new(vec![], &PageRequest::default(), 0);
        assert_eq!(empty.total_pages, 1);
        assert!(!empty.has_next);
    }

    #[test]
    fn test_page_response_serializes_camel_case() {
        let page = PageResponse::new(vec!["a"], &PageRequest::default(), 1);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["perPage"], 20);
        assert_eq!(json["totalItems"], 1);
        assert_eq!(json["hasNext"], false);
    }
}
