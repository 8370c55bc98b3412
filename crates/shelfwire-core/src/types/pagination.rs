//! Pagination types for list endpoints.
//!
//! Page indexes are zero-based: page 0 is the newest page of a
//! created-descending listing.

use serde::{Deserialize, Serialize};

/// Default page size.
const DEFAULT_PAGE_SIZE: u64 = 20;
/// Maximum page size.
const MAX_PAGE_SIZE: u64 = 100;
/// Maximum page index. Keeps `page * size` within `i64`, the SQL
/// OFFSET bind type, for any clamped size.
const MAX_PAGE: u64 = i64::MAX as u64 / MAX_PAGE_SIZE;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page index (zero-based).
    #[serde(default)]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_page_size")]
    pub size: u64,
}

impl PageRequest {
    /// Create a new page request, clamping the size into `1..=100` and
    /// the page index into range for a SQL OFFSET.
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page: page.min(MAX_PAGE),
            size: size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Calculate the SQL `OFFSET` value.
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }

    /// Return the SQL `LIMIT` value.
    pub fn limit(&self) -> u64 {
        self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items on this page.
    pub content: Vec<T>,
    /// Current page index (zero-based).
    pub page: u64,
    /// Number of items per page.
    pub size: u64,
    /// Total number of items across all pages.
    pub total_elements: u64,
    /// Total number of pages.
    pub total_pages: u64,
    /// Whether this is the first page.
    pub first: bool,
    /// Whether this is the last page.
    pub last: bool,
}

impl<T> PageResponse<T> {
    /// Create a new paginated response.
    ///
    /// An empty result set still reports one (empty) page so that
    /// `first`/`last` stay well-defined.
    pub fn new(content: Vec<T>, page: u64, size: u64, total_elements: u64) -> Self {
        let total_pages = if total_elements == 0 {
            1
        } else {
            total_elements.div_ceil(size.max(1))
        };
        Self {
            content,
            page,
            size,
            total_elements,
            total_pages,
            first: page == 0,
            last: page + 1 >= total_pages,
        }
    }

    /// Map the page content into another type, preserving page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResponse<U> {
        PageResponse {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            first: self.first,
            last: self.last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_page_times_size() {
        let req = PageRequest::new(3, 20);
        assert_eq!(req.offset(), 60);
        assert_eq!(req.limit(), 20);
    }

    #[test]
    fn size_is_clamped() {
        assert_eq!(PageRequest::new(0, 0).size, 1);
        assert_eq!(PageRequest::new(0, 5000).size, 100);
    }

    #[test]
    fn huge_page_index_keeps_offset_in_sql_range() {
        let req = PageRequest::new(u64::MAX, 100);
        assert!(req.offset() <= i64::MAX as u64);

        let req = PageRequest::new(u64::MAX, 1);
        assert!(req.offset() <= i64::MAX as u64);
    }

    #[test]
    fn first_and_last_flags() {
        let page0: PageResponse<u32> = PageResponse::new(vec![1, 2, 3], 0, 3, 7);
        assert!(page0.first);
        assert!(!page0.last);
        assert_eq!(page0.total_pages, 3);

        let page2: PageResponse<u32> = PageResponse::new(vec![7], 2, 3, 7);
        assert!(!page2.first);
        assert!(page2.last);
    }

    #[test]
    fn single_page_is_first_and_last() {
        let only: PageResponse<u32> = PageResponse::new(vec![1], 0, 10, 1);
        assert!(only.first);
        assert!(only.last);
        assert_eq!(only.total_pages, 1);
    }

    #[test]
    fn empty_result_reports_one_page() {
        let empty: PageResponse<u32> = PageResponse::new(vec![], 0, 10, 0);
        assert!(empty.first);
        assert!(empty.last);
        assert_eq!(empty.total_pages, 1);
    }

    #[test]
    fn page_sizes_sum_to_total() {
        // 10 items, size 4 -> pages of 4, 4, 2
        let total = 10u64;
        let size = 4u64;
        let pages = total.div_ceil(size);
        let mut seen = 0;
        for p in 0..pages {
            let on_page = size.min(total - p * size);
            seen += on_page;
            let resp: PageResponse<u64> =
                PageResponse::new((0..on_page).collect(), p, size, total);
            assert_eq!(resp.last, p == pages - 1);
        }
        assert_eq!(seen, total);
    }
}
