//! # Pagination
//!
//! Offset windows for the admin catalog tables.
//!
//! Pages are 1-based on the wire. Page `n` covers rows
//! `from = (n - 1) * size` through `to = from + size - 1`, both inclusive,
//! over rows ordered by name.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::ITEMS_PER_PAGE;

/// A requested page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Creates a page request. `page` starts at 1.
    pub fn new(page: u32, per_page: u32) -> Result<Self, ValidationError> {
        if page == 0 {
            return Err(ValidationError::InvalidFormat {
                field: "page".to_string(),
                reason: "pages start at 1".to_string(),
            });
        }
        if per_page == 0 {
            return Err(ValidationError::InvalidFormat {
                field: "per_page".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(PageRequest { page, per_page })
    }

    /// First page with the default size.
    pub fn first() -> Self {
        PageRequest {
            page: 1,
            per_page: ITEMS_PER_PAGE,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Inclusive row range `(from, to)`.
    pub fn range(&self) -> (u64, u64) {
        let from = self.offset();
        (from, from + u64::from(self.per_page) - 1)
    }

    /// SQL OFFSET.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    /// SQL LIMIT.
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest::first()
    }
}

/// One page of rows plus the exact total count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        let per_page = u64::from(request.per_page);
        Page {
            items,
            page: request.page,
            per_page: request.per_page,
            total,
            total_pages: total.div_ceil(per_page),
        }
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Maps the rows, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_windows() {
        assert_eq!(PageRequest::first().range(), (0, 9));
        assert_eq!(PageRequest::new(2, 10).unwrap().range(), (10, 19));
        assert_eq!(PageRequest::new(3, 5).unwrap().offset(), 10);
        assert!(PageRequest::new(0, 10).is_err());
        assert!(PageRequest::new(1, 0).is_err());
    }

    #[test]
    fn test_page_metadata() {
        let request = PageRequest::new(2, 10).unwrap();
        let page = Page::new(vec![1, 2, 3, 4, 5], request, 15);
        assert_eq!(page.total_pages, 2);
        assert!(!page.has_next());
        assert!(page.has_previous());

        let empty: Page<i32> = Page::new(vec![], PageRequest::first(), 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next());
        assert!(!empty.has_previous());
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = Page::new(vec![1, 2], PageRequest::first(), 2).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total, 2);
    }
}
