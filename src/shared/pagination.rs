//! Pagination
//!
//! Offset pagination shared by list and search endpoints.

use serde::{Deserialize, Serialize};

/// Default page size when the client does not send one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on requested page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page request read from `?page=&size=&sort=`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    /// Zero-based page index
    #[serde(default)]
    pub page: u32,

    /// Requested page size
    #[serde(default = "default_size")]
    pub size: u32,

    /// `field[,asc|desc]`
    #[serde(default)]
    pub sort: Option<String>,
}

fn default_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: None,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            sort: None,
        }
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Page size clamped to `1..=MAX_PAGE_SIZE`.
    pub fn limit(&self) -> i64 {
        self.size.clamp(1, MAX_PAGE_SIZE) as i64
    }

    /// Row offset of the first element on this page.
    pub fn offset(&self) -> i64 {
        self.page as i64 * self.limit()
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: i64,
    pub total_pages: i64,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: i64) -> Self {
        let size = request.limit();
        let total_pages = if total_elements <= 0 {
            0
        } else {
            (total_elements + size - 1) / size
        };

        Self {
            content,
            page: request.page,
            size: size as u32,
            total_elements,
            total_pages,
            first: request.page == 0,
            last: (request.page as i64 + 1) >= total_pages,
        }
    }

    pub fn empty(request: &PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            first: self.first,
            last: self.last,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(PageRequest::new(0, 0).limit(), 1);
        assert_eq!(PageRequest::new(0, 500).limit(), MAX_PAGE_SIZE as i64);
        assert_eq!(PageRequest::new(3, 20).offset(), 60);
    }

    #[test]
    fn test_page_totals() {
        let request = PageRequest::new(1, 10);
        let page = Page::new(vec![1, 2, 3], &request, 23);

        assert_eq!(page.total_pages, 3);
        assert!(!page.first);
        assert!(!page.last);
    }

    #[test]
    fn test_empty_page() {
        let page: Page<i32> = Page::empty(&PageRequest::default());

        assert!(page.is_empty());
        assert_eq!(page.total_elements, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.first);
        assert!(page.last);
    }

    #[test]
    fn test_page_request_defaults_from_query() {
        let request: PageRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, PageRequest::default());
    }

    #[test]
    fn test_page_serializes_camel_case() {
        let page = Page::new(vec!["a"], &PageRequest::default(), 1);
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["totalElements"], 1);
        assert_eq!(json["totalPages"], 1);
    }
}
