//! Pagination primitives shared by the list endpoints

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Sort direction for paged queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// A resolved page window: 1-based page number and a clamped page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }

    /// Slice an already filtered and sorted collection down to this window
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset() as usize)
            .take(self.limit as usize)
            .collect()
    }
}

/// Page metadata returned alongside the items
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total_items: i64,
    pub total_pages: i64,
}

/// Page envelope: items of the requested window plus page metadata
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, pagination: Pagination, total_items: i64) -> Self {
        let limit = pagination.limit as i64;
        Self {
            items,
            meta: PageMeta {
                page: pagination.page,
                limit: pagination.limit,
                total_items,
                total_pages: (total_items + limit - 1) / limit,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults_and_clamps() {
        assert_eq!(Pagination::new(None, None), Pagination { page: 1, limit: 10 });
        assert_eq!(
            Pagination::new(Some(0), Some(1_000)),
            Pagination { page: 1, limit: 100 }
        );
        assert_eq!(Pagination::new(Some(3), Some(0)).limit, 1);
    }

    #[test]
    fn test_pagination_window() {
        let pagination = Pagination::new(Some(2), Some(3));
        assert_eq!(pagination.offset(), 3);
        assert_eq!(pagination.apply((1..=8).collect()), vec![4, 5, 6]);
    }

    #[test]
    fn test_page_counts_partial_last_page() {
        let page = Page::new(vec!["a"], Pagination::new(Some(1), Some(4)), 9);
        assert_eq!(page.meta.total_pages, 3);

        let empty: Page<&str> = Page::new(vec![], Pagination::new(None, None), 0);
        assert_eq!(empty.meta.total_pages, 0);
    }
}
