//! Page-number pagination arithmetic.
//!
//! Page sizes are clamped into `[MIN_PAGE_SIZE, MAX_PAGE_SIZE]`; a missing size
//! falls back to `DEFAULT_PAGE_SIZE`. Page numbers are 1-based.

use serde::{Deserialize, Serialize};

pub const MIN_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 25;
pub const DEFAULT_PAGE_SIZE: u32 = 15;

/// A requested page, normalized, plus the total once it is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
}

/// Pagination block returned alongside list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub total_items: u64,
    pub total_pages: u32,
    pub page_size: u32,
    pub current_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl Pagination {
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        let page_size = page_size
            .map(|size| size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE))
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Self {
            page: page.unwrap_or(1).max(1),
            page_size,
            total_items: 0,
        }
    }

    pub fn with_total_items(mut self, total_items: u64) -> Self {
        self.total_items = total_items;
        self
    }

    /// Rows to skip for the current page.
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    /// Number of the last page; `0` when there are no items.
    pub fn last_page(&self) -> u32 {
        let size = u64::from(self.page_size);
        u32::try_from(self.total_items.div_ceil(size)).unwrap_or(u32::MAX)
    }

    pub fn info(&self) -> PageInfo {
        PageInfo {
            total_items: self.total_items,
            total_pages: self.last_page(),
            page_size: self.page_size,
            current_page: self.page,
        }
    }
}
