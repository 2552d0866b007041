//! Offset pagination helpers for listing endpoints.

use serde::{Deserialize, Serialize};

/// First page number; pages are 1-based.
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size when the query string omits `per_page`.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Upper bound on page size regardless of what the caller asks for.
pub const MAX_PER_PAGE: u32 = 100;

/// Query parameters shared by paged listing endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageParams {
    /// Clamp to sane bounds: page at least 1, per_page within 1..=MAX_PER_PAGE.
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// SQL LIMIT value.
    pub fn limit(&self) -> i64 {
        i64::from(self.clamped().per_page)
    }

    /// SQL OFFSET value.
    pub fn offset(&self) -> i64 {
        let p = self.clamped();
        i64::from(p.page - 1) * i64::from(p.per_page)
    }
}

/// Response envelope for paged listings.
#[derive(Debug, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>, params: PageParams, total: i64) -> Self {
        let params = params.clamped();
        Self {
            items,
            page: params.page,
            per_page: params.per_page,
            total,
        }
    }
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}
