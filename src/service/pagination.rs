//! Page/limit handling shared by every list operation.

use crate::response::{Page, PageMeta};
use serde::Deserialize;

pub const MAX_LIMIT: u32 = 100;

/// Raw `page`/`limit` query parameters; defaults differ per endpoint.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Page below 1 is treated as 1; limit is clamped to `1..=MAX_LIMIT`.
    pub fn new(page: Option<u32>, limit: Option<u32>, default_limit: u32) -> Self {
        PageRequest {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(default_limit).clamp(1, MAX_LIMIT),
        }
    }

    pub fn from_params(params: PageParams, default_limit: u32) -> Self {
        Self::new(params.page, params.limit, default_limit)
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }

    pub fn meta(&self, total: i64) -> PageMeta {
        PageMeta {
            page: self.page,
            limit: self.limit,
            total,
            total_pages: total_pages(total, self.limit),
        }
    }

    pub fn into_page<T>(self, items: Vec<T>, total: i64) -> Page<T> {
        Page {
            items,
            meta: self.meta(total),
        }
    }
}

/// ceil(total / limit).
pub fn total_pages(total: i64, limit: u32) -> i64 {
    if total <= 0 || limit == 0 {
        return 0;
    }
    let limit = i64::from(limit);
    (total + limit - 1) / limit
}
