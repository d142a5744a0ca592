//! Pagination metadata for list endpoints

use serde::{Deserialize, Serialize};

/// Page descriptor returned alongside a page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page (1-based)
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Total records matching the filter
    pub total_count: u64,
    /// `ceil(total_count / limit)`
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total_count: u64) -> Self {
        let total_pages = if limit > 0 {
            total_count.div_ceil(u64::from(limit))
        } else {
            0
        };

        Self {
            page,
            limit,
            total_count,
            total_pages,
            has_next: u64::from(page) < total_pages,
            has_prev: page > 1,
        }
    }
}
