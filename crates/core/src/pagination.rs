//! Offset-based pagination arithmetic and the response envelope.

use serde::Serialize;

/// Pagination metadata derived from the requested page/limit and the total
/// number of matching rows. Constructed fresh per call; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PageInfo {
    /// `page` must already be clamped to >= 1 and `limit` to [1, 100] by the
    /// query parser.
    pub fn new(page: i64, limit: i64, total: i64) -> PageInfo {
        let total_pages = if total == 0 {
            0
        } else {
            (total + limit - 1) / limit
        };
        PageInfo {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1 && total > 0,
        }
    }
}

/// A page of items plus its pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: i64, limit: i64, total: i64) -> Paginated<T> {
        Paginated {
            items,
            pagination: PageInfo::new(page, limit, total),
        }
    }
}
