use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub total_pages: i64,
    pub page: i64,
    pub per_page: i64,
}

/// Number of pages needed for `total` records at `per_page` a page.
pub fn total_pages(total: i64, per_page: i64) -> i64 {
    if per_page <= 0 {
        return 0;
    }
    (total + per_page - 1) / per_page
}
