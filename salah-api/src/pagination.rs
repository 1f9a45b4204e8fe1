//! Pagination utilities
//!
//! List endpoints accept `PageNumber`/`PageSize` query parameters
//! (1-indexed; size defaults to 10, capped at 50) and answer with a
//! `PagedResponse` envelope payload.

/// Default rows per page when the client doesn't ask
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Upper bound on rows per page
pub const MAX_PAGE_SIZE: i64 = 50;

/// Serde default for `PageNumber` query parameters
pub fn default_page_number() -> i64 {
    1
}

/// Serde default for `PageSize` query parameters
pub fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Sanitized paging window for a SQL LIMIT/OFFSET query
#[derive(Debug, Clone, Copy)]
pub struct PageWindow {
    /// Page number (1-indexed)
    pub page_number: i64,
    /// Rows per page, within [1, MAX_PAGE_SIZE]
    pub page_size: i64,
    /// Offset for SQL LIMIT/OFFSET
    pub offset: i64,
}

/// Clamp raw query parameters into a valid window
///
/// An out-of-range page simply yields an empty page; it is not clamped to
/// the last page.
pub fn page_window(page_number: i64, page_size: i64) -> PageWindow {
    let page_number = page_number.max(1);
    let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
    PageWindow {
        page_number,
        page_size,
        offset: (page_number - 1) * page_size,
    }
}
