//! # Pagination
//!
//! Page/limit normalization and the arithmetic shared by the count query
//! and the data query.
//!
//! ## Page vs Offset
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Request: ?page=2&limit=5                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Pagination::new(2, 5)   ← page and limit normalized (≥ 1)             │
//! │       │                                                                 │
//! │       ├── page()   = 2   ← echoed back to the client                   │
//! │       ├── limit()  = 5   ← bound as LIMIT $n                           │
//! │       └── offset() = 5   ← bound as OFFSET $n+1, derived only          │
//! │                                                                         │
//! │  Rows 6..=10 of the matching set                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The offset is never accepted from a caller; it only exists as the output
//! of [`Pagination::offset`].

use serde::Serialize;

/// Rows per page when the request omits `limit` or sends a non-positive one.
pub const DEFAULT_LIMIT: i64 = 10;

/// First page, used when the request omits `page` or sends a non-positive one.
pub const DEFAULT_PAGE: i64 = 1;

/// Normalized page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: i64,
    limit: i64,
}

impl Pagination {
    /// Builds a page request, replacing non-positive values with defaults.
    ///
    /// ## Example
    /// ```rust
    /// use stock_core::pagination::Pagination;
    ///
    /// let p = Pagination::new(0, -3);
    /// assert_eq!(p.page(), 1);
    /// assert_eq!(p.limit(), 10);
    /// assert_eq!(p.offset(), 0);
    /// ```
    pub fn new(page: i64, limit: i64) -> Self {
        Pagination {
            page: if page <= 0 { DEFAULT_PAGE } else { page },
            limit: if limit <= 0 { DEFAULT_LIMIT } else { limit },
        }
    }

    /// Builds a page request from optional query values.
    pub fn from_optional(page: Option<i64>, limit: Option<i64>) -> Self {
        Pagination::new(
            page.unwrap_or(DEFAULT_PAGE),
            limit.unwrap_or(DEFAULT_LIMIT),
        )
    }

    /// Requested page number (1-based).
    #[inline]
    pub const fn page(&self) -> i64 {
        self.page
    }

    /// Rows per page.
    #[inline]
    pub const fn limit(&self) -> i64 {
        self.limit
    }

    /// Row offset for the data query: `(page - 1) * limit`.
    #[inline]
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Total page count for `total` matching rows.
    ///
    /// A result with zero rows still has one (empty) page.
    pub fn total_pages(&self, total: i64) -> i64 {
        let total = total.max(0);
        // `total + limit - 1` would overflow for limits near i64::MAX.
        let pages = total / self.limit + i64::from(total % self.limit != 0);
        pages.max(1)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

// =============================================================================
// Paginated Result
// =============================================================================

/// One page of items plus the metadata needed to render pagination controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginatedResult<T> {
    /// Items on this page, in query order.
    pub items: Vec<T>,

    /// Rows matching the filter, ignoring limit/offset.
    pub total: i64,

    /// Page number (normalized).
    pub page: i64,

    /// Rows per page (normalized).
    pub limit: i64,

    /// `max(1, ceil(total / limit))`
    pub total_pages: i64,
}

impl<T> PaginatedResult<T> {
    /// Pairs a count result and a row set into one page.
    pub fn assemble(items: Vec<T>, total: i64, pagination: Pagination) -> Self {
        PaginatedResult {
            items,
            total,
            page: pagination.page(),
            limit: pagination.limit(),
            total_pages: pagination.total_pages(total),
        }
    }

    /// Number of items on this page (≤ limit).
    pub fn count(&self) -> usize {
        self.items.len()
    }
}
