use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;

/// Pagination parameters for list queries
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct PaginationParams {
    /// Page number (1-indexed).
    pub page: Option<i64>,
    /// Number of items per page.
    pub limit: Option<i64>,
}

impl PaginationParams {
    /// Default limit when a page is requested without a limit
    pub const DEFAULT_LIMIT: i64 = 50;
    /// Maximum allowed limit
    pub const MAX_LIMIT: i64 = 200;

    /// Builds params from query values, falling back to `default_limit` when no limit was given.
    pub fn from_query(page: Option<i64>, limit: Option<i64>, default_limit: i64) -> Self {
        Self {
            page,
            limit: Some(limit.unwrap_or(default_limit)),
        }
    }

    pub fn effective_page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Get the effective limit, applying defaults and max constraints
    pub fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT).clamp(1, Self::MAX_LIMIT)
    }

    /// SQL OFFSET for the effective page and limit; saturates for absurd page numbers.
    pub fn offset(&self) -> i64 {
        (self.effective_page() - 1).saturating_mul(self.effective_limit())
    }
}

/// Paginated response wrapper with metadata
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct PaginatedResponse<T> {
    /// The actual data items
    pub data: Vec<T>,
    /// Current page number (1-indexed)
    pub page: i64,
    /// Number of items per page
    pub limit: i64,
    /// Total number of items across all pages
    pub total_items: i64,
    /// Total number of pages
    pub total_pages: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: i64, limit: i64, total_items: i64) -> Self {
        let total_pages = if limit > 0 { (total_items + limit - 1) / limit } else { 1 };

        Self {
            data,
            page,
            limit,
            total_items,
            total_pages,
        }
    }

    pub fn from_params(data: Vec<T>, params: &PaginationParams, total_items: i64) -> Self {
        Self::new(data, params.effective_page(), params.effective_limit(), total_items)
    }
}
