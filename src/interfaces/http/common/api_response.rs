//! Common API DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::{PaginatedResult, PaginationParams};

/// Standard response envelope.
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "error": "...", "code": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// Payload, `null` on failure (except for route mismatches)
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable error category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Pagination query parameters
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct PaginationQuery {
    /// Page number (1-based). Default: 1
    pub page: Option<u32>,
    /// Page size (1-100). Default: 20
    pub limit: Option<u32>,
}

impl PaginationQuery {
    pub fn params(&self) -> PaginationParams {
        crate::shared::validate_pagination(self.page, self.limit)
    }
}

/// One page of items plus paging metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    /// Total across all pages
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T, U> From<PaginatedResult<U>> for PaginatedResponse<T>
where
    T: From<U>,
{
    fn from(result: PaginatedResult<U>) -> Self {
        Self {
            items: result.items.into_iter().map(T::from).collect(),
            total: result.total,
            page: result.page,
            limit: result.limit,
            total_pages: result.total_pages,
        }
    }
}
