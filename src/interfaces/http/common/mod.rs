//! Shared HTTP building blocks: response envelope, error mapping and
//! validated JSON extraction.

pub mod api_error;
pub mod api_response;
pub mod validated_json;

pub use api_error::{require_route, ApiError, ApiResult};
pub use api_response::{ApiResponse, PaginatedResponse, PaginationQuery};
pub use validated_json::ValidatedJson;
