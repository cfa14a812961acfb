//! Session API handlers

use axum::{Extension, Json};

use super::dto::SessionView;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::CurrentSession;

#[utoipa::path(
    get,
    path = "/api/v1/session",
    tag = "Session",
    responses(
        (status = 200, description = "Resolved identity, profile and route; signed-out callers get route sign-in", body = ApiResponse<SessionView>),
        (status = 503, description = "Session store unavailable")
    ),
    security((), ("bearer_auth" = []))
)]
pub async fn get_session(
    Extension(current): Extension<CurrentSession>,
) -> Json<ApiResponse<SessionView>> {
    Json(ApiResponse::success(SessionView::from(current.snapshot())))
}
