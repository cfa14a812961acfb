//! Time entry API handlers
//!
//! Every endpoint here belongs to the employee dashboard.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{ClockOutcomeDto, ClockRequest, ClockStatusDto, TimeEntryDto};
use crate::domain::session::Route;
use crate::infrastructure::ReportedPosition;
use crate::interfaces::http::common::{
    require_route, ApiError, ApiResponse, ApiResult, PaginatedResponse, PaginationQuery,
};
use crate::interfaces::http::middleware::CurrentSession;
use crate::interfaces::http::state::AppState;

/// Clock bodies are optional; an empty body reports no position.
fn parse_clock_body(body: &Bytes) -> ApiResult<ReportedPosition> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ReportedPosition::Missing);
    }
    let request: ClockRequest = serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e)))?;
    Ok(request.reported()?)
}

#[utoipa::path(
    get,
    path = "/api/v1/time-entries/current",
    tag = "Time Entries",
    responses(
        (status = 200, description = "Clock state and hours worked so far", body = ApiResponse<ClockStatusDto>),
        (status = 403, description = "Not on the employee dashboard")
    ),
    security(("bearer_auth" = []))
)]
pub async fn current_state(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
) -> ApiResult<Json<ApiResponse<ClockStatusDto>>> {
    let actor = require_route(current.snapshot(), Route::EmployeeDashboard)?;
    let status = state.timeclock.current_state(&actor).await?;
    Ok(Json(ApiResponse::success(status.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/time-entries",
    tag = "Time Entries",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Own entries, newest first", body = ApiResponse<PaginatedResponse<TimeEntryDto>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_own_entries(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Query(query): Query<PaginationQuery>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<TimeEntryDto>>>> {
    let actor = require_route(current.snapshot(), Route::EmployeeDashboard)?;
    let page = state.timeclock.history(&actor, query.params()).await?;
    Ok(Json(ApiResponse::success(page.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/time-entries/clock-in",
    tag = "Time Entries",
    request_body(content = ClockRequest, description = "Optional: position or the reason it is missing"),
    responses(
        (status = 201, description = "Clocked in", body = ApiResponse<ClockOutcomeDto>),
        (status = 409, description = "Already clocked in or action in progress"),
        (status = 503, description = "Store unavailable, retry")
    ),
    security(("bearer_auth" = []))
)]
pub async fn clock_in(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<ApiResponse<ClockOutcomeDto>>)> {
    let actor = require_route(current.snapshot(), Route::EmployeeDashboard)?;
    let position = parse_clock_body(&body)?;
    let outcome = state.timeclock.clock_in(&actor, &position).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(outcome.into())),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/time-entries/{entry_id}/clock-out",
    tag = "Time Entries",
    params(("entry_id" = String, Path, description = "Open time entry id")),
    request_body(content = ClockRequest, description = "Optional: position or the reason it is missing"),
    responses(
        (status = 200, description = "Clocked out", body = ApiResponse<ClockOutcomeDto>),
        (status = 404, description = "No such entry for the caller"),
        (status = 409, description = "Entry already closed or action in progress")
    ),
    security(("bearer_auth" = []))
)]
pub async fn clock_out(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Path(entry_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<ApiResponse<ClockOutcomeDto>>> {
    let actor = require_route(current.snapshot(), Route::EmployeeDashboard)?;
    let position = parse_clock_body(&body)?;
    let outcome = state
        .timeclock
        .clock_out(&actor, &entry_id, &position)
        .await?;
    Ok(Json(ApiResponse::success(outcome.into())))
}
