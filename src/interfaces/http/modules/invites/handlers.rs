//! Invite function handlers

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use super::dto::{InviteData, InviteFailure, InviteFunctionRequest};
use crate::domain::session::Actor;
use crate::interfaces::http::common::ApiError;
use crate::interfaces::http::middleware::resolve_request;
use crate::interfaces::http::state::AppState;

const CORS_HEADERS: [(HeaderName, HeaderValue); 2] = [
    (
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    ),
    (
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("authorization, x-client-info, apikey, content-type"),
    ),
];

fn failure(message: impl Into<String>) -> Response {
    let body = InviteFailure {
        error: message.into(),
    };
    (StatusCode::BAD_REQUEST, CORS_HEADERS, Json(body)).into_response()
}

/// `OPTIONS /functions/v1/invite-employee`: always `ok`, no auth.
pub async fn invite_preflight() -> Response {
    (StatusCode::OK, CORS_HEADERS, "ok").into_response()
}

#[utoipa::path(
    post,
    path = "/functions/v1/invite-employee",
    tag = "Invites",
    request_body = InviteFunctionRequest,
    responses(
        (status = 200, description = "Invitation created and sent", body = InviteData),
        (status = 400, description = "Missing fields, not the company admin, or email already registered", body = InviteFailure)
    ),
    security(("bearer_auth" = []))
)]
pub async fn invite_employee(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request: InviteFunctionRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => return failure(format!("Invalid JSON: {}", e)),
    };
    let command = match request.into_command() {
        Ok(command) => command,
        Err(message) => return failure(message),
    };

    let current = match resolve_request(&state, &headers).await {
        Ok(current) => current,
        Err(e) => return failure(e.message),
    };
    let Some(caller) = Actor::from_snapshot(current.snapshot()) else {
        return failure("Authentication required");
    };

    match state.invites.invite_employee(&caller, command).await {
        Ok(invitation) => {
            let body = InviteData {
                data: invitation.into(),
            };
            (StatusCode::OK, CORS_HEADERS, Json(body)).into_response()
        }
        Err(e) => {
            warn!(user_id = caller.user_id(), error = %e, "Invite failed");
            failure(ApiError::from(e).message)
        }
    }
}
