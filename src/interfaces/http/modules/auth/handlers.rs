//! Authentication API handlers

use axum::{extract::State, http::StatusCode, Extension, Json};
use tracing::info;

use super::dto::{
    AcceptInviteRequest, IdentityDto, SessionTokenResponse, SignInRequest, SignUpRequest,
};
use crate::application::ports::SignUpMetadata;
use crate::domain::profile::Role;
use crate::interfaces::http::common::{ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::CurrentSession;
use crate::interfaces::http::state::AppState;

async fn sign_up(
    state: &AppState,
    request: SignUpRequest,
    role: Role,
) -> ApiResult<(StatusCode, Json<ApiResponse<IdentityDto>>)> {
    let identity = state
        .auth
        .sign_up(
            &request.email,
            &request.password,
            SignUpMetadata::new(request.full_name.trim(), role),
        )
        .await?;
    info!(user_id = %identity.id, role = role.as_str(), "Account created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(identity.into())),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-up/owner",
    tag = "Authentication",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Owner account created", body = ApiResponse<IdentityDto>),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn sign_up_owner(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SignUpRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<IdentityDto>>)> {
    sign_up(&state, request, Role::Admin).await
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-up/employee",
    tag = "Authentication",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Employee account created", body = ApiResponse<IdentityDto>),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn sign_up_employee(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SignUpRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<IdentityDto>>)> {
    sign_up(&state, request, Role::Employee).await
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-in",
    tag = "Authentication",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse<SessionTokenResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SignInRequest>,
) -> ApiResult<Json<ApiResponse<SessionTokenResponse>>> {
    let issued = state
        .auth
        .sign_in_with_password(&request.email, &request.password)
        .await?;
    Ok(Json(ApiResponse::success(issued.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/accept-invite",
    tag = "Authentication",
    request_body = AcceptInviteRequest,
    responses(
        (status = 200, description = "Invite accepted, signed in", body = ApiResponse<SessionTokenResponse>),
        (status = 401, description = "Invite link is invalid, used or expired")
    )
)]
pub async fn accept_invite(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AcceptInviteRequest>,
) -> ApiResult<Json<ApiResponse<SessionTokenResponse>>> {
    let issued = state
        .auth
        .accept_invite(&request.token, &request.password)
        .await?;
    Ok(Json(ApiResponse::success(issued.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "Authentication",
    responses(
        (status = 200, description = "New token for the same session", body = ApiResponse<SessionTokenResponse>),
        (status = 401, description = "Session expired or revoked")
    ),
    security(("bearer_auth" = []))
)]
pub async fn refresh(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
) -> ApiResult<Json<ApiResponse<SessionTokenResponse>>> {
    let issued = state.auth.refresh_session(current.token()?).await?;
    Ok(Json(ApiResponse::success(issued.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-out",
    tag = "Authentication",
    responses(
        (status = 200, description = "Session revoked"),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer_auth" = []))
)]
pub async fn sign_out(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.auth.sign_out(current.token()?).await?;
    Ok(Json(ApiResponse::success(())))
}
