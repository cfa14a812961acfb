//! Authentication middleware for Axum
//!
//! Resolves the bearer token into a session snapshot once per request and
//! stores it in the request extensions as [`CurrentSession`].

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::common::{ApiError, ApiResult};
use super::state::AppState;
use crate::application::session::Resolved;
use crate::domain::session::SessionSnapshot;

/// Caller as resolved from the `Authorization` header
#[derive(Clone, Debug)]
pub struct CurrentSession {
    pub access_token: Option<String>,
    pub resolved: Resolved,
}

impl CurrentSession {
    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.resolved.snapshot
    }

    pub fn token(&self) -> ApiResult<&str> {
        self.access_token
            .as_deref()
            .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolve the bearer token of `headers` into a session.
pub async fn resolve_request(state: &AppState, headers: &HeaderMap) -> ApiResult<CurrentSession> {
    let token = bearer_token(headers).map(str::to_string);
    let resolved = state.resolver.resolve(token.as_deref()).await?;
    Ok(CurrentSession {
        access_token: token,
        resolved,
    })
}

/// Bearer authentication; rejects requests without an active session.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if bearer_token(request.headers()).is_none() {
        return ApiError::unauthorized("Missing authentication token").into_response();
    }
    let current = match resolve_request(&state, request.headers()).await {
        Ok(current) => current,
        Err(e) => return e.into_response(),
    };
    if current.resolved.session.is_none() {
        return ApiError::unauthorized("Invalid or expired session").into_response();
    }
    debug!(user_id = ?current.resolved.snapshot.identity.as_ref().map(|i| &i.id), "Authenticated");
    request.extensions_mut().insert(current);
    next.run(request).await
}

/// Like [`auth_middleware`] but lets signed-out callers through with an
/// empty snapshot.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let current = match resolve_request(&state, request.headers()).await {
        Ok(current) => current,
        Err(e) => return e.into_response(),
    };
    request.extensions_mut().insert(current);
    next.run(request).await
}
