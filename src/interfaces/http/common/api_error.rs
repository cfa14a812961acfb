//! Translation of domain failures into HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use super::ApiResponse;
use crate::domain::session::{Actor, Route, SessionSnapshot};
use crate::domain::DomainError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Current route of a caller that hit an endpoint of another route
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RouteMismatch {
    pub route: String,
    pub required: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub mismatch: Option<RouteMismatch>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            mismatch: None,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "validation", message)
    }

    pub fn route_mismatch(required: Route, current: Route) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            code: "route_mismatch",
            message: format!("Requires {}, current route is {}", required, current),
            mismatch: Some(RouteMismatch {
                route: current.to_string(),
                required: required.to_string(),
            }),
        }
    }
}

pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::NotFound { .. } | DomainError::InvalidCompanyCode(_) => StatusCode::NOT_FOUND,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::Conflict(_)
        | DomainError::AlreadyInCompany
        | DomainError::AlreadyClockedIn
        | DomainError::ClockStateChanged(_)
        | DomainError::ActionInProgress => StatusCode::CONFLICT,
        DomainError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let status = status_for(&err);
        let message = match &err {
            DomainError::InvalidCompanyCode(_) => "Invalid Code".to_string(),
            DomainError::Internal(detail) => {
                error!(error = %detail, "Internal error");
                "Internal server error".to_string()
            }
            DomainError::Storage(detail) => {
                error!(error = %detail, "Storage error");
                "Storage temporarily unavailable, please retry".to_string()
            }
            other => other.to_string(),
        };
        Self::new(status, err.code(), message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = ApiResponse::<RouteMismatch>::error(self.message).with_code(self.code);
        body.data = self.mismatch;
        (self.status, Json(body)).into_response()
    }
}

/// Resolve the caller into an [`Actor`] that is on `required`.
///
/// Any other route, including `wait` for an identity without profile, is
/// rejected with 403 and the caller's current route.
pub fn require_route(snapshot: &SessionSnapshot, required: Route) -> ApiResult<Actor> {
    let current = snapshot.route();
    if current != required {
        return Err(ApiError::route_mismatch(required, current));
    }
    Actor::from_snapshot(snapshot).ok_or_else(|| ApiError::route_mismatch(required, Route::Wait))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::Identity;
    use crate::domain::profile::{Profile, Role};

    fn snapshot(role: Role, company: Option<&str>) -> SessionSnapshot {
        SessionSnapshot {
            identity: Some(Identity {
                id: "u1".into(),
                email: "u1@example.com".into(),
            }),
            profile: Some(Profile {
                id: "u1".into(),
                full_name: "U One".into(),
                email: "u1@example.com".into(),
                role,
                company_id: company.map(str::to_string),
                hourly_rate: None,
            }),
            resolving: false,
        }
    }

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::Validation("x".into()), 422, "validation"),
            (DomainError::InvalidCompanyCode("000000".into()), 404, "invalid_code"),
            (DomainError::Unauthorized("x".into()), 401, "unauthorized"),
            (DomainError::Forbidden("x".into()), 403, "forbidden"),
            (DomainError::AlreadyClockedIn, 409, "already_clocked_in"),
            (DomainError::ClockStateChanged("e".into()), 409, "state_changed"),
            (DomainError::ActionInProgress, 409, "action_in_progress"),
            (DomainError::Storage("db down".into()), 503, "storage"),
            (DomainError::Internal("boom".into()), 500, "internal"),
        ];
        for (err, status, code) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status.as_u16(), status);
            assert_eq!(api.code, code);
        }
    }

    #[test]
    fn invalid_code_message_is_user_facing() {
        let api: ApiError = DomainError::InvalidCompanyCode("000000".into()).into();
        assert_eq!(api.message, "Invalid Code");
    }

    #[test]
    fn storage_detail_is_not_leaked() {
        let api: ApiError = DomainError::Storage("connection refused at 10.0.0.3".into()).into();
        assert!(!api.message.contains("10.0.0.3"));
    }

    #[test]
    fn route_guard_accepts_matching_route() {
        let actor = require_route(
            &snapshot(Role::Employee, Some("c1")),
            Route::EmployeeDashboard,
        )
        .unwrap();
        assert_eq!(actor.user_id(), "u1");
    }

    #[test]
    fn route_guard_reports_current_route() {
        let err = require_route(&snapshot(Role::Employee, None), Route::EmployeeDashboard)
            .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        let mismatch = err.mismatch.unwrap();
        assert_eq!(mismatch.route, "join-company");
        assert_eq!(mismatch.required, "employee-dashboard");
    }

    #[test]
    fn identity_without_profile_waits() {
        let mut snap = snapshot(Role::Admin, None);
        snap.profile = None;
        let err = require_route(&snap, Route::CreateCompany).unwrap_err();
        assert_eq!(err.mismatch.unwrap().route, "wait");
    }
}
