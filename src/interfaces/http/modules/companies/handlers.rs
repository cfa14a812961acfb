//! Company API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    CompanyDto, CompanyEntriesQuery, CreateCompanyRequest, EmployeeHoursDto, JoinCompanyRequest,
    ProfileDto, RangeQuery, SetHourlyRateRequest,
};
use crate::domain::profile::Role;
use crate::domain::session::{Actor, Route, SessionSnapshot};
use crate::domain::time_entry::TimeEntryFilter;
use crate::interfaces::http::common::{
    require_route, ApiError, ApiResponse, ApiResult, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::CurrentSession;
use crate::interfaces::http::modules::time_entries::TimeEntryDto;
use crate::interfaces::http::state::AppState;
use crate::shared::validate_pagination;

/// Either dashboard: the caller belongs to a company.
fn require_member(snapshot: &SessionSnapshot) -> ApiResult<Actor> {
    match snapshot.route() {
        Route::AdminDashboard => require_route(snapshot, Route::AdminDashboard),
        Route::EmployeeDashboard => require_route(snapshot, Route::EmployeeDashboard),
        other => {
            let required = match snapshot.profile.as_ref().map(|p| p.role) {
                Some(Role::Admin) => Route::AdminDashboard,
                _ => Route::EmployeeDashboard,
            };
            Err(ApiError::route_mismatch(required, other))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/companies",
    tag = "Companies",
    request_body = CreateCompanyRequest,
    responses(
        (status = 201, description = "Company created, caller is its owner", body = ApiResponse<CompanyDto>),
        (status = 403, description = "Caller is not an admin without company"),
        (status = 422, description = "Name too short")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_company(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    ValidatedJson(request): ValidatedJson<CreateCompanyRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CompanyDto>>)> {
    let actor = require_route(current.snapshot(), Route::CreateCompany)?;
    let company = state.companies.create_company(&actor, &request.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CompanyDto::for_viewer(
            company,
            actor.user_id(),
        ))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/companies/join",
    tag = "Companies",
    request_body = JoinCompanyRequest,
    responses(
        (status = 200, description = "Joined", body = ApiResponse<CompanyDto>),
        (status = 404, description = "Invalid Code"),
        (status = 409, description = "Already in a company"),
        (status = 422, description = "Code is not 6 characters")
    ),
    security(("bearer_auth" = []))
)]
pub async fn join_company(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Json(request): Json<JoinCompanyRequest>,
) -> ApiResult<Json<ApiResponse<CompanyDto>>> {
    let actor = require_route(current.snapshot(), Route::JoinCompany)?;
    let company = state.companies.join_company(&actor, &request.code).await?;
    Ok(Json(ApiResponse::success(CompanyDto::for_viewer(
        company,
        actor.user_id(),
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/company",
    tag = "Companies",
    responses(
        (status = 200, description = "Caller's company", body = ApiResponse<CompanyDto>),
        (status = 403, description = "Caller has no company")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_company(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
) -> ApiResult<Json<ApiResponse<CompanyDto>>> {
    let actor = require_member(current.snapshot())?;
    let company = state.companies.company_for(&actor).await?;
    Ok(Json(ApiResponse::success(CompanyDto::for_viewer(
        company,
        actor.user_id(),
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/company/employees",
    tag = "Companies",
    responses(
        (status = 200, description = "Employees of the caller's company", body = ApiResponse<Vec<ProfileDto>>),
        (status = 403, description = "Admin dashboard only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_employees(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
) -> ApiResult<Json<ApiResponse<Vec<ProfileDto>>>> {
    let actor = require_route(current.snapshot(), Route::AdminDashboard)?;
    let employees = state.companies.list_employees(&actor).await?;
    Ok(Json(ApiResponse::success(
        employees.into_iter().map(ProfileDto::from).collect(),
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/company/employees/{employee_id}/hourly-rate",
    tag = "Companies",
    params(("employee_id" = String, Path, description = "Employee profile id")),
    request_body = SetHourlyRateRequest,
    responses(
        (status = 200, description = "Rate updated", body = ApiResponse<ProfileDto>),
        (status = 404, description = "No such employee in the company"),
        (status = 422, description = "Negative rate")
    ),
    security(("bearer_auth" = []))
)]
pub async fn set_hourly_rate(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Path(employee_id): Path<String>,
    ValidatedJson(request): ValidatedJson<SetHourlyRateRequest>,
) -> ApiResult<Json<ApiResponse<ProfileDto>>> {
    let actor = require_route(current.snapshot(), Route::AdminDashboard)?;
    let profile = state
        .companies
        .set_hourly_rate(&actor, &employee_id, request.rate()?)
        .await?;
    Ok(Json(ApiResponse::success(profile.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/company/time-entries",
    tag = "Companies",
    params(CompanyEntriesQuery),
    responses(
        (status = 200, description = "Company time entries, newest first", body = ApiResponse<PaginatedResponse<TimeEntryDto>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn company_time_entries(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Query(query): Query<CompanyEntriesQuery>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<TimeEntryDto>>>> {
    let actor = require_route(current.snapshot(), Route::AdminDashboard)?;
    let filter = TimeEntryFilter {
        user_id: query.user_id,
        from: query.from,
        to: query.to,
        open_only: query.open_only,
    };
    let page = state
        .companies
        .company_time_entries(&actor, filter, validate_pagination(query.page, query.limit))
        .await?;
    Ok(Json(ApiResponse::success(page.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/company/time-entries/summary",
    tag = "Companies",
    params(RangeQuery),
    responses(
        (status = 200, description = "Worked hours per employee", body = ApiResponse<Vec<EmployeeHoursDto>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn hours_summary(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Query(range): Query<RangeQuery>,
) -> ApiResult<Json<ApiResponse<Vec<EmployeeHoursDto>>>> {
    let actor = require_route(current.snapshot(), Route::AdminDashboard)?;
    let summary = state
        .companies
        .hours_summary(&actor, range.from, range.to)
        .await?;
    Ok(Json(ApiResponse::success(
        summary.into_iter().map(EmployeeHoursDto::from).collect(),
    )))
}
