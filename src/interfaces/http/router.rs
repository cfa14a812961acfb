//! API Router with Swagger UI

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ApiResponse, PaginatedResponse};
use super::middleware::{auth_middleware, optional_auth_middleware};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::{auth, companies, health, invites, session, time_entries};
use super::state::AppState;
use crate::config::CorsSection;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from sign-in"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::sign_up_owner,
        auth::sign_up_employee,
        auth::sign_in,
        auth::accept_invite,
        auth::refresh,
        auth::sign_out,
        session::get_session,
        companies::create_company,
        companies::join_company,
        companies::get_company,
        companies::list_employees,
        companies::set_hourly_rate,
        companies::company_time_entries,
        companies::hours_summary,
        time_entries::current_state,
        time_entries::list_own_entries,
        time_entries::clock_in,
        time_entries::clock_out,
        invites::invite_employee,
    ),
    components(
        schemas(
            ApiResponse<String>,
            PaginatedResponse<time_entries::TimeEntryDto>,
            auth::SignUpRequest,
            auth::SignInRequest,
            auth::AcceptInviteRequest,
            auth::IdentityDto,
            auth::SessionTokenResponse,
            session::SessionView,
            companies::CreateCompanyRequest,
            companies::JoinCompanyRequest,
            companies::SetHourlyRateRequest,
            companies::CompanyDto,
            companies::ProfileDto,
            companies::EmployeeHoursDto,
            time_entries::PositionDto,
            time_entries::ClockRequest,
            time_entries::TimeEntryDto,
            time_entries::ClockStatusDto,
            time_entries::ClockOutcomeDto,
            invites::InviteFunctionRequest,
            invites::InvitationDto,
            invites::InviteData,
            invites::InviteFailure,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Authentication", description = "Owner/employee sign-up, sign-in, invite acceptance, refresh, sign-out"),
        (name = "Session", description = "Resolved identity, profile and the route the client belongs on"),
        (name = "Companies", description = "Create or join a company; owner administration and reports"),
        (name = "Time Entries", description = "Clock in/out with optional geolocation and own history"),
        (name = "Invites", description = "Invite function used by company owners"),
    ),
    info(
        title = "Time Clock API",
        version = "1.0.0",
        description = "Multi-tenant time clock: companies, employees and clock-in/clock-out with geolocation",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

fn cors_layer(cfg: &CorsSection) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any);
    if cfg.allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = cfg
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Create the application router with all routes
pub fn create_router(state: AppState, metrics: PrometheusHandle, cors: &CorsSection) -> Router {
    let auth_public = Router::new()
        .route("/sign-up/owner", post(auth::sign_up_owner))
        .route("/sign-up/employee", post(auth::sign_up_employee))
        .route("/sign-in", post(auth::sign_in))
        .route("/accept-invite", post(auth::accept_invite));

    let auth_protected = Router::new()
        .route("/refresh", post(auth::refresh))
        .route("/sign-out", post(auth::sign_out))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let session_routes = Router::new()
        .route("/", get(session::get_session))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            optional_auth_middleware,
        ))
        // token travels in the query string
        .route("/ws", get(session::session_stream));

    let company_creation = Router::new()
        .route("/", post(companies::create_company))
        .route("/join", post(companies::join_company))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let company_admin = Router::new()
        .route("/", get(companies::get_company))
        .route("/employees", get(companies::list_employees))
        .route(
            "/employees/{employee_id}/hourly-rate",
            put(companies::set_hourly_rate),
        )
        .route("/time-entries", get(companies::company_time_entries))
        .route("/time-entries/summary", get(companies::hours_summary))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let time_entry_routes = Router::new()
        .route("/", get(time_entries::list_own_entries))
        .route("/current", get(time_entries::current_state))
        .route("/clock-in", post(time_entries::clock_in))
        .route("/{entry_id}/clock-out", post(time_entries::clock_out))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let api = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health_check))
        .nest("/api/v1/auth", auth_public.merge(auth_protected))
        .nest("/api/v1/session", session_routes)
        .nest("/api/v1/companies", company_creation)
        .nest("/api/v1/company", company_admin)
        .nest("/api/v1/time-entries", time_entry_routes)
        .layer(cors_layer(cors));

    // The invite function sets its own CORS headers and answers preflight itself
    let functions = Router::new().route(
        "/functions/v1/invite-employee",
        post(invites::invite_employee).options(invites::invite_preflight),
    );

    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(MetricsState { handle: metrics });

    api.merge(functions)
        .with_state(state)
        .merge(metrics_routes)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}
