//! End-to-end tests of the HTTP surface against an in-memory database

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::domain::profile::Role;
use crate::test_support::{test_app, TestApp};

async fn call(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn token_for(app: &TestApp, email: &str, role: Role) -> String {
    app.sign_up(email, role).await;
    app.sign_in(email).await.access_token
}

async fn route_of(router: &Router, token: &str) -> String {
    let (status, body) = call(router, Method::GET, "/api/v1/session", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["route"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_database_ok() {
    let app = test_app().await;
    let (status, body) = call(&app.router(), Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"]["status"], "ok");
}

#[tokio::test]
async fn metrics_endpoint_is_public() {
    let app = test_app().await;
    let response = app
        .router()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn signed_out_session_routes_to_sign_in() {
    let app = test_app().await;
    let (status, body) = call(&app.router(), Method::GET, "/api/v1/session", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["route"], "sign-in");
    assert_eq!(body["data"]["identity"], Value::Null);
}

#[tokio::test]
async fn owner_signs_up_and_creates_a_company() {
    let app = test_app().await;
    let router = app.router();

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/v1/auth/sign-up/owner",
        None,
        Some(json!({"email": "boss@example.com", "password": "secret1", "full_name": "Boss"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["email"], "boss@example.com");

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/v1/auth/sign-in",
        None,
        Some(json!({"email": "boss@example.com", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["access_token"].as_str().unwrap().to_string();
    assert_eq!(route_of(&router, &token).await, "create-company");

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/v1/companies",
        Some(&token),
        Some(json!({"name": "Acme"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "Acme");
    assert_eq!(body["data"]["code"].as_str().unwrap().len(), 6);
    assert_eq!(route_of(&router, &token).await, "admin-dashboard");
}

#[tokio::test]
async fn short_company_name_is_unprocessable() {
    let app = test_app().await;
    let router = app.router();
    let token = token_for(&app, "boss@example.com", Role::Admin).await;
    let (status, body) = call(
        &router,
        Method::POST,
        "/api/v1/companies",
        Some(&token),
        Some(json!({"name": "A"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "validation");
}

#[tokio::test]
async fn join_with_codes() {
    let app = test_app().await;
    let router = app.router();
    app.seed_company_with_code("123456").await;
    let token = token_for(&app, "worker@example.com", Role::Employee).await;
    assert_eq!(route_of(&router, &token).await, "join-company");

    let join = |code: &'static str| {
        let router = router.clone();
        let token = token.clone();
        async move {
            call(
                &router,
                Method::POST,
                "/api/v1/companies/join",
                Some(&token),
                Some(json!({ "code": code })),
            )
            .await
        }
    };

    let (status, body) = join("12345").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "validation");

    let (status, body) = join("000000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Invalid Code");
    assert_eq!(body["code"], "invalid_code");
    assert_eq!(route_of(&router, &token).await, "join-company");

    let (status, body) = join("123456").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Seeded");
    assert!(body["data"].get("code").is_none());
    assert_eq!(route_of(&router, &token).await, "employee-dashboard");
}

#[tokio::test]
async fn protected_routes_need_a_token() {
    let app = test_app().await;
    let (status, body) = call(
        &app.router(),
        Method::POST,
        "/api/v1/time-entries/clock-in",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn clock_actions_require_the_employee_dashboard() {
    let app = test_app().await;
    let token = token_for(&app, "worker@example.com", Role::Employee).await;
    let (status, body) = call(
        &app.router(),
        Method::POST,
        "/api/v1/time-entries/clock-in",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "route_mismatch");
    assert_eq!(body["data"]["route"], "join-company");
    assert_eq!(body["data"]["required"], "employee-dashboard");
}

#[tokio::test]
async fn clock_in_and_out_over_http() {
    let app = test_app().await;
    let router = app.router();
    app.seed_company_with_code("123456").await;
    let token = token_for(&app, "worker@example.com", Role::Employee).await;
    call(
        &router,
        Method::POST,
        "/api/v1/companies/join",
        Some(&token),
        Some(json!({"code": "123456"})),
    )
    .await;

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/v1/time-entries/clock-in",
        Some(&token),
        Some(json!({"position_error": "denied"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["geolocation_error"], "geolocation_denied");
    assert_eq!(body["data"]["entry"]["clock_in_latitude"], Value::Null);
    let entry_id = body["data"]["entry"]["id"].as_str().unwrap().to_string();

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/v1/time-entries/clock-in",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "already_clocked_in");

    let (status, body) = call(
        &router,
        Method::GET,
        "/api/v1/time-entries/current",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "in");
    assert_eq!(body["data"]["open_entry"]["id"], entry_id.as_str());

    let clock_out = format!("/api/v1/time-entries/{}/clock-out", entry_id);
    let (status, body) = call(
        &router,
        Method::POST,
        &clock_out,
        Some(&token),
        Some(json!({"position": {"latitude": -23.5505, "longitude": -46.6333}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["geolocation_error"], Value::Null);
    assert_eq!(body["data"]["entry"]["clock_out_latitude"], -23.5505);

    let (status, body) = call(&router, Method::POST, &clock_out, Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "state_changed");

    let (status, body) = call(
        &router,
        Method::GET,
        "/api/v1/time-entries?page=1&limit=10",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
}

#[tokio::test]
async fn malformed_clock_body_is_rejected() {
    let app = test_app().await;
    let router = app.router();
    app.seed_company_with_code("123456").await;
    let token = token_for(&app, "worker@example.com", Role::Employee).await;
    call(
        &router,
        Method::POST,
        "/api/v1/companies/join",
        Some(&token),
        Some(json!({"code": "123456"})),
    )
    .await;

    let (status, _) = call(
        &router,
        Method::POST,
        "/api/v1/time-entries/clock-in",
        Some(&token),
        Some(json!({"position_error": "lost"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = call(
        &router,
        Method::GET,
        "/api/v1/time-entries/current",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "out");
}

#[tokio::test]
async fn owner_administers_employees() {
    let app = test_app().await;
    let router = app.router();
    let (_, company) = app.owner_with_company("boss@example.com").await;
    let owner_token = app.sign_in("boss@example.com").await.access_token;
    let worker = app.employee_in(&company, "worker@example.com").await;

    let (status, body) = call(
        &router,
        Method::GET,
        "/api/v1/company",
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["code"], company.code.as_str());

    let (status, body) = call(
        &router,
        Method::GET,
        "/api/v1/company/employees",
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let rate_uri = format!("/api/v1/company/employees/{}/hourly-rate", worker.user_id());
    let (status, body) = call(
        &router,
        Method::PUT,
        &rate_uri,
        Some(&owner_token),
        Some(json!({"hourly_rate": 22.5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["hourly_rate"], 22.5);

    let (status, _) = call(
        &router,
        Method::PUT,
        &rate_uri,
        Some(&owner_token),
        Some(json!({"hourly_rate": -1.0})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = call(
        &router,
        Method::GET,
        "/api/v1/company/time-entries/summary",
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["entries"], 0);

    let worker_token = app.sign_in("worker@example.com").await.access_token;
    let (status, body) = call(
        &router,
        Method::GET,
        "/api/v1/company/employees",
        Some(&worker_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["data"]["route"], "employee-dashboard");
}

#[tokio::test]
async fn sign_out_revokes_the_token() {
    let app = test_app().await;
    let router = app.router();
    let token = token_for(&app, "worker@example.com", Role::Employee).await;

    let (status, _) = call(&router, Method::POST, "/api/v1/auth/sign-out", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&router, Method::POST, "/api/v1/auth/refresh", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(route_of(&router, &token).await, "sign-in");
}

#[tokio::test]
async fn refresh_keeps_the_session() {
    let app = test_app().await;
    let router = app.router();
    let token = token_for(&app, "worker@example.com", Role::Employee).await;

    let (status, body) = call(&router, Method::POST, "/api/v1/auth/refresh", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let refreshed = body["data"]["access_token"].as_str().unwrap();
    assert_eq!(route_of(&router, refreshed).await, "join-company");
}

#[tokio::test]
async fn invite_preflight_answers_ok_without_auth() {
    let app = test_app().await;
    let response = app
        .router()
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/functions/v1/invite-employee")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn invite_function_contract() {
    let app = test_app().await;
    let router = app.router();
    let (_, company) = app.owner_with_company("boss@example.com").await;
    let owner_token = app.sign_in("boss@example.com").await.access_token;
    let uri = "/functions/v1/invite-employee";

    let (status, body) = call(
        &router,
        Method::POST,
        uri,
        Some(&owner_token),
        Some(json!({"email": "new@example.com", "companyId": company.id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required.");

    let invite = json!({
        "email": "new@example.com",
        "fullName": "New Hire",
        "hourlyRate": 19.5,
        "companyId": company.id,
        "redirectTo": "https://app.example.com/welcome"
    });

    let (status, body) = call(&router, Method::POST, uri, None, Some(invite.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = call(&router, Method::POST, uri, Some(&owner_token), Some(invite)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "new@example.com");
    assert_eq!(body["data"]["companyId"], company.id.as_str());
    assert_eq!(body["data"]["hourlyRate"], 19.5);
}

#[tokio::test]
async fn invite_into_another_company_fails() {
    let app = test_app().await;
    let router = app.router();
    app.owner_with_company("boss@example.com").await;
    let other = app.seed_company_with_code("654321").await;
    let owner_token = app.sign_in("boss@example.com").await.access_token;

    let (status, body) = call(
        &router,
        Method::POST,
        "/functions/v1/invite-employee",
        Some(&owner_token),
        Some(json!({
            "email": "new@example.com",
            "fullName": "New Hire",
            "hourlyRate": 10,
            "companyId": other.id,
            "redirectTo": "https://app.example.com/welcome"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("admin"));
}

#[tokio::test]
async fn request_id_is_echoed() {
    let app = test_app().await;
    let response = app
        .router()
        .oneshot(
            Request::get("/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-42");
}
