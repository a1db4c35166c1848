//! Shared fixtures and request helpers for the API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::NaiveTime;
use http_body_util::BodyExt;
use rooster_api::auth::jwt::{generate_access_token, JwtConfig};
use rooster_api::auth::password::hash_password;
use rooster_api::config::ServerConfig;
use rooster_api::router::build_app_router;
use rooster_api::state::AppState;
use rooster_core::roles::Role;
use rooster_db::models::company::{Company, CreateCompany};
use rooster_db::models::employee::{CreateEmployee, Employee};
use rooster_db::repositories::{CompanyRepo, EmployeeRepo};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

/// Password given to every seeded employee. Meets the complexity rules.
pub const TEST_PASSWORD: &str = "Welkom123";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        closing_time: NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
        min_password_length: 8,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router, with the production middleware stack,
/// on top of the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(test_config()),
    };
    build_app_router(state)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn seed_company(pool: &PgPool, name: &str) -> Company {
    let short: String = name.chars().filter(|c| !c.is_whitespace()).take(10).collect();
    CompanyRepo::create(
        pool,
        &CreateCompany {
            name: name.to_string(),
            short_name: short,
            primary_color: None,
            secondary_color: None,
            accent_color: None,
        },
    )
    .await
    .expect("company creation should succeed")
}

/// Insert an employee with [`TEST_PASSWORD`]. `company_id` must be `None`
/// exactly for SuperAdmin.
pub async fn seed_employee(
    pool: &PgPool,
    company_id: Option<i64>,
    username: &str,
    role: Role,
) -> Employee {
    EmployeeRepo::create(
        pool,
        &CreateEmployee {
            company_id,
            first_name: username.to_string(),
            last_name: "Test".to_string(),
            username: username.to_string(),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
            role,
            hire_date: None,
            birth_date: None,
        },
    )
    .await
    .expect("employee creation should succeed")
}

/// A valid access token for `employee`, signed with the test secret.
pub fn token_for(employee: &Employee) -> String {
    generate_access_token(
        employee.id,
        employee.role(),
        employee.company_id,
        &test_config().jwt,
    )
    .expect("token generation should succeed")
    .token
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}
