//! HTTP-level integration tests for cross-company administration.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, post_json_auth, put_json_auth, seed_company, seed_employee,
    token_for,
};
use rooster_core::company::{DEFAULT_ACCENT_COLOR, DEFAULT_PRIMARY_COLOR};
use rooster_core::roles::Role;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_superadmin_company_lifecycle(pool: PgPool) {
    let admin = seed_employee(&pool, None, "root", Role::SuperAdmin).await;
    let token = token_for(&admin);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/company",
        json!({ "name": "Het Anker", "shortName": "ANKER", "secondaryColor": "#fff" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["primaryColor"], DEFAULT_PRIMARY_COLOR);
    assert_eq!(created["secondaryColor"], "#fff");
    assert_eq!(created["accentColor"], DEFAULT_ACCENT_COLOR);
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/company/{id}");
    let response = put_json_auth(app, &uri, json!({ "accentColor": "#123456" }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["accentColor"], "#123456");
    assert_eq!(updated["name"], "Het Anker");

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/company", &token).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_company_input_validation(pool: PgPool) {
    seed_company(&pool, "Bistro").await;
    let admin = seed_employee(&pool, None, "root", Role::SuperAdmin).await;
    let token = token_for(&admin);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/company",
        json!({ "name": "Kleur", "shortName": "K", "primaryColor": "red" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"]
        .as_str()
        .unwrap()
        .contains("primaryColor"));

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/company",
        json!({ "name": "Lang", "shortName": "VEELTELANGENAAM" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/company",
        json!({ "name": "Bistro", "shortName": "B2" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_company_with_employees_cannot_be_deleted(pool: PgPool) {
    let company = seed_company(&pool, "Bistro").await;
    seed_employee(&pool, Some(company.id), "werk", Role::Werknemer).await;
    let admin = seed_employee(&pool, None, "root", Role::SuperAdmin).await;

    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/company/{}", company.id);
    let response = delete_auth(app, &uri, &token_for(&admin)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_members_see_only_their_current_company(pool: PgPool) {
    let company = seed_company(&pool, "Bistro").await;
    let manager = seed_employee(&pool, Some(company.id), "baas", Role::Manager).await;
    let admin = seed_employee(&pool, None, "root", Role::SuperAdmin).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/company/current", &token_for(&manager)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"], company.id);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/company", &token_for(&manager)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/company/current", &token_for(&admin)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
