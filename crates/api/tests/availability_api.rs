//! HTTP-level integration tests for per-day availability and its resolution
//! against approved time off.

mod common;

use axum::http::StatusCode;
use chrono::NaiveDate;
use common::{body_json, get_auth, put_json_auth, seed_company, seed_employee, token_for};
use rooster_core::availability::DateRange;
use rooster_core::roles::Role;
use rooster_core::time_off::TimeOffStatus;
use rooster_db::models::time_off::CreateTimeOff;
use rooster_db::repositories::TimeOffRepo;
use serde_json::json;
use sqlx::PgPool;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn approve_time_off(pool: &PgPool, employee_id: i64, company_id: i64, range: DateRange) {
    let request = TimeOffRepo::create(
        pool,
        &CreateTimeOff {
            employee_id,
            company_id,
            reason: "Vakantie".into(),
            range,
        },
    )
    .await
    .unwrap();
    TimeOffRepo::set_status(
        pool,
        request.id,
        TimeOffStatus::Pending,
        TimeOffStatus::Approved,
        None,
    )
    .await
    .unwrap()
    .expect("pending request should be approvable");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_set_day_and_read_week(pool: PgPool) {
    let company = seed_company(&pool, "Bistro").await;
    let worker = seed_employee(&pool, Some(company.id), "werk", Role::Werknemer).await;
    let token = token_for(&worker);

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        "/api/v1/availability/my-availability",
        json!({ "date": "30-07-2025", "status": 1, "notes": "Tandarts" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let day = body_json(response).await;
    assert_eq!(day["date"], "30-07-2025");
    assert_eq!(day["status"], 1);
    assert_eq!(day["dayName"], "Woensdag");

    // Overwrite the same day; still one record.
    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        "/api/v1/availability/my-availability",
        json!({ "date": "30-07-2025", "status": 0 }),
        &token,
    )
    .await;
    assert_eq!(body_json(response).await["status"], 0);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/availability/my-availability/week/28-07-2025", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let week = body_json(response).await;
    let days = week.as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[0]["date"], "28-07-2025");
    assert!(days[0]["status"].is_null());
    assert_eq!(days[2]["status"], 0);

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        "/api/v1/availability/date-range?startDate=28-07-2025&endDate=03-08-2025",
        &token,
    )
    .await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_null_status_clears_the_day(pool: PgPool) {
    let company = seed_company(&pool, "Bistro").await;
    let worker = seed_employee(&pool, Some(company.id), "werk", Role::Werknemer).await;
    let token = token_for(&worker);

    let app = common::build_test_app(pool.clone());
    put_json_auth(
        app,
        "/api/v1/availability/my-availability",
        json!({ "date": "31-07-2025", "status": 1 }),
        &token,
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        "/api/v1/availability/my-availability",
        json!({ "date": "31-07-2025", "status": null }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["status"].is_null());

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        "/api/v1/availability/date-range?startDate=31-07-2025&endDate=31-07-2025",
        &token,
    )
    .await;
    assert!(body_json(response).await.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approved_time_off_overrides_available(pool: PgPool) {
    let company = seed_company(&pool, "Bistro").await;
    let worker = seed_employee(&pool, Some(company.id), "werk", Role::Werknemer).await;
    let token = token_for(&worker);
    approve_time_off(
        &pool,
        worker.id,
        company.id,
        DateRange::new(ymd(2025, 8, 1), ymd(2025, 8, 10)).unwrap(),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        "/api/v1/availability/my-availability",
        json!({ "date": "02-08-2025", "status": 0 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let day = body_json(response).await;
    assert_eq!(day["status"], 2);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/availability/my-availability/week/2025-W31", &token).await;
    let days = body_json(response).await;
    assert!(days[3]["status"].is_null());
    assert_eq!(days[4]["status"], 2);
    assert_eq!(days[4]["notes"], "Vakantie");
    assert_eq!(days[5]["status"], 2);

    // The stored record itself is untouched.
    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        "/api/v1/availability/date-range?startDate=02-08-2025&endDate=02-08-2025",
        &token,
    )
    .await;
    let records = body_json(response).await;
    assert_eq!(records[0]["status"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bulk_week_update(pool: PgPool) {
    let company = seed_company(&pool, "Bistro").await;
    let worker = seed_employee(&pool, Some(company.id), "werk", Role::Werknemer).await;
    let token = token_for(&worker);

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        "/api/v1/availability/my-availability/week",
        json!({ "days": [
            { "date": "28-07-2025", "status": 0 },
            { "date": "29-07-2025", "status": 1, "notes": "Cursus" },
            { "date": "03-08-2025", "status": 0 },
        ]}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let days = body_json(response).await;
    assert_eq!(days.as_array().unwrap().len(), 7);
    assert_eq!(days[0]["status"], 0);
    assert_eq!(days[1]["notes"], "Cursus");
    assert!(days[2]["status"].is_null());
    assert_eq!(days[6]["status"], 0);

    // Days spanning two weeks.
    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        "/api/v1/availability/my-availability/week",
        json!({ "days": [
            { "date": "03-08-2025", "status": 1 },
            { "date": "04-08-2025", "status": 1 },
        ]}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing from the rejected batch was written.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/availability/my-availability/week/03-08-2025", &token).await;
    assert_eq!(body_json(response).await[6]["status"], 0);

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        "/api/v1/availability/my-availability/week",
        json!({ "days": [] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_team_visibility(pool: PgPool) {
    let company = seed_company(&pool, "Bistro").await;
    let leader = seed_employee(&pool, Some(company.id), "leider", Role::ShiftLeider).await;
    let worker = seed_employee(&pool, Some(company.id), "werk", Role::Werknemer).await;
    let colleague = seed_employee(&pool, Some(company.id), "collega", Role::Werknemer).await;

    for emp in [&worker, &colleague] {
        let app = common::build_test_app(pool.clone());
        put_json_auth(
            app,
            "/api/v1/availability/my-availability",
            json!({ "date": "29-07-2025", "status": 1 }),
            &token_for(emp),
        )
        .await;
    }

    let range = "startDate=28-07-2025&endDate=03-08-2025";

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/availability/date-range?{range}");
    let response = get_auth(app, &uri, &token_for(&leader)).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);

    // Without ViewTeam only the caller's own records come back.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &uri, &token_for(&worker)).await;
    let own = body_json(response).await;
    assert_eq!(own.as_array().unwrap().len(), 1);
    assert_eq!(own[0]["employeeId"], worker.id);

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/availability/date-range?{range}&employeeId={}", colleague.id);
    let response = get_auth(app, &uri, &token_for(&worker)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/availability/employee/{}/week/28-07-2025", colleague.id);
    let response = get_auth(app, &uri, &token_for(&worker)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &uri, &token_for(&leader)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await[1]["status"], 1);
}
