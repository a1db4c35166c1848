//! HTTP-level integration tests for shifts: overlap rules, schedules and the
//! free-employee lookup.

mod common;

use axum::http::StatusCode;
use chrono::NaiveDate;
use common::{
    body_json, delete_auth, get_auth, post_json_auth, put_json_auth, seed_company, seed_employee,
    token_for,
};
use rooster_core::availability::{AvailabilityStatus, DateRange};
use rooster_core::roles::Role;
use rooster_core::time_off::TimeOffStatus;
use rooster_db::models::availability::UpsertAvailability;
use rooster_db::models::time_off::CreateTimeOff;
use rooster_db::repositories::{AvailabilityRepo, TimeOffRepo};
use serde_json::{json, Value};
use sqlx::PgPool;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn shift_body(employee_id: i64, date: &str, start: &str, end: Option<&str>) -> Value {
    match end {
        Some(end) => json!({
            "employeeId": employee_id,
            "date": date,
            "startTime": start,
            "endTime": end,
        }),
        None => json!({
            "employeeId": employee_id,
            "date": date,
            "startTime": start,
            "isOpenEnded": true,
        }),
    }
}

async fn create_shift(pool: &PgPool, token: &str, body: Value) -> (StatusCode, Value) {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/shift", body, token).await;
    let status = response.status();
    (status, body_json(response).await)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_overlapping_shift_is_rejected_back_to_back_allowed(pool: PgPool) {
    let company = seed_company(&pool, "Bistro").await;
    let leader = seed_employee(&pool, Some(company.id), "leider", Role::ShiftLeider).await;
    let worker = seed_employee(&pool, Some(company.id), "werk", Role::Werknemer).await;
    let token = token_for(&leader);

    let (status, first) =
        create_shift(&pool, &token, shift_body(worker.id, "01-08-2025", "13:00", Some("17:00"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["timeRange"], "13:00 - 17:00");
    assert_eq!(first["durationHours"], 4.0);
    assert_eq!(first["shiftType"], 1);
    assert_eq!(first["employeeName"], "werk Test");

    let (status, err) =
        create_shift(&pool, &token, shift_body(worker.id, "01-08-2025", "16:00", Some("20:00"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["code"], "CONFLICT");

    let (status, _) =
        create_shift(&pool, &token, shift_body(worker.id, "01-08-2025", "17:00", Some("20:00"))).await;
    assert_eq!(status, StatusCode::CREATED);

    // Same times on another day are fine.
    let (status, _) =
        create_shift(&pool, &token, shift_body(worker.id, "02-08-2025", "13:00", Some("17:00"))).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_check_overlap_endpoint(pool: PgPool) {
    let company = seed_company(&pool, "Bistro").await;
    let manager = seed_employee(&pool, Some(company.id), "baas", Role::Manager).await;
    let worker = seed_employee(&pool, Some(company.id), "werk", Role::Werknemer).await;
    let token = token_for(&manager);
    let (_, shift) =
        create_shift(&pool, &token, shift_body(worker.id, "01-08-2025", "13:00", Some("17:00"))).await;

    let overlap_query = |start: &str, end: &str, exclude: Option<i64>| {
        json!({
            "employeeId": worker.id,
            "date": "01-08-2025",
            "startTime": start,
            "endTime": end,
            "excludeShiftId": exclude,
        })
    };

    let app = common::build_test_app(pool.clone());
    let response =
        post_json_auth(app, "/api/v1/shift/check-overlap", overlap_query("16:00", "20:00", None), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["hasOverlap"], true);

    let app = common::build_test_app(pool.clone());
    let response =
        post_json_auth(app, "/api/v1/shift/check-overlap", overlap_query("17:00", "20:00", None), &token).await;
    assert_eq!(body_json(response).await["hasOverlap"], false);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/shift/check-overlap",
        overlap_query("14:00", "16:00", shift["id"].as_i64()),
        &token,
    )
    .await;
    assert_eq!(body_json(response).await["hasOverlap"], false);

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/shift/check-overlap",
        overlap_query("16:00", "20:00", None),
        &token_for(&worker),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_shift_time_validation(pool: PgPool) {
    let company = seed_company(&pool, "Bistro").await;
    let leader = seed_employee(&pool, Some(company.id), "leider", Role::ShiftLeider).await;
    let token = token_for(&leader);

    let (status, err) =
        create_shift(&pool, &token, shift_body(leader.id, "01-08-2025", "17:00", Some("13:00"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "VALIDATION_ERROR");

    let missing_end = json!({ "employeeId": leader.id, "date": "01-08-2025", "startTime": "13:00" });
    let (status, _) = create_shift(&pool, &token, missing_end).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let iso_date = shift_body(leader.id, "2025-08-01", "13:00", Some("17:00"));
    let (status, _) = create_shift(&pool, &token, iso_date).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, open) =
        create_shift(&pool, &token, shift_body(leader.id, "01-08-2025", "19:00", None)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(open["endTime"].is_null());
    assert_eq!(open["isOpenEnded"], true);
    assert_eq!(open["timeRange"], "19:00 - close");
    assert_eq!(open["durationHours"], 4.0);

    // The open-ended shift runs until closing (23:00).
    let (status, _) =
        create_shift(&pool, &token, shift_body(leader.id, "01-08-2025", "22:00", Some("22:30"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_werknemer_reads_but_cannot_write(pool: PgPool) {
    let company = seed_company(&pool, "Bistro").await;
    let leader = seed_employee(&pool, Some(company.id), "leider", Role::ShiftLeider).await;
    let worker = seed_employee(&pool, Some(company.id), "werk", Role::Werknemer).await;
    create_shift(
        &pool,
        &token_for(&leader),
        shift_body(leader.id, "01-08-2025", "09:00", Some("17:00")),
    )
    .await;
    let token = token_for(&worker);

    let (status, _) =
        create_shift(&pool, &token, shift_body(worker.id, "01-08-2025", "09:00", Some("12:00"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        "/api/v1/shift?startDate=28-07-2025&endDate=03-08-2025",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_rechecks_overlap_excluding_itself(pool: PgPool) {
    let company = seed_company(&pool, "Bistro").await;
    let leader = seed_employee(&pool, Some(company.id), "leider", Role::ShiftLeider).await;
    let worker = seed_employee(&pool, Some(company.id), "werk", Role::Werknemer).await;
    let token = token_for(&leader);

    let (_, morning) =
        create_shift(&pool, &token, shift_body(worker.id, "01-08-2025", "09:00", Some("13:00"))).await;
    create_shift(&pool, &token, shift_body(worker.id, "01-08-2025", "17:00", Some("21:00"))).await;
    let uri = format!("/api/v1/shift/{}", morning["id"]);

    // Extending within its own slot is fine.
    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(app, &uri, json!({ "endTime": "15:00", "notes": "Lunch" }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["timeRange"], "09:00 - 15:00");
    assert_eq!(json["notes"], "Lunch");
    assert_eq!(json["date"], "01-08-2025");

    // Running into the evening shift is not.
    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(app, &uri, json!({ "endTime": "18:00" }), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_week_schedule_has_seven_days(pool: PgPool) {
    let company = seed_company(&pool, "Bistro").await;
    let leader = seed_employee(&pool, Some(company.id), "leider", Role::ShiftLeider).await;
    let worker = seed_employee(&pool, Some(company.id), "werk", Role::Werknemer).await;
    let token = token_for(&leader);
    create_shift(&pool, &token, shift_body(worker.id, "01-08-2025", "17:00", Some("21:00"))).await;
    create_shift(&pool, &token, shift_body(leader.id, "01-08-2025", "12:00", Some("16:00"))).await;
    create_shift(&pool, &token, shift_body(worker.id, "28-07-2025", "10:00", Some("12:30"))).await;
    // Next week, must not show up.
    create_shift(&pool, &token, shift_body(worker.id, "04-08-2025", "10:00", Some("12:00"))).await;

    for key in ["30-07-2025", "2025-W31"] {
        let app = common::build_test_app(pool.clone());
        let uri = format!("/api/v1/shift/schedule/week/{key}");
        let response = get_auth(app, &uri, &token).await;
        assert_eq!(response.status(), StatusCode::OK, "week key {key}");
        let json = body_json(response).await;

        assert_eq!(json["weekStart"], "28-07-2025");
        assert_eq!(json["weekEnd"], "03-08-2025");
        assert_eq!(json["weekNumber"], 31);
        assert_eq!(json["windowStart"], "2025-07-28T00:00:00");
        assert_eq!(json["windowEnd"], "2025-08-03T23:59:59");
        assert_eq!(json["totalHours"], 10.5);

        let days = json["days"].as_array().unwrap();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0]["dayName"], "Maandag");
        assert_eq!(days[0]["shifts"].as_array().unwrap().len(), 1);
        assert_eq!(days[1]["shifts"].as_array().unwrap().len(), 0);
        let friday = days[4]["shifts"].as_array().unwrap();
        assert_eq!(days[4]["dayName"], "Vrijdag");
        assert_eq!(friday.len(), 2);
        assert_eq!(friday[0]["startTime"], "12:00");
        assert_eq!(friday[1]["startTime"], "17:00");
        assert_eq!(days[6]["date"], "03-08-2025");
    }

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/shift/schedule/week/someday", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_schedule_employee_filter_needs_view_team(pool: PgPool) {
    let company = seed_company(&pool, "Bistro").await;
    let leader = seed_employee(&pool, Some(company.id), "leider", Role::ShiftLeider).await;
    let worker = seed_employee(&pool, Some(company.id), "werk", Role::Werknemer).await;
    let colleague = seed_employee(&pool, Some(company.id), "collega", Role::Werknemer).await;
    let token = token_for(&leader);
    create_shift(&pool, &token, shift_body(worker.id, "01-08-2025", "17:00", Some("21:00"))).await;
    create_shift(&pool, &token, shift_body(colleague.id, "02-08-2025", "17:00", Some("21:00"))).await;

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/shift/schedule/month/08-2025?employeeId={}", worker.id);
    let response = get_auth(app, &uri, &token_for(&worker)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["startDate"], "01-08-2025");
    assert_eq!(json["endDate"], "31-08-2025");
    assert_eq!(json["shifts"].as_array().unwrap().len(), 1);

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/shift/schedule/month/08-2025?employeeId={}", colleague.id);
    let response = get_auth(app, &uri, &token_for(&worker)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/shift/employee/{}", colleague.id);
    let response = get_auth(app, &uri, &token_for(&worker)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        "/api/v1/shift/my-shifts?startDate=01-08-2025&endDate=31-08-2025",
        &token_for(&colleague),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let mine = body_json(response).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["employeeId"], colleague.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_available_employees_excludes_busy_unavailable_and_on_leave(pool: PgPool) {
    let company = seed_company(&pool, "Bistro").await;
    let leader = seed_employee(&pool, Some(company.id), "leider", Role::ShiftLeider).await;
    let busy = seed_employee(&pool, Some(company.id), "bezet", Role::Werknemer).await;
    let back_to_back = seed_employee(&pool, Some(company.id), "aansluitend", Role::Werknemer).await;
    let unavailable = seed_employee(&pool, Some(company.id), "afwezig", Role::Werknemer).await;
    let on_leave = seed_employee(&pool, Some(company.id), "verlof", Role::Werknemer).await;
    let free = seed_employee(&pool, Some(company.id), "vrij", Role::Werknemer).await;
    let token = token_for(&leader);

    create_shift(&pool, &token, shift_body(busy.id, "01-08-2025", "13:00", Some("17:00"))).await;
    create_shift(&pool, &token, shift_body(back_to_back.id, "01-08-2025", "12:00", Some("16:00"))).await;
    AvailabilityRepo::upsert(
        &pool,
        &UpsertAvailability {
            employee_id: unavailable.id,
            company_id: company.id,
            date: ymd(2025, 8, 1),
            status: AvailabilityStatus::NotAvailable,
            notes: None,
        },
    )
    .await
    .unwrap();
    let request = TimeOffRepo::create(
        &pool,
        &CreateTimeOff {
            employee_id: on_leave.id,
            company_id: company.id,
            reason: "Vakantie".into(),
            range: DateRange::new(ymd(2025, 7, 30), ymd(2025, 8, 2)).unwrap(),
        },
    )
    .await
    .unwrap();
    TimeOffRepo::set_status(
        &pool,
        request.id,
        TimeOffStatus::Pending,
        TimeOffStatus::Approved,
        None,
    )
    .await
    .unwrap();

    let app = common::build_test_app(pool.clone());
    let response = get_auth(
        app,
        "/api/v1/shift/available-employees?date=01-08-2025&startTime=16:00&endTime=20:00",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let mut ids: Vec<i64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_i64().unwrap())
        .collect();
    ids.sort_unstable();
    let mut expected = vec![leader.id, back_to_back.id, free.id];
    expected.sort_unstable();
    assert_eq!(ids, expected);

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        "/api/v1/shift/available-employees?date=01-08-2025&startTime=16:00&endTime=20:00",
        &token_for(&free),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_shifts_are_tenant_scoped(pool: PgPool) {
    let company = seed_company(&pool, "Bistro").await;
    let other = seed_company(&pool, "Cafe").await;
    let leader = seed_employee(&pool, Some(company.id), "leider", Role::ShiftLeider).await;
    let outsider_leader = seed_employee(&pool, Some(other.id), "ander", Role::ShiftLeider).await;
    let outsider = seed_employee(&pool, Some(other.id), "extern", Role::Werknemer).await;

    // Cannot plan someone from another company.
    let (status, _) = create_shift(
        &pool,
        &token_for(&leader),
        shift_body(outsider.id, "01-08-2025", "09:00", Some("12:00")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, shift) = create_shift(
        &pool,
        &token_for(&outsider_leader),
        shift_body(outsider.id, "01-08-2025", "09:00", Some("12:00")),
    )
    .await;

    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/shift/{}", shift["id"]);
    let response = get_auth(app, &uri, &token_for(&leader)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
