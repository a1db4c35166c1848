//! Handlers for the `/shift` resource: CRUD, schedules, overlap checks and
//! the free-employee lookup.
//!
//! Every company member may read the company roster. Writes, overlap checks
//! and the free-employee lookup need `ManageShifts`; per-employee views of
//! someone else need `ViewTeam`.

use std::collections::HashSet;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rooster_core::availability::weekday_name;
use rooster_core::dates::{date_format, time_format};
use rooster_core::roles::Capability;
use rooster_core::schedule::{
    available_employees, group_by_day, iso_week_number, parse_month_key, parse_week_key,
    sort_chronologically, Assignment, ScheduleWindow,
};
use rooster_core::shift::{
    duration_hours, has_overlap, time_range_label, ShiftTimes, ShiftType,
};
use rooster_core::types::{DbId, Timestamp};
use rooster_db::models::shift::{Shift, ShiftInput, ShiftWithEmployee};
use rooster_db::repositories::{AvailabilityRepo, EmployeeRepo, ShiftRepo, TimeOffRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::handlers::employee::EmployeeResponse;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireShiftManager;
use crate::query::{DateRangeParams, EmployeeFilterParams, TimeWindowParams};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// A shift as returned by the API, with derived display values.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftResponse {
    pub id: DbId,
    pub employee_id: DbId,
    pub employee_name: Option<String>,
    pub company_id: DbId,
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    #[serde(with = "time_format")]
    pub start_time: NaiveTime,
    #[serde(with = "time_format::option")]
    pub end_time: Option<NaiveTime>,
    pub shift_type: ShiftType,
    pub shift_type_name: &'static str,
    pub is_open_ended: bool,
    pub is_standby: bool,
    pub notes: Option<String>,
    /// `"13:00 - 17:00"` or `"19:00 - close"`.
    pub time_range: String,
    pub duration_hours: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ShiftResponse {
    fn build(shift: &Shift, employee_name: Option<String>, closing: NaiveTime) -> Self {
        let times = shift.times();
        let shift_type = shift.shift_type();
        Self {
            id: shift.id,
            employee_id: shift.employee_id,
            employee_name,
            company_id: shift.company_id,
            date: shift.date,
            start_time: shift.start_time,
            end_time: times.end,
            shift_type,
            shift_type_name: shift_type.label(),
            is_open_ended: shift.is_open_ended,
            is_standby: shift.is_standby,
            notes: shift.notes.clone(),
            time_range: time_range_label(&times),
            duration_hours: duration_hours(&times, closing),
            created_at: shift.created_at,
            updated_at: shift.updated_at,
        }
    }

    fn joined(row: &ShiftWithEmployee, closing: NaiveTime) -> Self {
        let name = rooster_core::employee::full_name(&row.first_name, &row.last_name, &row.username);
        Self::build(&row.shift, Some(name), closing)
    }
}

/// One day of the week schedule.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDay {
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    pub day_name: &'static str,
    pub shifts: Vec<ShiftResponse>,
}

/// `GET /shift/schedule/week/{week}` response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekScheduleResponse {
    #[serde(with = "date_format")]
    pub week_start: NaiveDate,
    #[serde(with = "date_format")]
    pub week_end: NaiveDate,
    pub week_number: u32,
    pub window_start: NaiveDateTime,
    pub window_end: NaiveDateTime,
    pub days: Vec<ScheduleDay>,
    pub total_hours: f64,
}

/// `GET /shift/schedule/month/{monthYear}` response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthScheduleResponse {
    pub year: i32,
    pub month: u32,
    #[serde(with = "date_format")]
    pub start_date: NaiveDate,
    #[serde(with = "date_format")]
    pub end_date: NaiveDate,
    pub window_start: NaiveDateTime,
    pub window_end: NaiveDateTime,
    pub shifts: Vec<ShiftResponse>,
    pub total_hours: f64,
}

/// Request body for `POST /shift`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateShiftRequest {
    pub employee_id: DbId,
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    #[serde(with = "time_format")]
    pub start_time: NaiveTime,
    #[serde(default, with = "time_format::option")]
    pub end_time: Option<NaiveTime>,
    /// Defaults to Serving.
    pub shift_type: Option<ShiftType>,
    #[serde(default)]
    pub is_open_ended: bool,
    #[serde(default)]
    pub is_standby: bool,
    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

/// Request body for `PUT /shift/{id}`. Omitted fields keep their values.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShiftRequest {
    pub employee_id: Option<DbId>,
    #[serde(default, with = "date_format::option")]
    pub date: Option<NaiveDate>,
    #[serde(default, with = "time_format::option")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "time_format::option")]
    pub end_time: Option<NaiveTime>,
    pub shift_type: Option<ShiftType>,
    pub is_open_ended: Option<bool>,
    pub is_standby: Option<bool>,
    /// An empty string clears the notes.
    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

/// Request body for `POST /shift/check-overlap`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOverlapRequest {
    pub employee_id: DbId,
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    #[serde(with = "time_format")]
    pub start_time: NaiveTime,
    #[serde(default, with = "time_format::option")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub is_open_ended: bool,
    /// The shift being edited, left out of the comparison.
    pub exclude_shift_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOverlapResponse {
    pub has_overlap: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Whether `times` collides with another shift of the employee on `date`.
async fn overlaps_existing(
    state: &AppState,
    employee_id: DbId,
    date: NaiveDate,
    times: &ShiftTimes,
    exclude_id: Option<DbId>,
) -> AppResult<bool> {
    let same_day = ShiftRepo::list_for_employee_on(&state.pool, employee_id, date, exclude_id).await?;
    let existing: Vec<ShiftTimes> = same_day.iter().map(Shift::times).collect();
    Ok(has_overlap(times, existing.iter(), state.config.closing_time))
}

async fn ensure_employee_in_company(
    state: &AppState,
    company_id: DbId,
    employee_id: DbId,
) -> AppResult<()> {
    EmployeeRepo::find_in_company(&state.pool, company_id, employee_id)
        .await?
        .ok_or(AppError::not_found("Employee", employee_id))?;
    Ok(())
}

/// Access check for an optional `employeeId` filter: anyone may filter to
/// themselves, other employees need `ViewTeam`.
async fn check_employee_filter(
    state: &AppState,
    user: &AuthUser,
    company_id: DbId,
    employee_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(id) = employee_id {
        user.require_self_or(id, Capability::ViewTeam)?;
        ensure_employee_in_company(state, company_id, id).await?;
    }
    Ok(())
}

fn total_hours(shifts: &[ShiftResponse]) -> f64 {
    let sum: f64 = shifts.iter().map(|s| s.duration_hours).sum();
    (sum * 100.0).round() / 100.0
}

fn overlap_conflict() -> AppError {
    AppError::conflict("Shift overlaps another shift of this employee on the same date")
}

// ---------------------------------------------------------------------------
// CRUD handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/shift?startDate=&endDate=&employeeId=
///
/// Company shifts in the range (default: current week), ordered by date and
/// start time.
pub async fn list_shifts(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<DateRangeParams>,
) -> AppResult<Json<Vec<ShiftResponse>>> {
    let company_id = user.company()?;
    let range = params.range_or_current_week()?;
    check_employee_filter(&state, &user, company_id, params.employee_id).await?;

    let rows = ShiftRepo::list_in_range(
        &state.pool,
        company_id,
        range.start,
        range.end,
        params.employee_id,
    )
    .await?;
    let closing = state.config.closing_time;
    Ok(Json(rows.iter().map(|r| ShiftResponse::joined(r, closing)).collect()))
}

/// POST /api/v1/shift
///
/// 409 when the employee already works an overlapping shift that day.
pub async fn create_shift(
    State(state): State<AppState>,
    RequireShiftManager(manager): RequireShiftManager,
    ValidatedJson(input): ValidatedJson<CreateShiftRequest>,
) -> AppResult<(StatusCode, Json<ShiftResponse>)> {
    let company_id = manager.company()?;
    ensure_employee_in_company(&state, company_id, input.employee_id).await?;

    let times = ShiftTimes::new(input.start_time, input.end_time, input.is_open_ended);
    times.validate()?;

    if overlaps_existing(&state, input.employee_id, input.date, &times, None).await? {
        return Err(overlap_conflict());
    }

    let shift = ShiftRepo::create(
        &state.pool,
        company_id,
        &ShiftInput {
            employee_id: input.employee_id,
            date: input.date,
            times,
            shift_type: input.shift_type.unwrap_or(ShiftType::Serving),
            is_standby: input.is_standby,
            notes: input.notes.filter(|n| !n.trim().is_empty()),
        },
    )
    .await?;

    tracing::info!(
        shift_id = shift.id,
        employee_id = shift.employee_id,
        company_id,
        created_by = manager.employee_id,
        "Shift created"
    );

    let row = ShiftRepo::find_by_id(&state.pool, company_id, shift.id)
        .await?
        .ok_or(AppError::not_found("Shift", shift.id))?;
    Ok((
        StatusCode::CREATED,
        Json(ShiftResponse::joined(&row, state.config.closing_time)),
    ))
}

/// GET /api/v1/shift/{id}
pub async fn get_shift(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ShiftResponse>> {
    let company_id = user.company()?;
    let row = ShiftRepo::find_by_id(&state.pool, company_id, id)
        .await?
        .ok_or(AppError::not_found("Shift", id))?;
    Ok(Json(ShiftResponse::joined(&row, state.config.closing_time)))
}

/// PUT /api/v1/shift/{id}
///
/// Merges the request over the stored shift, then re-validates the times and
/// re-checks overlap with the shift itself excluded.
pub async fn update_shift(
    State(state): State<AppState>,
    RequireShiftManager(manager): RequireShiftManager,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateShiftRequest>,
) -> AppResult<Json<ShiftResponse>> {
    let company_id = manager.company()?;
    let existing = ShiftRepo::find_by_id(&state.pool, company_id, id)
        .await?
        .ok_or(AppError::not_found("Shift", id))?
        .shift;

    let employee_id = input.employee_id.unwrap_or(existing.employee_id);
    if employee_id != existing.employee_id {
        ensure_employee_in_company(&state, company_id, employee_id).await?;
    }
    let date = input.date.unwrap_or(existing.date);
    let times = ShiftTimes::new(
        input.start_time.unwrap_or(existing.start_time),
        input.end_time.or(existing.end_time),
        input.is_open_ended.unwrap_or(existing.is_open_ended),
    );
    times.validate()?;

    if overlaps_existing(&state, employee_id, date, &times, Some(id)).await? {
        return Err(overlap_conflict());
    }

    let notes = match input.notes {
        Some(n) if n.trim().is_empty() => None,
        Some(n) => Some(n),
        None => existing.notes.clone(),
    };

    ShiftRepo::update(
        &state.pool,
        company_id,
        id,
        &ShiftInput {
            employee_id,
            date,
            times,
            shift_type: input.shift_type.unwrap_or_else(|| existing.shift_type()),
            is_standby: input.is_standby.unwrap_or(existing.is_standby),
            notes,
        },
    )
    .await?
    .ok_or(AppError::not_found("Shift", id))?;

    tracing::info!(shift_id = id, updated_by = manager.employee_id, "Shift updated");

    let row = ShiftRepo::find_by_id(&state.pool, company_id, id)
        .await?
        .ok_or(AppError::not_found("Shift", id))?;
    Ok(Json(ShiftResponse::joined(&row, state.config.closing_time)))
}

/// DELETE /api/v1/shift/{id}
pub async fn delete_shift(
    State(state): State<AppState>,
    RequireShiftManager(manager): RequireShiftManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let company_id = manager.company()?;
    if !ShiftRepo::delete(&state.pool, company_id, id).await? {
        return Err(AppError::not_found("Shift", id));
    }
    tracing::info!(shift_id = id, deleted_by = manager.employee_id, "Shift deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Per-employee views
// ---------------------------------------------------------------------------

/// GET /api/v1/shift/employee/{id}?startDate=&endDate=
///
/// All shifts of one employee, or those in the range when both dates are given.
pub async fn employee_shifts(
    State(state): State<AppState>,
    user: AuthUser,
    Path(employee_id): Path<DbId>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<Json<Vec<ShiftResponse>>> {
    let company_id = user.company()?;
    check_employee_filter(&state, &user, company_id, Some(employee_id)).await?;
    let rows = shifts_for(&state, company_id, employee_id, &params, None).await?;
    let closing = state.config.closing_time;
    Ok(Json(rows.iter().map(|r| ShiftResponse::joined(r, closing)).collect()))
}

/// GET /api/v1/shift/my-shifts?startDate=&endDate=
///
/// The caller's shifts; upcoming ones (today onwards) unless a range is given.
pub async fn my_shifts(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<DateRangeParams>,
) -> AppResult<Json<Vec<ShiftResponse>>> {
    let company_id = user.company()?;
    let today = Utc::now().date_naive();
    let rows = shifts_for(&state, company_id, user.employee_id, &params, Some(today)).await?;
    let closing = state.config.closing_time;
    Ok(Json(rows.iter().map(|r| ShiftResponse::joined(r, closing)).collect()))
}

async fn shifts_for(
    state: &AppState,
    company_id: DbId,
    employee_id: DbId,
    params: &DateRangeParams,
    default_from: Option<NaiveDate>,
) -> AppResult<Vec<ShiftWithEmployee>> {
    if params.has_range() {
        let range = params.range_or_current_week()?;
        return Ok(ShiftRepo::list_in_range(
            &state.pool,
            company_id,
            range.start,
            range.end,
            Some(employee_id),
        )
        .await?);
    }
    Ok(ShiftRepo::list_for_employee(&state.pool, company_id, employee_id, default_from).await?)
}

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

/// GET /api/v1/shift/schedule/week/{week}?employeeId=
///
/// `{week}` is any `DD-MM-YYYY` date in the week or an ISO week (`2025-W31`).
/// Always returns seven days, Monday first, even when empty.
pub async fn week_schedule(
    State(state): State<AppState>,
    user: AuthUser,
    Path(week): Path<String>,
    Query(filter): Query<EmployeeFilterParams>,
) -> AppResult<Json<WeekScheduleResponse>> {
    let company_id = user.company()?;
    let monday = parse_week_key(&week)?;
    check_employee_filter(&state, &user, company_id, filter.employee_id).await?;

    let window = ScheduleWindow::week_of(monday);
    let mut rows = ShiftRepo::list_in_range(
        &state.pool,
        company_id,
        window.first_day(),
        window.last_day(),
        filter.employee_id,
    )
    .await?;
    sort_chronologically(&mut rows, |r| (r.shift.date, r.shift.start_time));

    let closing = state.config.closing_time;
    let shifts: Vec<ShiftResponse> = rows.iter().map(|r| ShiftResponse::joined(r, closing)).collect();
    let total = total_hours(&shifts);

    let days = group_by_day(monday, &rows, |r| r.shift.date)
        .into_iter()
        .map(|(date, on_day)| ScheduleDay {
            date,
            day_name: weekday_name(date.weekday()),
            shifts: on_day
                .into_iter()
                .map(|r| ShiftResponse::joined(r, closing))
                .collect(),
        })
        .collect();

    Ok(Json(WeekScheduleResponse {
        week_start: window.first_day(),
        week_end: window.last_day(),
        week_number: iso_week_number(monday),
        window_start: window.start,
        window_end: window.end,
        days,
        total_hours: total,
    }))
}

/// GET /api/v1/shift/schedule/month/{monthYear}?employeeId=
///
/// `{monthYear}` is `MM-YYYY` (or `YYYY-MM`).
pub async fn month_schedule(
    State(state): State<AppState>,
    user: AuthUser,
    Path(month_year): Path<String>,
    Query(filter): Query<EmployeeFilterParams>,
) -> AppResult<Json<MonthScheduleResponse>> {
    let company_id = user.company()?;
    let (year, month) = parse_month_key(&month_year)?;
    let window = ScheduleWindow::month_of(year, month)?;
    check_employee_filter(&state, &user, company_id, filter.employee_id).await?;

    let mut rows = ShiftRepo::list_in_range(
        &state.pool,
        company_id,
        window.first_day(),
        window.last_day(),
        filter.employee_id,
    )
    .await?;
    sort_chronologically(&mut rows, |r| (r.shift.date, r.shift.start_time));

    let closing = state.config.closing_time;
    let shifts: Vec<ShiftResponse> = rows.iter().map(|r| ShiftResponse::joined(r, closing)).collect();

    Ok(Json(MonthScheduleResponse {
        year,
        month,
        start_date: window.first_day(),
        end_date: window.last_day(),
        window_start: window.start,
        window_end: window.end,
        total_hours: total_hours(&shifts),
        shifts,
    }))
}

// ---------------------------------------------------------------------------
// Planning helpers
// ---------------------------------------------------------------------------

/// GET /api/v1/shift/available-employees?date=&startTime=&endTime=
///
/// Company employees with no overlapping shift that day whose resolved
/// availability does not block scheduling (NotAvailable, TimeOff, or
/// approved time off). A missing `endTime` means until closing.
pub async fn list_available_employees(
    State(state): State<AppState>,
    manager: RequireShiftManager,
    Query(params): Query<TimeWindowParams>,
) -> AppResult<Json<Vec<EmployeeResponse>>> {
    let company_id = manager.company()?;
    let wanted = ShiftTimes::new(params.start_time, params.end_time, params.end_time.is_none());
    wanted.validate()?;

    let employees = EmployeeRepo::list_by_company(&state.pool, company_id).await?;
    let assignments: Vec<Assignment> = ShiftRepo::list_on_date(&state.pool, company_id, params.date)
        .await?
        .iter()
        .map(|s| Assignment {
            employee_id: s.employee_id,
            times: s.times(),
        })
        .collect();

    let mut unavailable: HashSet<DbId> =
        AvailabilityRepo::blocked_employee_ids(&state.pool, company_id, params.date)
            .await?
            .into_iter()
            .collect();
    unavailable.extend(TimeOffRepo::employees_on_leave(&state.pool, company_id, params.date).await?);

    let free = available_employees(
        &employees,
        |e| e.id,
        &wanted,
        &assignments,
        &unavailable,
        state.config.closing_time,
    );
    tracing::debug!(
        company_id,
        date = %params.date,
        candidates = employees.len(),
        available = free.len(),
        "Available employee lookup"
    );
    Ok(Json(free.into_iter().map(EmployeeResponse::from).collect()))
}

/// POST /api/v1/shift/check-overlap
pub async fn check_overlap(
    State(state): State<AppState>,
    manager: RequireShiftManager,
    Json(input): Json<CheckOverlapRequest>,
) -> AppResult<Json<CheckOverlapResponse>> {
    let company_id = manager.company()?;
    ensure_employee_in_company(&state, company_id, input.employee_id).await?;

    let times = ShiftTimes::new(input.start_time, input.end_time, input.is_open_ended);
    times.validate()?;

    let has_overlap = overlaps_existing(
        &state,
        input.employee_id,
        input.date,
        &times,
        input.exclude_shift_id,
    )
    .await?;
    Ok(Json(CheckOverlapResponse { has_overlap }))
}
