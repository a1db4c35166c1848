//! Handlers for the `/availability` resource.
//!
//! Employees maintain their own per-day availability. Week views resolve each
//! day against approved time off, which always wins over an explicit record.

use std::collections::HashSet;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use rooster_core::availability::{build_week_view, AvailabilityStatus, DayAvailability, DayRecord};
use rooster_core::dates::date_format;
use rooster_core::roles::Capability;
use rooster_core::schedule::{parse_week_key, week_start, ScheduleWindow};
use rooster_core::types::DbId;
use rooster_db::models::availability::{Availability, AvailabilityChange};
use rooster_db::models::time_off::TimeOffRequest;
use rooster_db::repositories::{AvailabilityRepo, EmployeeRepo, TimeOffRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::query::DateRangeParams;
use crate::state::AppState;

/// One day of availability. A `null` status clears the day.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetAvailabilityRequest {
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    pub status: Option<AvailabilityStatus>,
    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

/// Request body for `PUT /availability/my-availability/week`. Holds 1-7
/// days; the count is checked in [`set_my_week`].
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetWeekAvailabilityRequest {
    #[validate(nested)]
    pub days: Vec<SetAvailabilityRequest>,
}

/// Resolved seven-day view for `employee_id`, Monday first.
async fn week_view(
    state: &AppState,
    company_id: DbId,
    employee_id: DbId,
    any_day: NaiveDate,
) -> AppResult<Vec<DayAvailability>> {
    let window = ScheduleWindow::week_of(any_day);
    let records: Vec<DayRecord> = AvailabilityRepo::list_in_range(
        &state.pool,
        company_id,
        window.first_day(),
        window.last_day(),
        Some(employee_id),
    )
    .await?
    .iter()
    .map(Availability::to_day_record)
    .collect();
    let time_off: Vec<_> = TimeOffRepo::approved_in_range(
        &state.pool,
        employee_id,
        window.first_day(),
        window.last_day(),
    )
    .await?
    .iter()
    .map(TimeOffRequest::to_approved)
    .collect();

    Ok(build_week_view(any_day, &records, &time_off))
}

impl SetAvailabilityRequest {
    fn into_change(self) -> AvailabilityChange {
        AvailabilityChange {
            date: self.date,
            status: self.status,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        }
    }
}

/// GET /api/v1/availability/my-availability/week/{weekStart}
///
/// `{weekStart}` may be any `DD-MM-YYYY` date in the week or an ISO week.
pub async fn my_week(
    State(state): State<AppState>,
    user: AuthUser,
    Path(week): Path<String>,
) -> AppResult<Json<Vec<DayAvailability>>> {
    let company_id = user.company()?;
    let monday = parse_week_key(&week)?;
    Ok(Json(week_view(&state, company_id, user.employee_id, monday).await?))
}

/// PUT /api/v1/availability/my-availability
///
/// Returns the resolved day, which reads TimeOff when approved time off
/// covers it regardless of the stored status.
pub async fn set_my_day(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<SetAvailabilityRequest>,
) -> AppResult<Json<DayAvailability>> {
    let company_id = user.company()?;
    let date = input.date;
    let status = input.status;
    AvailabilityRepo::apply_days(&state.pool, user.employee_id, company_id, &[input.into_change()])
        .await?;

    tracing::info!(
        employee_id = user.employee_id,
        date = %date,
        status = ?status,
        "Availability updated"
    );

    week_view(&state, company_id, user.employee_id, date)
        .await?
        .into_iter()
        .find(|d| d.date == date)
        .ok_or_else(|| AppError::InternalError("Resolved week is missing the requested day".into()))
        .map(Json)
}

/// PUT /api/v1/availability/my-availability/week
///
/// All days must fall in the same Monday-Sunday week and be distinct. The
/// batch is written in one transaction, so either every day lands or none
/// does. Returns the resolved week.
pub async fn set_my_week(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<SetWeekAvailabilityRequest>,
) -> AppResult<Json<Vec<DayAvailability>>> {
    let company_id = user.company()?;
    if !(1..=7).contains(&input.days.len()) {
        return Err(AppError::validation("Provide between 1 and 7 days"));
    }
    let monday = input
        .days
        .first()
        .map(|d| week_start(d.date))
        .ok_or_else(|| AppError::validation("Provide between 1 and 7 days"))?;

    let mut seen = HashSet::new();
    for day in &input.days {
        if week_start(day.date) != monday {
            return Err(AppError::validation("All days must fall in the same week"));
        }
        if !seen.insert(day.date) {
            return Err(AppError::validation(format!(
                "Date {} appears more than once",
                rooster_core::dates::format_wire_date(day.date)
            )));
        }
    }

    let changes: Vec<AvailabilityChange> = input
        .days
        .into_iter()
        .map(SetAvailabilityRequest::into_change)
        .collect();
    AvailabilityRepo::apply_days(&state.pool, user.employee_id, company_id, &changes).await?;
    let count = changes.len();
    tracing::info!(employee_id = user.employee_id, week = %monday, days = count, "Week availability updated");

    Ok(Json(week_view(&state, company_id, user.employee_id, monday).await?))
}

/// GET /api/v1/availability/employee/{id}/week/{weekStart}
pub async fn employee_week(
    State(state): State<AppState>,
    user: AuthUser,
    Path((employee_id, week)): Path<(DbId, String)>,
) -> AppResult<Json<Vec<DayAvailability>>> {
    let company_id = user.company()?;
    user.require_self_or(employee_id, Capability::ViewTeam)?;
    let monday = parse_week_key(&week)?;
    EmployeeRepo::find_in_company(&state.pool, company_id, employee_id)
        .await?
        .ok_or(AppError::not_found("Employee", employee_id))?;
    Ok(Json(week_view(&state, company_id, employee_id, monday).await?))
}

/// GET /api/v1/availability/date-range?startDate=&endDate=&employeeId=
///
/// Stored records (not resolved). Without `ViewTeam` only the caller's own
/// records are returned.
pub async fn date_range(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<DateRangeParams>,
) -> AppResult<Json<Vec<Availability>>> {
    let company_id = user.company()?;
    let range = params.range_or_current_week()?;

    let employee_id = if user.can(Capability::ViewTeam) {
        params.employee_id
    } else {
        if let Some(id) = params.employee_id {
            user.require_self_or(id, Capability::ViewTeam)?;
        }
        Some(user.employee_id)
    };

    let records =
        AvailabilityRepo::list_in_range(&state.pool, company_id, range.start, range.end, employee_id)
            .await?;
    Ok(Json(records))
}
