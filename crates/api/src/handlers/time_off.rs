//! Handlers for the `/timeoff` resource.
//!
//! Employees file requests for themselves. The requester may edit a request
//! while it is Pending and may cancel it; reviewers (`ReviewTimeOff`, Manager
//! only) approve or reject. Status changes follow the transition table in
//! [`rooster_core::time_off`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use rooster_core::availability::DateRange;
use rooster_core::dates::date_format;
use rooster_core::employee::full_name;
use rooster_core::roles::Capability;
use rooster_core::time_off::{
    may_set_status, validate_transition, Actor, TimeOffStatus, MAX_REASON_LEN,
};
use rooster_core::types::{DbId, Timestamp};
use rooster_db::models::time_off::{
    CreateTimeOff, StatusChange, TimeOffWithEmployee, UpdateTimeOff,
};
use rooster_db::repositories::TimeOffRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOffResponse {
    pub id: DbId,
    pub employee_id: DbId,
    pub employee_name: String,
    pub company_id: DbId,
    pub status: TimeOffStatus,
    pub reason: String,
    #[serde(with = "date_format")]
    pub start_date: NaiveDate,
    #[serde(with = "date_format")]
    pub end_date: NaiveDate,
    /// Days covered, both ends included.
    pub days: i64,
    pub approved_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&TimeOffWithEmployee> for TimeOffResponse {
    fn from(row: &TimeOffWithEmployee) -> Self {
        let r = &row.request;
        Self {
            id: r.id,
            employee_id: r.employee_id,
            employee_name: full_name(&row.first_name, &row.last_name, &row.username),
            company_id: r.company_id,
            status: r.status(),
            reason: r.reason.clone(),
            start_date: r.start_date,
            end_date: r.end_date,
            days: r.range().days(),
            approved_by: r.approved_by,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// `?status=&employeeId=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOffListParams {
    pub status: Option<TimeOffStatus>,
    pub employee_id: Option<DbId>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimeOffRequest {
    #[validate(length(min = 1, max = 500, message = "Reason must be 1-500 characters"))]
    pub reason: String,
    #[serde(with = "date_format")]
    pub start_date: NaiveDate,
    #[serde(with = "date_format")]
    pub end_date: NaiveDate,
}

/// Request body for `PUT /timeoff/{id}`. Edits and a status change may be
/// combined; edits are applied first.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTimeOffRequest {
    pub status: Option<TimeOffStatus>,
    #[validate(length(min = 1, max = 500, message = "Reason must be 1-500 characters"))]
    pub reason: Option<String>,
    #[serde(default, with = "date_format::option")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "date_format::option")]
    pub end_date: Option<NaiveDate>,
}

impl UpdateTimeOffRequest {
    fn has_edits(&self) -> bool {
        self.reason.is_some() || self.start_date.is_some() || self.end_date.is_some()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load(state: &AppState, company_id: DbId, id: DbId) -> AppResult<TimeOffWithEmployee> {
    TimeOffRepo::find_by_id(&state.pool, company_id, id)
        .await?
        .ok_or(AppError::not_found("TimeOffRequest", id))
}

fn check_reason(reason: &str) -> AppResult<()> {
    if reason.trim().is_empty() || reason.chars().count() > MAX_REASON_LEN {
        return Err(AppError::validation(format!(
            "Reason must be 1-{MAX_REASON_LEN} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/timeoff?status=&employeeId=
///
/// Reviewers see the whole company; everyone else sees their own requests.
pub async fn list_time_off(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<TimeOffListParams>,
) -> AppResult<Json<Vec<TimeOffResponse>>> {
    let company_id = user.company()?;
    let employee_id = if user.can(Capability::ReviewTimeOff) {
        params.employee_id
    } else {
        if let Some(id) = params.employee_id {
            user.require_self_or(id, Capability::ReviewTimeOff)?;
        }
        Some(user.employee_id)
    };

    let rows = TimeOffRepo::list(&state.pool, company_id, employee_id, params.status).await?;
    Ok(Json(rows.iter().map(TimeOffResponse::from).collect()))
}

/// POST /api/v1/timeoff
pub async fn create_time_off(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateTimeOffRequest>,
) -> AppResult<(StatusCode, Json<TimeOffResponse>)> {
    let company_id = user.company()?;
    check_reason(&input.reason)?;
    let range = DateRange::new(input.start_date, input.end_date)?;

    let created = TimeOffRepo::create(
        &state.pool,
        &CreateTimeOff {
            employee_id: user.employee_id,
            company_id,
            reason: input.reason.trim().to_string(),
            range,
        },
    )
    .await?;

    tracing::info!(
        time_off_id = created.id,
        employee_id = user.employee_id,
        days = range.days(),
        "Time-off request filed"
    );

    let row = load(&state, company_id, created.id).await?;
    Ok((StatusCode::CREATED, Json(TimeOffResponse::from(&row))))
}

/// GET /api/v1/timeoff/{id}
pub async fn get_time_off(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<TimeOffResponse>> {
    let company_id = user.company()?;
    let row = load(&state, company_id, id).await?;
    user.require_self_or(row.request.employee_id, Capability::ReviewTimeOff)?;
    Ok(Json(TimeOffResponse::from(&row)))
}

/// PUT /api/v1/timeoff/{id}
///
/// - Reason/date edits: requester only, while Pending.
/// - `status`: the requester may cancel; a reviewer other than the requester
///   may approve, reject or cancel. The reviewer is recorded as approver.
///
/// All checks run first; edits and the status change are then written in
/// one transaction. Losing a race with another writer returns 409.
pub async fn update_time_off(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateTimeOffRequest>,
) -> AppResult<Json<TimeOffResponse>> {
    let company_id = user.company()?;
    let row = load(&state, company_id, id).await?;
    let is_requester = row.request.employee_id == user.employee_id;
    user.require_self_or(row.request.employee_id, Capability::ReviewTimeOff)?;

    let current = row.request.status();

    let edits = if input.has_edits() {
        if !is_requester {
            return Err(AppError::forbidden("Only the requester can edit a request"));
        }
        if current != TimeOffStatus::Pending {
            return Err(AppError::conflict(format!(
                "Only pending requests can be edited (status is {current})"
            )));
        }
        if let Some(reason) = &input.reason {
            check_reason(reason)?;
        }
        let range = DateRange::new(
            input.start_date.unwrap_or(row.request.start_date),
            input.end_date.unwrap_or(row.request.end_date),
        )?;
        Some(UpdateTimeOff {
            reason: input.reason.as_deref().map(|r| r.trim().to_string()),
            start_date: Some(range.start),
            end_date: Some(range.end),
        })
    } else {
        None
    };

    let change = match input.status {
        Some(to) => {
            let actor = if is_requester {
                Actor::Requester
            } else {
                Actor::Reviewer(user.role)
            };
            if !may_set_status(actor, to) {
                return Err(AppError::forbidden(format!(
                    "Not allowed to set status {to}"
                )));
            }
            validate_transition(current, to).map_err(AppError::conflict)?;
            Some(StatusChange {
                from: current,
                to,
                approved_by: match actor {
                    Actor::Reviewer(_) => Some(user.employee_id),
                    Actor::Requester => None,
                },
            })
        }
        None => None,
    };

    if edits.is_some() || change.is_some() {
        TimeOffRepo::revise(&state.pool, id, edits.as_ref(), change.as_ref())
            .await?
            .ok_or_else(|| AppError::conflict("The request was changed by someone else"))?;

        tracing::info!(
            time_off_id = id,
            edited = edits.is_some(),
            from = %current,
            to = ?change.map(|c| c.to),
            changed_by = user.employee_id,
            "Time-off request updated"
        );
    }

    let row = load(&state, company_id, id).await?;
    Ok(Json(TimeOffResponse::from(&row)))
}

/// DELETE /api/v1/timeoff/{id}
///
/// The requester may delete while Pending; reviewers may delete any request.
pub async fn delete_time_off(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let company_id = user.company()?;
    let row = load(&state, company_id, id).await?;

    if !user.can(Capability::ReviewTimeOff) {
        if row.request.employee_id != user.employee_id {
            return Err(AppError::forbidden(
                "Insufficient permissions: ReviewTimeOff required",
            ));
        }
        if row.request.status() != TimeOffStatus::Pending {
            return Err(AppError::conflict("Only pending requests can be deleted"));
        }
    }

    if !TimeOffRepo::delete(&state.pool, company_id, id).await? {
        return Err(AppError::not_found("TimeOffRequest", id));
    }
    tracing::info!(time_off_id = id, deleted_by = user.employee_id, "Time-off request deleted");
    Ok(StatusCode::NO_CONTENT)
}
