//! Handlers for the `/employee` resource.
//!
//! Team reads need `ViewTeam`, edits and deletes need `ManageEmployees`
//! (Manager only), and account creation needs `ProvisionEmployees`. Every
//! employee may read and edit their own profile.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use rooster_core::dates::date_format;
use rooster_core::employee::validate_username;
use rooster_core::roles::{can_assign_role, Capability, Role};
use rooster_core::types::{DbId, Timestamp};
use rooster_db::models::employee::{CreateEmployee, Employee, UpdateEmployee};
use rooster_db::repositories::{CompanyRepo, EmployeeRepo, RefreshTokenRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireEmployeeManager, RequireProvisioner, RequireTeamViewer};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Employee as returned by the API. Never includes the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub id: DbId,
    pub company_id: Option<DbId>,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub username: String,
    pub role: Role,
    pub role_name: &'static str,
    #[serde(with = "date_format::option")]
    pub hire_date: Option<NaiveDate>,
    #[serde(with = "date_format::option")]
    pub birth_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Employee> for EmployeeResponse {
    fn from(e: &Employee) -> Self {
        let role = e.role();
        Self {
            id: e.id,
            company_id: e.company_id,
            first_name: e.first_name.clone(),
            last_name: e.last_name.clone(),
            full_name: e.full_name(),
            username: e.username.clone(),
            role,
            role_name: role.name(),
            hire_date: e.hire_date,
            birth_date: e.birth_date,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Request body for `POST /employee`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    pub username: String,
    pub password: String,
    /// Defaults to Werknemer.
    pub role: Option<Role>,
    #[serde(default, with = "date_format::option")]
    pub hire_date: Option<NaiveDate>,
    #[serde(default, with = "date_format::option")]
    pub birth_date: Option<NaiveDate>,
    /// Required when a SuperAdmin provisions an account; ignored otherwise.
    pub company_id: Option<DbId>,
}

/// Request body for `PUT /employee/{id}`. Omitted fields stay unchanged.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    #[validate(length(min = 1, max = 100, message = "First name must not be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Last name must not be empty"))]
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub role: Option<Role>,
    #[serde(default, with = "date_format::option")]
    pub hire_date: Option<NaiveDate>,
    #[serde(default, with = "date_format::option")]
    pub birth_date: Option<NaiveDate>,
}

/// Request body for `PUT /employee/profile`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "First name must not be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Last name must not be empty"))]
    pub last_name: Option<String>,
    #[serde(default, with = "date_format::option")]
    pub birth_date: Option<NaiveDate>,
}

/// Request body for `PUT /employee/profile/password`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Team handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/employee
///
/// Employees of the caller's company, ordered by name.
pub async fn list_employees(
    State(state): State<AppState>,
    viewer: RequireTeamViewer,
) -> AppResult<Json<Vec<EmployeeResponse>>> {
    let company_id = viewer.company()?;
    let employees = EmployeeRepo::list_by_company(&state.pool, company_id).await?;
    Ok(Json(employees.iter().map(EmployeeResponse::from).collect()))
}

/// POST /api/v1/employee
///
/// Create an account. Managers create accounts in their own company with
/// roles up to Manager; SuperAdmin must name the target company.
pub async fn create_employee(
    State(state): State<AppState>,
    RequireProvisioner(actor): RequireProvisioner,
    ValidatedJson(input): ValidatedJson<CreateEmployeeRequest>,
) -> AppResult<(StatusCode, Json<EmployeeResponse>)> {
    let role = input.role.unwrap_or(Role::Werknemer);
    if !can_assign_role(actor.role, role) {
        return Err(AppError::forbidden(format!(
            "{} may not create {} accounts",
            actor.role.name(),
            role.name()
        )));
    }

    let company_id = match actor.company_id {
        Some(own) => own,
        None => {
            let id = input
                .company_id
                .ok_or_else(|| AppError::validation("companyId is required"))?;
            CompanyRepo::find_by_id(&state.pool, id)
                .await?
                .ok_or(AppError::not_found("Company", id))?;
            id
        }
    };

    validate_username(&input.username).map_err(AppError::validation)?;
    validate_password_strength(&input.password, state.config.min_password_length)
        .map_err(AppError::validation)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let employee = EmployeeRepo::create(
        &state.pool,
        &CreateEmployee {
            company_id: Some(company_id),
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            username: input.username,
            password_hash,
            role,
            hire_date: input.hire_date,
            birth_date: input.birth_date,
        },
    )
    .await?;

    tracing::info!(
        employee_id = employee.id,
        company_id,
        created_by = actor.employee_id,
        role = role.name(),
        "Employee created"
    );
    Ok((StatusCode::CREATED, Json(EmployeeResponse::from(&employee))))
}

/// GET /api/v1/employee/{id}
///
/// Employees read themselves; team viewers read colleagues.
pub async fn get_employee(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<EmployeeResponse>> {
    user.require_self_or(id, Capability::ViewTeam)?;
    let employee = if id == user.employee_id {
        EmployeeRepo::find_by_id(&state.pool, id).await?
    } else {
        EmployeeRepo::find_in_company(&state.pool, user.company()?, id).await?
    };
    let employee = employee.ok_or(AppError::not_found("Employee", id))?;
    Ok(Json(EmployeeResponse::from(&employee)))
}

/// PUT /api/v1/employee/{id}
pub async fn update_employee(
    State(state): State<AppState>,
    RequireEmployeeManager(manager): RequireEmployeeManager,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateEmployeeRequest>,
) -> AppResult<Json<EmployeeResponse>> {
    let company_id = manager.company()?;
    let existing = EmployeeRepo::find_in_company(&state.pool, company_id, id)
        .await?
        .ok_or(AppError::not_found("Employee", id))?;

    if let Some(role) = input.role {
        if id == manager.employee_id && role != existing.role() {
            return Err(AppError::forbidden("You cannot change your own role"));
        }
        if !can_assign_role(manager.role, role) {
            return Err(AppError::forbidden(format!(
                "{} may not assign the {} role",
                manager.role.name(),
                role.name()
            )));
        }
    }
    if let Some(username) = &input.username {
        validate_username(username).map_err(AppError::validation)?;
    }

    let updated = EmployeeRepo::update(
        &state.pool,
        id,
        &UpdateEmployee {
            first_name: input.first_name.map(|s| s.trim().to_string()),
            last_name: input.last_name.map(|s| s.trim().to_string()),
            username: input.username,
            role: input.role,
            hire_date: input.hire_date,
            birth_date: input.birth_date,
        },
    )
    .await?
    .ok_or(AppError::not_found("Employee", id))?;

    tracing::info!(employee_id = id, updated_by = manager.employee_id, "Employee updated");
    Ok(Json(EmployeeResponse::from(&updated)))
}

/// DELETE /api/v1/employee/{id}
///
/// Removes the employee with their shifts, availability, time off and
/// refresh tokens. Managers cannot delete themselves.
pub async fn delete_employee(
    State(state): State<AppState>,
    RequireEmployeeManager(manager): RequireEmployeeManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == manager.employee_id {
        return Err(AppError::forbidden("You cannot delete your own account"));
    }
    let company_id = manager.company()?;
    if !EmployeeRepo::delete(&state.pool, company_id, id).await? {
        return Err(AppError::not_found("Employee", id));
    }
    tracing::info!(employee_id = id, deleted_by = manager.employee_id, "Employee deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Self-service handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/employee/profile
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<EmployeeResponse>> {
    let employee = load_self(&state, &user).await?;
    Ok(Json(EmployeeResponse::from(&employee)))
}

/// PUT /api/v1/employee/profile
///
/// Names and birth date only; role, username and hire date are managed.
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<EmployeeResponse>> {
    let updated = EmployeeRepo::update(
        &state.pool,
        user.employee_id,
        &UpdateEmployee {
            first_name: input.first_name.map(|s| s.trim().to_string()),
            last_name: input.last_name.map(|s| s.trim().to_string()),
            birth_date: input.birth_date,
            ..Default::default()
        },
    )
    .await?
    .ok_or(AppError::not_found("Employee", user.employee_id))?;
    Ok(Json(EmployeeResponse::from(&updated)))
}

/// PUT /api/v1/employee/profile/password
///
/// Requires the current password. Revokes every refresh token of the
/// account, so other sessions must log in again.
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    let employee = load_self(&state, &user).await?;

    let current_ok = verify_password(&input.current_password, &employee.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_ok {
        return Err(AppError::validation("Current password is incorrect"));
    }
    validate_password_strength(&input.new_password, state.config.min_password_length)
        .map_err(AppError::validation)?;

    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    EmployeeRepo::update_password(&state.pool, employee.id, &hashed).await?;
    let revoked = RefreshTokenRepo::revoke_all_for_employee(&state.pool, employee.id).await?;

    tracing::info!(employee_id = employee.id, revoked, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}

async fn load_self(state: &AppState, user: &AuthUser) -> AppResult<Employee> {
    EmployeeRepo::find_by_id(&state.pool, user.employee_id)
        .await?
        .ok_or(AppError::not_found("Employee", user.employee_id))
}
