//! Handlers for the `/auth` resource (login, refresh, logout).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use rooster_core::types::Timestamp;
use rooster_db::models::company::Company;
use rooster_db::models::employee::Employee;
use rooster_db::models::refresh_token::CreateRefreshToken;
use rooster_db::repositories::{CompanyRepo, EmployeeRepo, RefreshTokenRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::handlers::employee::EmployeeResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for `POST /auth/refresh` and `POST /auth/logout`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token pair plus the signed-in employee and their company.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: EmployeeResponse,
    /// `null` for SuperAdmin.
    pub company: Option<Company>,
    /// When the access token expires.
    pub expires_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with username + password. Unknown users and wrong passwords
/// get the same 401.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let employee = EmployeeRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid username or password"))?;

    let password_valid = verify_password(&input.password, &employee.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(employee_id = employee.id, "Login rejected: wrong password");
        return Err(AppError::unauthorized("Invalid username or password"));
    }

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();
    RefreshTokenRepo::create(
        &state.pool,
        &CreateRefreshToken {
            employee_id: employee.id,
            token_hash: refresh_hash,
            expires_at: refresh_expiry(&state),
        },
    )
    .await?;

    let response = build_auth_response(&state, employee, refresh_plaintext).await?;
    tracing::info!(employee_id = response.user.id, "Employee logged in");
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a refresh token for a new pair. Revoking the presented token and
/// storing its replacement happen in one transaction, so the token works
/// exactly once and a failed exchange leaves it usable.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let issued = RefreshTokenRepo::rotate(
        &state.pool,
        &hash_refresh_token(&input.refresh_token),
        &refresh_hash,
        refresh_expiry(&state),
    )
    .await?
    .ok_or_else(|| AppError::unauthorized("Invalid or expired refresh token"))?;

    let employee = EmployeeRepo::find_by_id(&state.pool, issued.employee_id)
        .await?
        .ok_or_else(|| AppError::unauthorized("Employee no longer exists"))?;

    let response = build_auth_response(&state, employee, refresh_plaintext).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Revoke the presented refresh token. Always 204, whether or not the token
/// was still live.
pub async fn logout(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<StatusCode> {
    let revoked =
        RefreshTokenRepo::revoke_by_hash(&state.pool, &hash_refresh_token(&input.refresh_token))
            .await?;
    tracing::debug!(revoked, "Logout");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn refresh_expiry(state: &AppState) -> Timestamp {
    Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days)
}

/// Sign an access token and build the response around an already stored
/// refresh token.
async fn build_auth_response(
    state: &AppState,
    employee: Employee,
    refresh_token: String,
) -> AppResult<AuthResponse> {
    let access = generate_access_token(
        employee.id,
        employee.role(),
        employee.company_id,
        &state.config.jwt,
    )
    .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let company = match employee.company_id {
        Some(id) => CompanyRepo::find_by_id(&state.pool, id).await?,
        None => None,
    };

    Ok(AuthResponse {
        access_token: access.token,
        refresh_token,
        user: EmployeeResponse::from(&employee),
        company,
        expires_at: access.expires_at,
    })
}
