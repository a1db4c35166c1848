//! Handlers for the `/company` resource.
//!
//! Administration is SuperAdmin-only; any company member may read their own
//! company through `/company/current`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rooster_core::company::{validate_short_name, validate_theme_colors};
use rooster_core::types::DbId;
use rooster_db::models::company::{Company, CreateCompany, UpdateCompany};
use rooster_db::repositories::CompanyRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireSuperAdmin;
use crate::state::AppState;

/// Request body for `POST /company`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    pub short_name: String,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub accent_color: Option<String>,
}

/// Request body for `PUT /company/{id}`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 1, max = 100, message = "Name must not be empty"))]
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub accent_color: Option<String>,
}

fn check_colors(
    primary: &Option<String>,
    secondary: &Option<String>,
    accent: &Option<String>,
) -> Result<(), AppError> {
    let given: Vec<(&str, &str)> = [
        ("primaryColor", primary),
        ("secondaryColor", secondary),
        ("accentColor", accent),
    ]
    .into_iter()
    .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
    .collect();
    validate_theme_colors(&given).map_err(AppError::validation)
}

/// GET /api/v1/company
pub async fn list_companies(
    State(state): State<AppState>,
    _admin: RequireSuperAdmin,
) -> AppResult<Json<Vec<Company>>> {
    Ok(Json(CompanyRepo::list(&state.pool).await?))
}

/// POST /api/v1/company
pub async fn create_company(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    ValidatedJson(input): ValidatedJson<CreateCompanyRequest>,
) -> AppResult<(StatusCode, Json<Company>)> {
    validate_short_name(&input.short_name).map_err(AppError::validation)?;
    check_colors(&input.primary_color, &input.secondary_color, &input.accent_color)?;
    let company = CompanyRepo::create(
        &state.pool,
        &CreateCompany {
            name: input.name.trim().to_string(),
            short_name: input.short_name.trim().to_string(),
            primary_color: input.primary_color,
            secondary_color: input.secondary_color,
            accent_color: input.accent_color,
        },
    )
    .await?;
    tracing::info!(company_id = company.id, created_by = admin.employee_id, "Company created");
    Ok((StatusCode::CREATED, Json(company)))
}

/// GET /api/v1/company/{id}
pub async fn get_company(
    State(state): State<AppState>,
    _admin: RequireSuperAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<Company>> {
    let company = CompanyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Company", id))?;
    Ok(Json(company))
}

/// PUT /api/v1/company/{id}
pub async fn update_company(
    State(state): State<AppState>,
    _admin: RequireSuperAdmin,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateCompanyRequest>,
) -> AppResult<Json<Company>> {
    if let Some(short_name) = &input.short_name {
        validate_short_name(short_name).map_err(AppError::validation)?;
    }
    check_colors(&input.primary_color, &input.secondary_color, &input.accent_color)?;
    let company = CompanyRepo::update(
        &state.pool,
        id,
        &UpdateCompany {
            name: input.name.map(|s| s.trim().to_string()),
            short_name: input.short_name.map(|s| s.trim().to_string()),
            primary_color: input.primary_color,
            secondary_color: input.secondary_color,
            accent_color: input.accent_color,
        },
    )
    .await?
    .ok_or(AppError::not_found("Company", id))?;
    Ok(Json(company))
}

/// DELETE /api/v1/company/{id}
///
/// 409 while employees still belong to the company.
pub async fn delete_company(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !CompanyRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Company", id));
    }
    tracing::info!(company_id = id, deleted_by = admin.employee_id, "Company deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/company/current
pub async fn current_company(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Company>> {
    let id = user.company()?;
    let company = CompanyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Company", id))?;
    Ok(Json(company))
}
