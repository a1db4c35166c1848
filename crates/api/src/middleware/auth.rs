//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use rooster_core::error::CoreError;
use rooster_core::roles::{is_permitted, Capability, Role};
use rooster_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated employee extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(employee_id = user.employee_id, role = user.role.name(), "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The employee's database id (from `claims.sub`).
    pub employee_id: DbId,
    pub role: Role,
    /// `None` only for SuperAdmin.
    pub company_id: Option<DbId>,
}

impl AuthUser {
    /// The caller's company, or 403 for accounts without one.
    pub fn company(&self) -> Result<DbId, AppError> {
        self.company_id.ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "This action requires a company account".into(),
            ))
        })
    }

    pub fn can(&self, capability: Capability) -> bool {
        is_permitted(self.role, capability)
    }

    /// 403 unless the caller holds `capability`.
    pub fn require(&self, capability: Capability) -> Result<(), AppError> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(forbidden_for(capability))
        }
    }

    /// Allow access to `employee_id`'s data for the employee themself, or for
    /// holders of `capability`.
    pub fn require_self_or(&self, employee_id: DbId, capability: Capability) -> Result<(), AppError> {
        if self.employee_id == employee_id {
            Ok(())
        } else {
            self.require(capability)
        }
    }
}

pub(crate) fn forbidden_for(capability: Capability) -> AppError {
    AppError::Core(CoreError::Forbidden(format!(
        "Insufficient permissions: {capability:?} required"
    )))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let role = Role::from_id(claims.role).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;
        if role.requires_company() != claims.company_id.is_some() {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid or expired token".into(),
            )));
        }

        Ok(AuthUser {
            employee_id: claims.sub,
            role,
            company_id: claims.company_id,
        })
    }
}
