//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects with 403 when the caller's
//! role lacks the capability. Company-bound capabilities also reject
//! accounts without a company, so handlers can rely on `company_id`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use rooster_core::roles::Capability;
use rooster_core::types::DbId;

use super::auth::{forbidden_for, AuthUser};
use crate::error::AppError;
use crate::state::AppState;

macro_rules! capability_extractor {
    ($(#[$meta:meta])* $name:ident, $capability:expr) => {
        $(#[$meta])*
        pub struct $name(pub AuthUser);

        impl $name {
            /// The caller's company. Present whenever the capability is
            /// company-bound.
            pub fn company(&self) -> Result<DbId, AppError> {
                self.0.company()
            }
        }

        impl FromRequestParts<AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &AppState,
            ) -> Result<Self, Self::Rejection> {
                let user = AuthUser::from_request_parts(parts, state).await?;
                if !user.can($capability) {
                    return Err(forbidden_for($capability));
                }
                Ok($name(user))
            }
        }
    };
}

capability_extractor!(
    /// Read the team list and colleagues' schedules (ShiftLeider, Manager).
    RequireTeamViewer,
    Capability::ViewTeam
);

capability_extractor!(
    /// Create, edit and delete shifts (ShiftLeider, Manager).
    RequireShiftManager,
    Capability::ManageShifts
);

capability_extractor!(
    /// Edit and delete employees of the own company (Manager only).
    RequireEmployeeManager,
    Capability::ManageEmployees
);

capability_extractor!(
    /// Create employee accounts (Manager, SuperAdmin).
    RequireProvisioner,
    Capability::ProvisionEmployees
);

capability_extractor!(
    /// Cross-company administration (SuperAdmin only).
    RequireSuperAdmin,
    Capability::AdministerCompanies
);
