//! Startup provisioning of the first SuperAdmin account.
//!
//! SuperAdmin accounts cannot be created through the API, so the first one is
//! created at startup from `SUPERADMIN_USERNAME` / `SUPERADMIN_PASSWORD` when
//! no SuperAdmin exists yet.

use rooster_core::employee::validate_username;
use rooster_core::roles::Role;
use rooster_db::models::employee::CreateEmployee;
use rooster_db::repositories::EmployeeRepo;
use rooster_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};

/// Credentials for the initial SuperAdmin.
#[derive(Debug, Clone)]
pub struct SuperAdminSeed {
    pub username: String,
    pub password: String,
}

impl SuperAdminSeed {
    /// Read the seed from the environment. `None` when either variable is
    /// unset or empty.
    pub fn from_env() -> Option<Self> {
        let username = std::env::var("SUPERADMIN_USERNAME").ok()?;
        let password = std::env::var("SUPERADMIN_PASSWORD").ok()?;
        if username.trim().is_empty() || password.is_empty() {
            return None;
        }
        Some(Self {
            username: username.trim().to_string(),
            password,
        })
    }
}

/// Create the SuperAdmin described by `seed` unless one already exists.
///
/// Returns `true` when an account was created.
pub async fn ensure_superadmin(
    pool: &DbPool,
    seed: &SuperAdminSeed,
    min_password_length: usize,
) -> AppResult<bool> {
    if EmployeeRepo::superadmin_exists(pool).await? {
        tracing::debug!("SuperAdmin already present, skipping bootstrap");
        return Ok(false);
    }

    validate_username(&seed.username).map_err(AppError::validation)?;
    validate_password_strength(&seed.password, min_password_length)
        .map_err(AppError::validation)?;

    let password_hash = hash_password(&seed.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let admin = EmployeeRepo::create(
        pool,
        &CreateEmployee {
            company_id: None,
            first_name: "Super".into(),
            last_name: "Admin".into(),
            username: seed.username.clone(),
            password_hash,
            role: Role::SuperAdmin,
            hire_date: None,
            birth_date: None,
        },
    )
    .await?;

    tracing::info!(employee_id = admin.id, username = %admin.username, "SuperAdmin account created");
    Ok(true)
}
