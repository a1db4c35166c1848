//! Employee entity model and DTOs.

use chrono::NaiveDate;
use rooster_core::employee::full_name;
use rooster_core::roles::Role;
use rooster_core::types::{DbId, EnumId, Timestamp};
use sqlx::FromRow;

/// A row from the `employees` table.
///
/// Contains the password hash; never serialize this to API responses.
#[derive(Debug, Clone, FromRow)]
pub struct Employee {
    pub id: DbId,
    pub company_id: Option<DbId>,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password_hash: String,
    pub role: EnumId,
    pub hire_date: Option<NaiveDate>,
    pub birth_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Employee {
    /// Decoded role. `ck_employees_role` keeps the column in range.
    pub fn role(&self) -> Role {
        Role::from_id(self.role).unwrap_or(Role::Werknemer)
    }

    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name, &self.username)
    }
}

/// Insert DTO. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateEmployee {
    pub company_id: Option<DbId>,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub hire_date: Option<NaiveDate>,
    pub birth_date: Option<NaiveDate>,
}

/// Partial update. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateEmployee {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub role: Option<Role>,
    pub hire_date: Option<NaiveDate>,
    pub birth_date: Option<NaiveDate>,
}
