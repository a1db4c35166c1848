//! Roles, access evaluation, and the capability table.
//!
//! Roles are ordered `Werknemer < ShiftLeider < Manager < SuperAdmin`, but the
//! ordering alone does not decide every permission:
//!
//! - [`has_access`] treats a `Manager` requirement as "exactly Manager".
//!   SuperAdmin does not manage a company's staff.
//! - [`is_permitted`] maps each [`Capability`] to the roles holding it with an
//!   explicit table. SuperAdmin holds only the cross-company capabilities.

use crate::types::define_id_enum;

define_id_enum! {
    /// Employee role. Encoded as an integer on the wire and in the database.
    Role {
        Werknemer = 0,
        ShiftLeider = 1,
        Manager = 2,
        SuperAdmin = 3,
    }
}

impl Role {
    /// Display name used in API responses and logs.
    pub fn name(self) -> &'static str {
        match self {
            Role::Werknemer => "Werknemer",
            Role::ShiftLeider => "ShiftLeider",
            Role::Manager => "Manager",
            Role::SuperAdmin => "SuperAdmin",
        }
    }

    /// Whether employees of this role must belong to a company.
    pub fn requires_company(self) -> bool {
        self != Role::SuperAdmin
    }
}

/// Decide whether `user_role` satisfies `required`.
///
/// A `Manager` requirement is met by `Manager` only. Every other requirement
/// follows the role ordering.
pub fn has_access(user_role: Role, required: Role) -> bool {
    match required {
        Role::Manager => user_role == Role::Manager,
        _ => user_role >= required,
    }
}

/// Named actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Read the company's employee list and other employees' schedules.
    ViewTeam,
    /// Create, edit, and delete shifts; query overlap and free employees.
    ManageShifts,
    /// Edit and delete employee records of the own company.
    ManageEmployees,
    /// Create new employee accounts.
    ProvisionEmployees,
    /// Approve or reject time-off requests.
    ReviewTimeOff,
    /// Create, edit, and delete companies.
    AdministerCompanies,
}

/// Capability table.
pub fn is_permitted(role: Role, capability: Capability) -> bool {
    match capability {
        Capability::ViewTeam | Capability::ManageShifts => {
            matches!(role, Role::ShiftLeider | Role::Manager)
        }
        Capability::ManageEmployees | Capability::ReviewTimeOff => has_access(role, Role::Manager),
        Capability::ProvisionEmployees => matches!(role, Role::Manager | Role::SuperAdmin),
        Capability::AdministerCompanies => role == Role::SuperAdmin,
    }
}

/// Whether `actor` may give an account the role `target`.
///
/// Managers assign roles up to their own; SuperAdmin provisions company
/// roles. Nobody creates SuperAdmin accounts through the API.
pub fn can_assign_role(actor: Role, target: Role) -> bool {
    match actor {
        Role::Manager => target <= Role::Manager,
        Role::SuperAdmin => target != Role::SuperAdmin,
        Role::Werknemer | Role::ShiftLeider => false,
    }
}
