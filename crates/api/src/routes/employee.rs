//! Route definitions for the `/employee` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::employee;
use crate::state::AppState;

/// Routes mounted at `/employee`.
///
/// ```text
/// GET    /                   -> list_employees (ViewTeam)
/// POST   /                   -> create_employee (ProvisionEmployees)
/// GET    /profile            -> get_profile
/// PUT    /profile            -> update_profile
/// PUT    /profile/password   -> change_password
/// GET    /{id}               -> get_employee (self or ViewTeam)
/// PUT    /{id}               -> update_employee (ManageEmployees)
/// DELETE /{id}               -> delete_employee (ManageEmployees)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(employee::list_employees).post(employee::create_employee),
        )
        .route(
            "/profile",
            get(employee::get_profile).put(employee::update_profile),
        )
        .route("/profile/password", put(employee::change_password))
        .route(
            "/{id}",
            get(employee::get_employee)
                .put(employee::update_employee)
                .delete(employee::delete_employee),
        )
}
