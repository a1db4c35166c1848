//! Route definitions for the `/shift` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::shift;
use crate::state::AppState;

/// Routes mounted at `/shift`.
///
/// ```text
/// GET    /                               -> list_shifts
/// POST   /                               -> create_shift (ManageShifts)
/// GET    /my-shifts                      -> my_shifts
/// GET    /employee/{id}                  -> employee_shifts (self or ViewTeam)
/// GET    /schedule/week/{week}           -> week_schedule
/// GET    /schedule/month/{month_year}    -> month_schedule
/// GET    /available-employees            -> list_available_employees (ManageShifts)
/// POST   /check-overlap                  -> check_overlap (ManageShifts)
/// GET    /{id}                           -> get_shift
/// PUT    /{id}                           -> update_shift (ManageShifts)
/// DELETE /{id}                           -> delete_shift (ManageShifts)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(shift::list_shifts).post(shift::create_shift))
        .route("/my-shifts", get(shift::my_shifts))
        .route("/employee/{id}", get(shift::employee_shifts))
        .route("/schedule/week/{week}", get(shift::week_schedule))
        .route("/schedule/month/{month_year}", get(shift::month_schedule))
        .route("/available-employees", get(shift::list_available_employees))
        .route("/check-overlap", post(shift::check_overlap))
        .route(
            "/{id}",
            get(shift::get_shift)
                .put(shift::update_shift)
                .delete(shift::delete_shift),
        )
}
