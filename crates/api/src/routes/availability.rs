//! Route definitions for the `/availability` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::availability;
use crate::state::AppState;

/// Routes mounted at `/availability`.
///
/// ```text
/// PUT /my-availability                      -> set_my_day
/// PUT /my-availability/week                 -> set_my_week
/// GET /my-availability/week/{week}          -> my_week
/// GET /employee/{id}/week/{week}            -> employee_week (self or ViewTeam)
/// GET /date-range                           -> date_range
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/my-availability", put(availability::set_my_day))
        .route("/my-availability/week", put(availability::set_my_week))
        .route("/my-availability/week/{week}", get(availability::my_week))
        .route(
            "/employee/{id}/week/{week}",
            get(availability::employee_week),
        )
        .route("/date-range", get(availability::date_range))
}
