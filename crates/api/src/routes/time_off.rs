//! Route definitions for the `/timeoff` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::time_off;
use crate::state::AppState;

/// Routes mounted at `/timeoff`.
///
/// ```text
/// GET    /       -> list_time_off
/// POST   /       -> create_time_off
/// GET    /{id}   -> get_time_off
/// PUT    /{id}   -> update_time_off
/// DELETE /{id}   -> delete_time_off
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(time_off::list_time_off).post(time_off::create_time_off),
        )
        .route(
            "/{id}",
            get(time_off::get_time_off)
                .put(time_off::update_time_off)
                .delete(time_off::delete_time_off),
        )
}
