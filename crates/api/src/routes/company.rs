//! Route definitions for the `/company` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::company;
use crate::state::AppState;

/// Routes mounted at `/company`.
///
/// ```text
/// GET    /          -> list_companies (SuperAdmin)
/// POST   /          -> create_company (SuperAdmin)
/// GET    /current   -> current_company
/// GET    /{id}      -> get_company (SuperAdmin)
/// PUT    /{id}      -> update_company (SuperAdmin)
/// DELETE /{id}      -> delete_company (SuperAdmin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(company::list_companies).post(company::create_company),
        )
        .route("/current", get(company::current_company))
        .route(
            "/{id}",
            get(company::get_company)
                .put(company::update_company)
                .delete(company::delete_company),
        )
}
