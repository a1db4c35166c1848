pub mod auth;
pub mod availability;
pub mod company;
pub mod employee;
pub mod health;
pub mod shift;
pub mod time_off;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                   login (public)
/// /auth/refresh                                 rotate refresh token (public)
/// /auth/logout                                  revoke refresh token (public)
///
/// /employee                                     list, create
/// /employee/profile                             get, update own profile
/// /employee/profile/password                    change own password (PUT)
/// /employee/{id}                                get, update, delete
///
/// /company                                      list, create (SuperAdmin)
/// /company/current                              caller's company (GET)
/// /company/{id}                                 get, update, delete (SuperAdmin)
///
/// /shift                                        list (?startDate&endDate), create
/// /shift/my-shifts                              caller's shifts (GET)
/// /shift/employee/{id}                          one employee's shifts (GET)
/// /shift/schedule/week/{week}                   seven-day schedule (GET)
/// /shift/schedule/month/{monthYear}             month schedule (GET)
/// /shift/available-employees                    free employees for a slot (GET)
/// /shift/check-overlap                          overlap check (POST)
/// /shift/{id}                                   get, update, delete
///
/// /availability/my-availability                 set one day (PUT)
/// /availability/my-availability/week            set several days (PUT)
/// /availability/my-availability/week/{week}     resolved week view (GET)
/// /availability/employee/{id}/week/{week}       resolved week view (GET)
/// /availability/date-range                      stored records (GET)
///
/// /timeoff                                      list (?status), create
/// /timeoff/{id}                                 get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (login, refresh, logout).
        .nest("/auth", auth::router())
        // Employees and self-service profile.
        .nest("/employee", employee::router())
        // Cross-company administration.
        .nest("/company", company::router())
        // Shifts, schedules and planning helpers.
        .nest("/shift", shift::router())
        // Per-day availability.
        .nest("/availability", availability::router())
        // Time-off requests.
        .nest("/timeoff", time_off::router())
}
