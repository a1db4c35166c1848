//! Domain logic for the restaurant roster: roles, shifts, schedules,
//! availability and time off.
//!
//! This crate has no internal dependencies and performs no I/O so it can be
//! used by the repository layer, the API, and tests alike.

pub mod availability;
pub mod company;
pub mod dates;
pub mod employee;
pub mod error;
pub mod roles;
pub mod schedule;
pub mod shift;
pub mod time_off;
pub mod types;
