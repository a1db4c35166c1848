pub mod auth;
pub mod availability;
pub mod company;
pub mod employee;
pub mod shift;
pub mod time_off;
