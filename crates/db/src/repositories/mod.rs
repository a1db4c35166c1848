//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that take
//! `&PgPool` as the first argument. Company-scoped lookups take the caller's
//! company id, so rows of another tenant read as missing.

pub mod availability_repo;
pub mod company_repo;
pub mod employee_repo;
pub mod refresh_token_repo;
pub mod shift_repo;
pub mod time_off_repo;

pub use availability_repo::AvailabilityRepo;
pub use company_repo::CompanyRepo;
pub use employee_repo::EmployeeRepo;
pub use refresh_token_repo::RefreshTokenRepo;
pub use shift_repo::ShiftRepo;
pub use time_off_repo::TimeOffRepo;
