//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO where the table supports edits
//!
//! Enum columns hold the raw `SMALLINT` discriminant; callers decode through
//! the accessor methods, which rely on the table's `ck_*` range constraints.

pub mod availability;
pub mod company;
pub mod employee;
pub mod refresh_token;
pub mod shift;
pub mod time_off;
