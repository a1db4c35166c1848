//! Shift entity model and DTOs.

use chrono::{NaiveDate, NaiveTime};
use rooster_core::shift::{ShiftTimes, ShiftType};
use rooster_core::types::{DbId, EnumId, Timestamp};
use sqlx::FromRow;

/// A row from the `shifts` table.
#[derive(Debug, Clone, FromRow)]
pub struct Shift {
    pub id: DbId,
    pub employee_id: DbId,
    pub company_id: DbId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub shift_type: EnumId,
    pub is_open_ended: bool,
    pub is_standby: bool,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Shift {
    /// Decoded shift type. `ck_shifts_shift_type` keeps the column in range.
    pub fn shift_type(&self) -> ShiftType {
        ShiftType::from_id(self.shift_type).unwrap_or(ShiftType::Serving)
    }

    pub fn times(&self) -> ShiftTimes {
        ShiftTimes::new(self.start_time, self.end_time, self.is_open_ended)
    }
}

/// A shift joined with its employee's display fields.
#[derive(Debug, Clone, FromRow)]
pub struct ShiftWithEmployee {
    #[sqlx(flatten)]
    pub shift: Shift,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

/// Full set of writable shift fields, used for both insert and update.
#[derive(Debug, Clone)]
pub struct ShiftInput {
    pub employee_id: DbId,
    pub date: NaiveDate,
    pub times: ShiftTimes,
    pub shift_type: ShiftType,
    pub is_standby: bool,
    pub notes: Option<String>,
}
