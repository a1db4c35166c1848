//! Time-off request entity model and DTOs.

use chrono::NaiveDate;
use rooster_core::availability::{ApprovedTimeOff, DateRange};
use rooster_core::time_off::TimeOffStatus;
use rooster_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `time_off_requests` table.
#[derive(Debug, Clone, FromRow)]
pub struct TimeOffRequest {
    pub id: DbId,
    pub employee_id: DbId,
    pub company_id: DbId,
    pub status: String,
    pub reason: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub approved_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TimeOffRequest {
    /// Decoded status. `ck_time_off_status` keeps the column to known names.
    pub fn status(&self) -> TimeOffStatus {
        self.status.parse().unwrap_or(TimeOffStatus::Pending)
    }

    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }

    pub fn to_approved(&self) -> ApprovedTimeOff {
        ApprovedTimeOff {
            range: self.range(),
            reason: self.reason.clone(),
        }
    }
}

/// A request joined with the requester's display fields.
#[derive(Debug, Clone, FromRow)]
pub struct TimeOffWithEmployee {
    #[sqlx(flatten)]
    pub request: TimeOffRequest,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

/// Insert DTO. New requests always start as `Pending`.
#[derive(Debug, Clone)]
pub struct CreateTimeOff {
    pub employee_id: DbId,
    pub company_id: DbId,
    pub reason: String,
    pub range: DateRange,
}

/// Partial update of the requester-editable fields.
#[derive(Debug, Clone, Default)]
pub struct UpdateTimeOff {
    pub reason: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// A guarded status move: applies only while the row is still in `from`.
#[derive(Debug, Clone, Copy)]
pub struct StatusChange {
    pub from: TimeOffStatus,
    pub to: TimeOffStatus,
    /// Reviewer to record; `None` keeps the current value.
    pub approved_by: Option<DbId>,
}
