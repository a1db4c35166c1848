//! Availability entity model.

use chrono::NaiveDate;
use rooster_core::availability::{AvailabilityStatus, DayRecord};
use rooster_core::dates::date_format;
use rooster_core::types::{DbId, EnumId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `availability` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub id: DbId,
    pub employee_id: DbId,
    pub company_id: DbId,
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    pub status: EnumId,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Availability {
    /// Decoded status. `ck_availability_status` keeps the column in range.
    pub fn status(&self) -> AvailabilityStatus {
        AvailabilityStatus::from_id(self.status).unwrap_or(AvailabilityStatus::Available)
    }

    pub fn to_day_record(&self) -> DayRecord {
        DayRecord {
            date: self.date,
            status: self.status(),
            notes: self.notes.clone(),
        }
    }
}

/// Upsert DTO for one employee-day.
#[derive(Debug, Clone)]
pub struct UpsertAvailability {
    pub employee_id: DbId,
    pub company_id: DbId,
    pub date: NaiveDate,
    pub status: AvailabilityStatus,
    pub notes: Option<String>,
}

/// One day of a batch write. `status: None` clears the day.
#[derive(Debug, Clone)]
pub struct AvailabilityChange {
    pub date: NaiveDate,
    pub status: Option<AvailabilityStatus>,
    pub notes: Option<String>,
}
