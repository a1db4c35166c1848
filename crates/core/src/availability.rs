//! Availability status and per-day resolution against approved time off.
//!
//! Precedence for a single day:
//!
//! 1. An approved time-off request covering the day forces [`AvailabilityStatus::TimeOff`].
//! 2. Otherwise the employee's explicit availability record applies.
//! 3. Otherwise the day is unset (`None`).

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::dates::date_format;
use crate::error::CoreError;
use crate::schedule::week_dates;
use crate::types::define_id_enum;

define_id_enum! {
    /// Explicit availability of an employee on one date. Encoded as an integer.
    AvailabilityStatus {
        Available = 0,
        NotAvailable = 1,
        TimeOff = 2,
    }
}

/// Whether a status keeps the employee off the schedule.
pub fn blocks_scheduling(status: AvailabilityStatus) -> bool {
    matches!(
        status,
        AvailabilityStatus::NotAvailable | AvailabilityStatus::TimeOff
    )
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if end < start {
            return Err(CoreError::Validation(
                "endDate must be on or after startDate".into(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Whether the two ranges share at least one day.
    pub fn intersects(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Number of days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// A stored availability record, reduced to what resolution needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub status: AvailabilityStatus,
    pub notes: Option<String>,
}

/// An approved time-off period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovedTimeOff {
    pub range: DateRange,
    pub reason: String,
}

/// Resolve the status for one day.
pub fn resolve_day_status(
    date: NaiveDate,
    record: Option<AvailabilityStatus>,
    approved: &[DateRange],
) -> Option<AvailabilityStatus> {
    if approved.iter().any(|range| range.contains(date)) {
        return Some(AvailabilityStatus::TimeOff);
    }
    record
}

/// One entry of the weekly availability view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAvailability {
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    pub day_name: &'static str,
    pub status: Option<AvailabilityStatus>,
    pub notes: Option<String>,
}

/// Dutch weekday name as shown in the roster.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Maandag",
        Weekday::Tue => "Dinsdag",
        Weekday::Wed => "Woensdag",
        Weekday::Thu => "Donderdag",
        Weekday::Fri => "Vrijdag",
        Weekday::Sat => "Zaterdag",
        Weekday::Sun => "Zondag",
    }
}

/// Seven resolved entries, Monday through Sunday, for the week of `any_day`.
///
/// Days forced to time off without notes of their own carry the time-off
/// reason as notes.
pub fn build_week_view(
    any_day: NaiveDate,
    records: &[DayRecord],
    time_off: &[ApprovedTimeOff],
) -> Vec<DayAvailability> {
    let ranges: Vec<DateRange> = time_off.iter().map(|t| t.range).collect();

    week_dates(any_day)
        .into_iter()
        .map(|date| {
            let record = records.iter().find(|r| r.date == date);
            let status = resolve_day_status(date, record.map(|r| r.status), &ranges);
            let notes = record.and_then(|r| r.notes.clone()).or_else(|| {
                time_off
                    .iter()
                    .find(|t| t.range.contains(date))
                    .map(|t| t.reason.clone())
            });
            DayAvailability {
                date,
                day_name: weekday_name(date.weekday()),
                status,
                notes,
            }
        })
        .collect()
}
