//! Shared query parameter types for API handlers.
//!
//! Dates arrive as `DD-MM-YYYY` strings and times as `HH:MM`.

use chrono::{NaiveDate, NaiveTime, Utc};
use rooster_core::availability::DateRange;
use rooster_core::dates::{date_format, time_format};
use rooster_core::schedule::ScheduleWindow;
use rooster_core::types::DbId;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// `?startDate=&endDate=&employeeId=`, all optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeParams {
    #[serde(default, with = "date_format::option")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "date_format::option")]
    pub end_date: Option<NaiveDate>,
    pub employee_id: Option<DbId>,
}

impl DateRangeParams {
    /// The requested range. Both dates absent means the current week; only
    /// one present is a validation error.
    pub fn range_or_current_week(&self) -> AppResult<DateRange> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Ok(DateRange::new(start, end)?),
            (None, None) => {
                let week = ScheduleWindow::week_of(Utc::now().date_naive());
                Ok(DateRange::new(week.first_day(), week.last_day())?)
            }
            _ => Err(AppError::validation(
                "startDate and endDate must be given together",
            )),
        }
    }

    pub fn has_range(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }
}

/// `?employeeId=` filter for schedule views.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeFilterParams {
    pub employee_id: Option<DbId>,
}

/// `?date=&startTime=&endTime=` for the free-employee lookup. A missing
/// `endTime` means the shift runs until closing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindowParams {
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    #[serde(with = "time_format")]
    pub start_time: NaiveTime,
    #[serde(default, with = "time_format::option")]
    pub end_time: Option<NaiveTime>,
}
