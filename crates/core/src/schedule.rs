//! Week and month schedule windows, ordering, and free-employee lookup.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::dates::parse_wire_date;
use crate::error::CoreError;
use crate::shift::{interval, intervals_overlap, ShiftTimes};
use crate::types::DbId;

/// Days in a schedule week.
pub const DAYS_PER_WEEK: usize = 7;

/// The Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Monday through Sunday of the week containing `date`.
pub fn week_dates(date: NaiveDate) -> [NaiveDate; DAYS_PER_WEEK] {
    let monday = week_start(date);
    std::array::from_fn(|offset| monday + Duration::days(offset as i64))
}

/// Inclusive time window a schedule covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ScheduleWindow {
    /// Monday 00:00:00 through Sunday 23:59:59 of the week containing `date`.
    pub fn week_of(date: NaiveDate) -> Self {
        let monday = week_start(date);
        Self::spanning(monday, monday + Duration::days(6))
    }

    /// First through last calendar day of `year`-`month`.
    pub fn month_of(year: i32, month: u32) -> Result<Self, CoreError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| CoreError::Validation(format!("Invalid month {month:02}-{year}")))?;
        let next_first = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(|| CoreError::Validation(format!("Invalid month {month:02}-{year}")))?;
        Ok(Self::spanning(first, next_first - Duration::days(1)))
    }

    fn spanning(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            start: first.and_time(NaiveTime::MIN),
            end: last.and_time(end_of_day()),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.end.date()
    }

    /// Whether `date` falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day() && date <= self.last_day()
    }

    /// Every date in the window, in order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.first_day()
            .iter_days()
            .take_while(|d| *d <= self.last_day())
            .collect()
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

/// Resolve a week path key to its Monday.
///
/// Accepts any `DD-MM-YYYY` date in the week, or an ISO week `YYYY-Www`.
pub fn parse_week_key(key: &str) -> Result<NaiveDate, CoreError> {
    let key = key.trim();
    if let Some((year, week)) = key.split_once("-W").or_else(|| key.split_once("-w")) {
        let year: i32 = year
            .parse()
            .map_err(|_| CoreError::Validation(format!("Invalid ISO week '{key}'")))?;
        let week: u32 = week
            .parse()
            .map_err(|_| CoreError::Validation(format!("Invalid ISO week '{key}'")))?;
        return NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
            .ok_or_else(|| CoreError::Validation(format!("Invalid ISO week '{key}'")));
    }
    parse_wire_date(key)
        .map(week_start)
        .map_err(CoreError::Validation)
}

/// Parse a month path key, `MM-YYYY` or `YYYY-MM`, into `(year, month)`.
pub fn parse_month_key(key: &str) -> Result<(i32, u32), CoreError> {
    let invalid = || CoreError::Validation(format!("Invalid month '{key}', expected MM-YYYY"));
    let (left, right) = key.trim().split_once('-').ok_or_else(invalid)?;
    let (year, month) = if left.len() == 4 {
        (left, right)
    } else {
        (right, left)
    };
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

/// ISO week number of `date`.
pub fn iso_week_number(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// Sort by date, then start time.
pub fn sort_chronologically<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> (NaiveDate, NaiveTime),
{
    items.sort_by_key(|item| key(item));
}

/// Bucket `items` into the seven days of the week starting at `monday`.
///
/// Items outside the week are dropped; order within a day is preserved.
pub fn group_by_day<'a, T, F>(
    monday: NaiveDate,
    items: &'a [T],
    date_of: F,
) -> Vec<(NaiveDate, Vec<&'a T>)>
where
    F: Fn(&T) -> NaiveDate,
{
    week_dates(monday)
        .into_iter()
        .map(|day| {
            let on_day = items.iter().filter(|item| date_of(*item) == day).collect();
            (day, on_day)
        })
        .collect()
}

/// An existing shift assignment on the date being staffed.
#[derive(Debug, Clone, Copy)]
pub struct Assignment {
    pub employee_id: DbId,
    pub times: ShiftTimes,
}

/// Employees free to work `wanted` on a given date.
///
/// An employee is excluded when any of their `assignments` overlaps the
/// wanted window, or when their id is in `unavailable`. Everyone else is
/// available; input order is kept.
pub fn available_employees<'a, T, F>(
    candidates: &'a [T],
    employee_id: F,
    wanted: &ShiftTimes,
    assignments: &[Assignment],
    unavailable: &HashSet<DbId>,
    closing: NaiveTime,
) -> Vec<&'a T>
where
    F: Fn(&T) -> DbId,
{
    let window = interval(wanted, closing);
    let busy: HashSet<DbId> = assignments
        .iter()
        .filter(|a| intervals_overlap(window, interval(&a.times, closing)))
        .map(|a| a.employee_id)
        .collect();

    candidates
        .iter()
        .filter(|c| {
            let id = employee_id(*c);
            !busy.contains(&id) && !unavailable.contains(&id)
        })
        .collect()
}
