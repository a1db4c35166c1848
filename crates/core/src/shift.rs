//! Shift times, overlap detection, and derived shift values.
//!
//! Times are compared as seconds since midnight so that an open-ended shift
//! can run until end of day (24:00), which `NaiveTime` cannot represent.
//! Every interval is half-open: `[start, end)`.

use chrono::{NaiveTime, Timelike};

use crate::dates::format_wire_time;
use crate::error::CoreError;
use crate::types::define_id_enum;

/// Seconds in a calendar day; the effective end of a shift that runs to
/// midnight.
pub const END_OF_DAY_SECS: u32 = 24 * 60 * 60;

/// Label used for the end of an open-ended shift.
pub const OPEN_END_LABEL: &str = "close";

define_id_enum! {
    /// Kind of work a shift covers. Encoded as an integer.
    ShiftType {
        Cleaning = 0,
        Serving = 1,
        Combined = 2,
    }
}

impl ShiftType {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            ShiftType::Cleaning => "Schoonmaak",
            ShiftType::Serving => "Bediening",
            ShiftType::Combined => "Schoonmaak & Bediening",
        }
    }
}

/// The time part of a shift, independent of employee and date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftTimes {
    pub start: NaiveTime,
    pub end: Option<NaiveTime>,
    pub is_open_ended: bool,
}

impl ShiftTimes {
    /// A shift with a fixed end time.
    pub fn closed(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start,
            end: Some(end),
            is_open_ended: false,
        }
    }

    /// A shift that runs until closing.
    pub fn open_ended(start: NaiveTime) -> Self {
        Self {
            start,
            end: None,
            is_open_ended: true,
        }
    }

    /// Build from raw fields, dropping any end time on open-ended shifts.
    pub fn new(start: NaiveTime, end: Option<NaiveTime>, is_open_ended: bool) -> Self {
        if is_open_ended {
            Self::open_ended(start)
        } else {
            Self {
                start,
                end,
                is_open_ended: false,
            }
        }
    }

    /// Reject closed shifts without an end, or whose end is not after start.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.is_open_ended {
            return Ok(());
        }
        match self.end {
            None => Err(CoreError::Validation(
                "endTime is required unless the shift is open-ended".into(),
            )),
            Some(end) if end <= self.start => Err(CoreError::Validation(
                "endTime must be after startTime".into(),
            )),
            Some(_) => Ok(()),
        }
    }
}

/// Half-open interval in seconds since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: u32,
    pub end: u32,
}

impl Interval {
    /// Zero or negative length.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn len_secs(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

fn secs_of(time: NaiveTime) -> u32 {
    time.num_seconds_from_midnight()
}

/// Effective end of a shift in seconds since midnight.
///
/// Closed shifts end at their end time. Open-ended shifts end at `closing`
/// when closing falls after their start, otherwise at end of day.
pub fn effective_end_secs(times: &ShiftTimes, closing: NaiveTime) -> u32 {
    let start = secs_of(times.start);
    if times.is_open_ended {
        let close = secs_of(closing);
        if close > start {
            close
        } else {
            END_OF_DAY_SECS
        }
    } else {
        times.end.map(secs_of).unwrap_or(start)
    }
}

/// The occupied interval of a shift.
pub fn interval(times: &ShiftTimes, closing: NaiveTime) -> Interval {
    Interval {
        start: secs_of(times.start),
        end: effective_end_secs(times, closing),
    }
}

/// `a.start < b.end && b.start < a.end`; empty intervals never overlap.
pub fn intervals_overlap(a: Interval, b: Interval) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.start < b.end && b.start < a.end
}

/// Whether two shifts on the same date overlap.
pub fn shifts_overlap(a: &ShiftTimes, b: &ShiftTimes, closing: NaiveTime) -> bool {
    intervals_overlap(interval(a, closing), interval(b, closing))
}

/// Whether `candidate` overlaps any of `existing`.
///
/// Callers pass only shifts of the same employee on the same date, with the
/// candidate's own row already excluded when checking an update.
pub fn has_overlap<'a, I>(candidate: &ShiftTimes, existing: I, closing: NaiveTime) -> bool
where
    I: IntoIterator<Item = &'a ShiftTimes>,
{
    let wanted = interval(candidate, closing);
    existing
        .into_iter()
        .any(|other| intervals_overlap(wanted, interval(other, closing)))
}

/// Length of a shift in minutes.
pub fn duration_minutes(times: &ShiftTimes, closing: NaiveTime) -> u32 {
    interval(times, closing).len_secs() / 60
}

/// Length of a shift in hours, rounded to two decimals.
pub fn duration_hours(times: &ShiftTimes, closing: NaiveTime) -> f64 {
    let secs = f64::from(interval(times, closing).len_secs());
    (secs / 36.0).round() / 100.0
}

/// `"13:00 - 17:00"`, or `"13:00 - close"` for open-ended shifts.
pub fn time_range_label(times: &ShiftTimes) -> String {
    let start = format_wire_time(times.start);
    match (times.is_open_ended, times.end) {
        (false, Some(end)) => format!("{start} - {}", format_wire_time(end)),
        _ => format!("{start} - {OPEN_END_LABEL}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn closing() -> NaiveTime {
        t(23, 0)
    }

    fn closed(sh: u32, eh: u32) -> ShiftTimes {
        ShiftTimes::closed(t(sh, 0), t(eh, 0))
    }

    #[test]
    fn partial_overlap_is_detected() {
        let existing = closed(13, 17);
        assert!(has_overlap(&closed(16, 20), [&existing], closing()));
    }

    #[test]
    fn back_to_back_does_not_overlap() {
        let existing = closed(13, 17);
        assert!(!has_overlap(&closed(17, 20), [&existing], closing()));
        assert!(!has_overlap(&closed(9, 13), [&existing], closing()));
    }

    #[test]
    fn overlap_is_symmetric() {
        let pairs = [
            (closed(9, 12), closed(11, 14)),
            (closed(9, 12), closed(12, 14)),
            (closed(9, 17), closed(10, 11)),
            (closed(9, 10), closed(15, 16)),
            (ShiftTimes::open_ended(t(18, 0)), closed(20, 22)),
        ];
        for (a, b) in pairs {
            assert_eq!(
                shifts_overlap(&a, &b, closing()),
                shifts_overlap(&b, &a, closing()),
                "{a:?} vs {b:?}"
            );
        }
    }

    #[test]
    fn containment_overlaps() {
        assert!(shifts_overlap(&closed(9, 17), &closed(10, 11), closing()));
    }

    #[test]
    fn zero_duration_never_overlaps() {
        let zero = ShiftTimes::closed(t(10, 0), t(10, 0));
        assert!(!shifts_overlap(&zero, &closed(9, 11), closing()));
        assert!(!shifts_overlap(&closed(9, 11), &zero, closing()));
    }

    #[test]
    fn open_ended_runs_until_closing() {
        let open = ShiftTimes::open_ended(t(18, 0));
        assert_eq!(effective_end_secs(&open, closing()), 23 * 3600);
        assert!(shifts_overlap(&open, &closed(22, 23), closing()));
        let late = ShiftTimes::closed(t(23, 0), t(23, 30));
        assert!(!shifts_overlap(&open, &late, closing()));
    }

    #[test]
    fn open_ended_after_closing_runs_to_end_of_day() {
        let open = ShiftTimes::open_ended(t(23, 15));
        assert_eq!(effective_end_secs(&open, closing()), END_OF_DAY_SECS);
        let late = ShiftTimes::closed(t(23, 30), t(23, 45));
        assert!(shifts_overlap(&open, &late, closing()));
    }

    #[test]
    fn new_drops_end_for_open_ended() {
        let times = ShiftTimes::new(t(18, 0), Some(t(20, 0)), true);
        assert_eq!(times.end, None);
        assert!(times.is_open_ended);
    }

    #[test]
    fn validate_requires_end_after_start() {
        assert!(closed(9, 17).validate().is_ok());
        assert!(ShiftTimes::open_ended(t(9, 0)).validate().is_ok());
        assert_matches!(closed(17, 9).validate(), Err(CoreError::Validation(_)));
        assert_matches!(closed(9, 9).validate(), Err(CoreError::Validation(_)));
        let missing = ShiftTimes::new(t(9, 0), None, false);
        assert_matches!(missing.validate(), Err(CoreError::Validation(msg)) if msg.contains("endTime"));
    }

    #[test]
    fn durations_and_labels() {
        let shift = ShiftTimes::closed(t(13, 0), t(17, 30));
        assert_eq!(duration_minutes(&shift, closing()), 270);
        assert!((duration_hours(&shift, closing()) - 4.5).abs() < f64::EPSILON);
        assert_eq!(time_range_label(&shift), "13:00 - 17:30");

        let open = ShiftTimes::open_ended(t(19, 0));
        assert_eq!(duration_minutes(&open, closing()), 240);
        assert_eq!(time_range_label(&open), "19:00 - close");
    }

    #[test]
    fn shift_type_wire_encoding() {
        assert_eq!(serde_json::to_string(&ShiftType::Combined).unwrap(), "2");
        assert_eq!(
            serde_json::from_str::<ShiftType>("0").unwrap(),
            ShiftType::Cleaning
        );
        assert!(serde_json::from_str::<ShiftType>("3").is_err());
    }
}
