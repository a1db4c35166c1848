//! Wire formats for calendar dates (`DD-MM-YYYY`) and clock times (`HH:MM`).
//!
//! The `date_format` / `time_format` modules plug into serde via
//! `#[serde(with = "...")]`; their `option` submodules handle nullable fields
//! and must be combined with `#[serde(default)]`.

use chrono::{NaiveDate, NaiveTime};

/// `strftime` pattern for dates on the wire.
pub const WIRE_DATE_FORMAT: &str = "%d-%m-%Y";

/// `strftime` pattern for times on the wire.
pub const WIRE_TIME_FORMAT: &str = "%H:%M";

/// Parse a `DD-MM-YYYY` date.
pub fn parse_wire_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), WIRE_DATE_FORMAT)
        .map_err(|_| format!("Invalid date '{value}', expected DD-MM-YYYY"))
}

/// Format a date as `DD-MM-YYYY`.
pub fn format_wire_date(date: NaiveDate) -> String {
    date.format(WIRE_DATE_FORMAT).to_string()
}

/// Parse an `HH:MM` (or `HH:MM:SS`) time.
pub fn parse_wire_time(value: &str) -> Result<NaiveTime, String> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, WIRE_TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| format!("Invalid time '{value}', expected HH:MM"))
}

/// Format a time as `HH:MM`.
pub fn format_wire_time(time: NaiveTime) -> String {
    time.format(WIRE_TIME_FORMAT).to_string()
}

/// serde adapter for `NaiveDate` <-> `"DD-MM-YYYY"`.
pub mod date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_wire_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_wire_date(&raw).map_err(serde::de::Error::custom)
    }

    /// Nullable variant.
    pub mod option {
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(d) => serializer.serialize_str(&crate::dates::format_wire_date(*d)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if !raw.trim().is_empty() => crate::dates::parse_wire_date(&raw)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
                _ => Ok(None),
            }
        }
    }
}

/// serde adapter for `NaiveTime` <-> `"HH:MM"`.
pub mod time_format {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_wire_time(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_wire_time(&raw).map_err(serde::de::Error::custom)
    }

    /// Nullable variant.
    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            time: &Option<NaiveTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(t) => serializer.serialize_str(&crate::dates::format_wire_time(*t)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if !raw.trim().is_empty() => crate::dates::parse_wire_time(&raw)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
                _ => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct DatedWindow {
        #[serde(with = "date_format")]
        date: NaiveDate,
        #[serde(with = "time_format")]
        start: NaiveTime,
        #[serde(default, with = "time_format::option")]
        end: Option<NaiveTime>,
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_day_first_dates() {
        assert_eq!(parse_wire_date("01-08-2025").unwrap(), ymd(2025, 8, 1));
        assert_eq!(parse_wire_date(" 28-07-2025 ").unwrap(), ymd(2025, 7, 28));
    }

    #[test]
    fn rejects_iso_dates() {
        let err = parse_wire_date("2025-08-01").unwrap_err();
        assert!(err.contains("DD-MM-YYYY"));
        assert!(parse_wire_date("32-01-2025").is_err());
    }

    #[test]
    fn times_accept_optional_seconds() {
        let t = NaiveTime::from_hms_opt(13, 0, 0).unwrap();
        assert_eq!(parse_wire_time("13:00").unwrap(), t);
        assert_eq!(parse_wire_time("13:00:00").unwrap(), t);
        assert!(parse_wire_time("25:00").is_err());
        assert!(parse_wire_time("1pm").is_err());
    }

    #[test]
    fn serde_uses_wire_formats() {
        let window = DatedWindow {
            date: ymd(2025, 8, 1),
            start: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            end: None,
        };
        let json = serde_json::to_value(&window).unwrap();
        assert_eq!(json["date"], "01-08-2025");
        assert_eq!(json["start"], "09:30");
        assert!(json["end"].is_null());

        let back: DatedWindow =
            serde_json::from_str(r#"{"date":"01-08-2025","start":"09:30"}"#).unwrap();
        assert_eq!(back, window);
    }

    #[test]
    fn empty_optional_time_is_none() {
        let window: DatedWindow =
            serde_json::from_str(r#"{"date":"01-08-2025","start":"09:30","end":""}"#).unwrap();
        assert_eq!(window.end, None);
    }
}
