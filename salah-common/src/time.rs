//! Date and time-of-day utilities
//!
//! All calendar dates travel as `YYYY-MM-DD` and all times of day as `HH:MM`
//! (no date, no timezone). Timestamps (`last_updated`) are UTC, stored as
//! RFC 3339 text.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};

use crate::{Error, Result};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current calendar day in the server's local timezone.
///
/// Read once at the HTTP boundary; the resolver takes "today" as an explicit
/// parameter so tests can pin it.
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse a calendar date from `YYYY-MM-DD`
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| Error::InvalidInput(format!("Invalid date: {raw} (expected YYYY-MM-DD)")))
}

/// Parse a time of day from `HH:MM` (seconds tolerated and dropped)
pub fn parse_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| Error::InvalidInput(format!("Invalid time: {raw} (expected HH:MM)")))
}

/// Format a time of day as `HH:MM`
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Optional time of day to its stored/wire representation
pub fn to_hhmm(time: Option<NaiveTime>) -> Option<String> {
    time.map(format_time)
}

/// Format a UTC timestamp for storage
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored UTC timestamp
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| Error::Internal(format!("Invalid stored timestamp: {raw}")))
}

/// Serde adapter for `Option<NaiveTime>` fields carried as `HH:MM` strings
pub mod hhmm_opt {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_some(&super::format_time(*time)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(text) => super::parse_time(&text)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_valid() {
        let date = parse_date("2024-03-15").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("15/03/2024").is_err());
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("today").is_err());
    }

    #[test]
    fn test_parse_time_hhmm() {
        let time = parse_time("05:30").unwrap();
        assert_eq!(time, NaiveTime::from_hms_opt(5, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_time_tolerates_seconds() {
        let time = parse_time("13:45:20").unwrap();
        assert_eq!(time, NaiveTime::from_hms_opt(13, 45, 20).unwrap());
    }

    #[test]
    fn test_parse_time_rejects_garbage() {
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("noon").is_err());
    }

    #[test]
    fn test_format_time_drops_seconds() {
        let time = NaiveTime::from_hms_opt(5, 7, 33).unwrap();
        assert_eq!(format_time(time), "05:07");
    }

    #[test]
    fn test_timestamp_round_trip() {
        let ts = now();
        let parsed = parse_timestamp(&format_timestamp(ts)).unwrap();
        // Micros precision is preserved
        assert_eq!(parsed.timestamp_micros(), ts.timestamp_micros());
    }

    #[test]
    fn test_hhmm_opt_serde() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Wrapper {
            #[serde(default, with = "hhmm_opt")]
            time: Option<NaiveTime>,
        }

        let json = serde_json::to_string(&Wrapper {
            time: NaiveTime::from_hms_opt(18, 5, 0),
        })
        .unwrap();
        assert_eq!(json, r#"{"time":"18:05"}"#);

        let back: Wrapper = serde_json::from_str(r#"{"time":"18:05"}"#).unwrap();
        assert_eq!(back.time, NaiveTime::from_hms_opt(18, 5, 0));

        let absent: Wrapper = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.time, None);

        let null: Wrapper = serde_json::from_str(r#"{"time":null}"#).unwrap();
        assert_eq!(null.time, None);
    }
}
