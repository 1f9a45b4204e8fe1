//! Database models
//!
//! Row structs plus their manual `from_row` mappings. Serde derives target
//! the PascalCase wire format, so most rows serialize straight into response
//! payloads.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::time;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct State {
    pub state_id: i64,
    pub state_name: String,
}

impl State {
    pub fn from_row(row: &SqliteRow) -> Result<Self> {
        Ok(Self {
            state_id: row.try_get("state_id")?,
            state_name: row.try_get("state_name")?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct City {
    pub city_id: i64,
    pub city_name: String,
    pub state_id: i64,
}

impl City {
    pub fn from_row(row: &SqliteRow) -> Result<Self> {
        Ok(Self {
            city_id: row.try_get("city_id")?,
            city_name: row.try_get("city_name")?,
            state_id: row.try_get("state_id")?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Masjid {
    pub masjid_id: i64,
    pub masjid_name: String,
    pub address: String,
    pub city_id: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact_number: Option<String>,
    pub imam_name: Option<String>,
}

impl Masjid {
    pub fn from_row(row: &SqliteRow) -> Result<Self> {
        Ok(Self {
            masjid_id: row.try_get("masjid_id")?,
            masjid_name: row.try_get("masjid_name")?,
            address: row.try_get("address")?,
            city_id: row.try_get("city_id")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            contact_number: row.try_get("contact_number")?,
            imam_name: row.try_get("imam_name")?,
        })
    }
}

/// The six azan/iqamah pairs plus optional Jummah
///
/// Shared by per-date timing records, the default schedule and their
/// request/response types; `#[serde(flatten)]` keeps the wire shape flat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrayerTimes {
    #[serde(default, with = "time::hhmm_opt")]
    pub fajr_azan_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub fajr_iqamah_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub dhuhr_azan_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub dhuhr_iqamah_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub asr_azan_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub asr_iqamah_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub maghrib_azan_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub maghrib_iqamah_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub isha_azan_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub isha_iqamah_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub jummah_azan_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub jummah_iqamah_time: Option<NaiveTime>,
}

impl PrayerTimes {
    pub fn from_row(row: &SqliteRow) -> Result<Self> {
        Ok(Self {
            fajr_azan_time: read_time(row, "fajr_azan_time")?,
            fajr_iqamah_time: read_time(row, "fajr_iqamah_time")?,
            dhuhr_azan_time: read_time(row, "dhuhr_azan_time")?,
            dhuhr_iqamah_time: read_time(row, "dhuhr_iqamah_time")?,
            asr_azan_time: read_time(row, "asr_azan_time")?,
            asr_iqamah_time: read_time(row, "asr_iqamah_time")?,
            maghrib_azan_time: read_time(row, "maghrib_azan_time")?,
            maghrib_iqamah_time: read_time(row, "maghrib_iqamah_time")?,
            isha_azan_time: read_time(row, "isha_azan_time")?,
            isha_iqamah_time: read_time(row, "isha_iqamah_time")?,
            jummah_azan_time: read_time(row, "jummah_azan_time")?,
            jummah_iqamah_time: read_time(row, "jummah_iqamah_time")?,
        })
    }

    /// Partial-update merge: fields supplied in `update` overwrite, the rest
    /// keep their current values
    pub fn merged_with(&self, update: &PrayerTimes) -> PrayerTimes {
        PrayerTimes {
            fajr_azan_time: update.fajr_azan_time.or(self.fajr_azan_time),
            fajr_iqamah_time: update.fajr_iqamah_time.or(self.fajr_iqamah_time),
            dhuhr_azan_time: update.dhuhr_azan_time.or(self.dhuhr_azan_time),
            dhuhr_iqamah_time: update.dhuhr_iqamah_time.or(self.dhuhr_iqamah_time),
            asr_azan_time: update.asr_azan_time.or(self.asr_azan_time),
            asr_iqamah_time: update.asr_iqamah_time.or(self.asr_iqamah_time),
            maghrib_azan_time: update.maghrib_azan_time.or(self.maghrib_azan_time),
            maghrib_iqamah_time: update.maghrib_iqamah_time.or(self.maghrib_iqamah_time),
            isha_azan_time: update.isha_azan_time.or(self.isha_azan_time),
            isha_iqamah_time: update.isha_iqamah_time.or(self.isha_iqamah_time),
            jummah_azan_time: update.jummah_azan_time.or(self.jummah_azan_time),
            jummah_iqamah_time: update.jummah_iqamah_time.or(self.jummah_iqamah_time),
        }
    }
}

/// Prayer timing actually recorded for one masjid and date
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SalahTiming {
    pub salah_id: i64,
    pub masjid_id: i64,
    pub date: NaiveDate,
    pub islamic_date: Option<String>,
    #[serde(flatten)]
    pub times: PrayerTimes,
}

impl SalahTiming {
    pub fn from_row(row: &SqliteRow) -> Result<Self> {
        Ok(Self {
            salah_id: row.try_get("salah_id")?,
            masjid_id: row.try_get("masjid_id")?,
            date: read_date(row, "date")?,
            islamic_date: row.try_get("islamic_date")?,
            times: PrayerTimes::from_row(row)?,
        })
    }
}

/// Per-masjid template used as the fallback for the current day
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DefaultSchedule {
    pub schedule_id: i64,
    pub masjid_id: i64,
    #[serde(flatten)]
    pub times: PrayerTimes,
    pub last_updated: DateTime<Utc>,
}

impl DefaultSchedule {
    pub fn from_row(row: &SqliteRow) -> Result<Self> {
        let raw_updated: String = row.try_get("last_updated")?;
        Ok(Self {
            schedule_id: row.try_get("schedule_id")?,
            masjid_id: row.try_get("masjid_id")?,
            times: PrayerTimes::from_row(row)?,
            last_updated: time::parse_timestamp(&raw_updated)?,
        })
    }
}

/// Sunrise/sunset-class timings for one masjid and date
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdditionalTimings {
    pub additional_id: i64,
    pub masjid_id: i64,
    pub date: NaiveDate,
    #[serde(default, with = "time::hhmm_opt")]
    pub sunrise_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub sunset_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub zawal_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub tahajjud_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub sehri_end_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub iftar_time: Option<NaiveTime>,
}

impl AdditionalTimings {
    pub fn from_row(row: &SqliteRow) -> Result<Self> {
        Ok(Self {
            additional_id: row.try_get("additional_id")?,
            masjid_id: row.try_get("masjid_id")?,
            date: read_date(row, "date")?,
            sunrise_time: read_time(row, "sunrise_time")?,
            sunset_time: read_time(row, "sunset_time")?,
            zawal_time: read_time(row, "zawal_time")?,
            tahajjud_time: read_time(row, "tahajjud_time")?,
            sehri_end_time: read_time(row, "sehri_end_time")?,
            iftar_time: read_time(row, "iftar_time")?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpecialEvent {
    pub event_id: i64,
    pub masjid_id: i64,
    pub event_name: String,
    pub event_date: NaiveDate,
    #[serde(default, with = "time::hhmm_opt")]
    pub event_time: Option<NaiveTime>,
    pub description: Option<String>,
}

impl SpecialEvent {
    pub fn from_row(row: &SqliteRow) -> Result<Self> {
        Ok(Self {
            event_id: row.try_get("event_id")?,
            masjid_id: row.try_get("masjid_id")?,
            event_name: row.try_get("event_name")?,
            event_date: read_date(row, "event_date")?,
            event_time: read_time(row, "event_time")?,
            description: row.try_get("description")?,
        })
    }
}

fn read_date(row: &SqliteRow, column: &str) -> Result<NaiveDate> {
    let raw: String = row.try_get(column)?;
    time::parse_date(&raw)
}

fn read_time(row: &SqliteRow, column: &str) -> Result<Option<NaiveTime>> {
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|text| time::parse_time(&text)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    #[test]
    fn test_merged_with_only_overwrites_supplied_fields() {
        let current = PrayerTimes {
            fajr_azan_time: t(5, 30),
            fajr_iqamah_time: t(5, 45),
            isha_azan_time: t(20, 0),
            ..PrayerTimes::default()
        };
        let update = PrayerTimes {
            fajr_azan_time: t(5, 15),
            ..PrayerTimes::default()
        };

        let merged = current.merged_with(&update);
        assert_eq!(merged.fajr_azan_time, t(5, 15));
        assert_eq!(merged.fajr_iqamah_time, t(5, 45));
        assert_eq!(merged.isha_azan_time, t(20, 0));
        assert_eq!(merged.dhuhr_azan_time, None);
    }

    #[test]
    fn test_prayer_times_flatten_on_the_wire() {
        let timing = SalahTiming {
            salah_id: 1,
            masjid_id: 2,
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            islamic_date: Some("5 Ramadan 1445".to_string()),
            times: PrayerTimes {
                fajr_azan_time: t(5, 30),
                ..PrayerTimes::default()
            },
        };

        let json = serde_json::to_value(&timing).unwrap();
        assert_eq!(json["SalahId"], 1);
        assert_eq!(json["Date"], "2024-03-15");
        assert_eq!(json["IslamicDate"], "5 Ramadan 1445");
        // Flattened, not nested
        assert_eq!(json["FajrAzanTime"], "05:30");
        assert_eq!(json["DhuhrAzanTime"], serde_json::Value::Null);
        assert!(json.get("Times").is_none());
    }
}
