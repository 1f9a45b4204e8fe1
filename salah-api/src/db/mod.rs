//! Database access layer for salah-api
//!
//! One module per table, hand-written queries over the shared pool. Row
//! mapping lives with the models in `salah_common::db::models`.

pub mod additional;
pub mod default_schedules;
pub mod events;
pub mod locations;
pub mod masjids;
pub mod timings;

use salah_common::db::models::PrayerTimes;
use salah_common::time;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};

/// Bind the twelve prayer-time columns in declaration order
pub(crate) fn bind_times<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    times: &PrayerTimes,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    query
        .bind(time::to_hhmm(times.fajr_azan_time))
        .bind(time::to_hhmm(times.fajr_iqamah_time))
        .bind(time::to_hhmm(times.dhuhr_azan_time))
        .bind(time::to_hhmm(times.dhuhr_iqamah_time))
        .bind(time::to_hhmm(times.asr_azan_time))
        .bind(time::to_hhmm(times.asr_iqamah_time))
        .bind(time::to_hhmm(times.maghrib_azan_time))
        .bind(time::to_hhmm(times.maghrib_iqamah_time))
        .bind(time::to_hhmm(times.isha_azan_time))
        .bind(time::to_hhmm(times.isha_iqamah_time))
        .bind(time::to_hhmm(times.jummah_azan_time))
        .bind(time::to_hhmm(times.jummah_iqamah_time))
}

/// Column list matching [`bind_times`] order
pub(crate) const TIME_COLUMNS: &str = "fajr_azan_time, fajr_iqamah_time, \
    dhuhr_azan_time, dhuhr_iqamah_time, asr_azan_time, asr_iqamah_time, \
    maghrib_azan_time, maghrib_iqamah_time, isha_azan_time, isha_iqamah_time, \
    jummah_azan_time, jummah_iqamah_time";
