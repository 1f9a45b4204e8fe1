//! Default schedule queries
//!
//! At most one row per masjid (UNIQUE on masjid_id). The resolver reads this
//! table when serving "today" with no exact timing row; resolution never
//! writes here — `last_updated` moves only through [`create`] and [`update`].

use chrono::{DateTime, Utc};
use salah_common::db::models::{DefaultSchedule, PrayerTimes};
use salah_common::{time, Result};
use sqlx::SqlitePool;

use super::{bind_times, TIME_COLUMNS};

const SELECT: &str = "SELECT schedule_id, masjid_id, fajr_azan_time, fajr_iqamah_time, \
    dhuhr_azan_time, dhuhr_iqamah_time, asr_azan_time, asr_iqamah_time, maghrib_azan_time, \
    maghrib_iqamah_time, isha_azan_time, isha_iqamah_time, jummah_azan_time, \
    jummah_iqamah_time, last_updated FROM default_schedules";

pub async fn get(pool: &SqlitePool, schedule_id: i64) -> Result<Option<DefaultSchedule>> {
    let sql = format!("{SELECT} WHERE schedule_id = ?");
    let row = sqlx::query(&sql).bind(schedule_id).fetch_optional(pool).await?;
    row.as_ref().map(DefaultSchedule::from_row).transpose()
}

pub async fn get_by_masjid(pool: &SqlitePool, masjid_id: i64) -> Result<Option<DefaultSchedule>> {
    let sql = format!("{SELECT} WHERE masjid_id = ?");
    let row = sqlx::query(&sql).bind(masjid_id).fetch_optional(pool).await?;
    row.as_ref().map(DefaultSchedule::from_row).transpose()
}

pub async fn exists_for_masjid(pool: &SqlitePool, masjid_id: i64) -> Result<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM default_schedules WHERE masjid_id = ?")
            .bind(masjid_id)
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

pub async fn create(
    pool: &SqlitePool,
    masjid_id: i64,
    times: &PrayerTimes,
    now: DateTime<Utc>,
) -> Result<DefaultSchedule> {
    let sql = format!(
        "INSERT INTO default_schedules (masjid_id, {TIME_COLUMNS}, last_updated) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    );
    let query = sqlx::query(&sql).bind(masjid_id);
    let result = bind_times(query, times)
        .bind(time::format_timestamp(now))
        .execute(pool)
        .await?;

    Ok(DefaultSchedule {
        schedule_id: result.last_insert_rowid(),
        masjid_id,
        times: times.clone(),
        last_updated: now,
    })
}

/// Partial update: only supplied fields overwrite; `last_updated` is always
/// refreshed on success
pub async fn update(
    pool: &SqlitePool,
    schedule_id: i64,
    times: &PrayerTimes,
    now: DateTime<Utc>,
) -> Result<Option<DefaultSchedule>> {
    let Some(current) = get(pool, schedule_id).await? else {
        return Ok(None);
    };

    let merged = current.times.merged_with(times);
    let sql = format!(
        "UPDATE default_schedules SET \
         fajr_azan_time = ?, fajr_iqamah_time = ?, dhuhr_azan_time = ?, dhuhr_iqamah_time = ?, \
         asr_azan_time = ?, asr_iqamah_time = ?, maghrib_azan_time = ?, maghrib_iqamah_time = ?, \
         isha_azan_time = ?, isha_iqamah_time = ?, jummah_azan_time = ?, jummah_iqamah_time = ?, \
         last_updated = ? WHERE schedule_id = ?"
    );
    bind_times(sqlx::query(&sql), &merged)
        .bind(time::format_timestamp(now))
        .bind(schedule_id)
        .execute(pool)
        .await?;

    Ok(Some(DefaultSchedule {
        schedule_id,
        masjid_id: current.masjid_id,
        times: merged,
        last_updated: now,
    }))
}

pub async fn delete(pool: &SqlitePool, schedule_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM default_schedules WHERE schedule_id = ?")
        .bind(schedule_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
