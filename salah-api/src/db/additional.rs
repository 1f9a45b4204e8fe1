//! Daily additional timing queries (sunrise/sunset-class fields)
//!
//! Same (masjid, date) uniqueness as salah timings. There is no default
//! table for these; the aggregator's fallback is exact match, else the
//! masjid's latest row.

use chrono::{NaiveDate, NaiveTime};
use salah_common::db::models::AdditionalTimings;
use salah_common::{time, Result};
use sqlx::SqlitePool;

use crate::pagination::PageWindow;

/// Fields for a new row
#[derive(Debug, Clone, Default)]
pub struct NewAdditionalTimings {
    pub masjid_id: i64,
    pub date: NaiveDate,
    pub sunrise_time: Option<NaiveTime>,
    pub sunset_time: Option<NaiveTime>,
    pub zawal_time: Option<NaiveTime>,
    pub tahajjud_time: Option<NaiveTime>,
    pub sehri_end_time: Option<NaiveTime>,
    pub iftar_time: Option<NaiveTime>,
}

/// Partial update; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct AdditionalTimingsUpdate {
    pub date: Option<NaiveDate>,
    pub sunrise_time: Option<NaiveTime>,
    pub sunset_time: Option<NaiveTime>,
    pub zawal_time: Option<NaiveTime>,
    pub tahajjud_time: Option<NaiveTime>,
    pub sehri_end_time: Option<NaiveTime>,
    pub iftar_time: Option<NaiveTime>,
}

const SELECT: &str = "SELECT additional_id, masjid_id, date, sunrise_time, sunset_time, \
    zawal_time, tahajjud_time, sehri_end_time, iftar_time FROM daily_additional_timings";

pub async fn get(pool: &SqlitePool, additional_id: i64) -> Result<Option<AdditionalTimings>> {
    let sql = format!("{SELECT} WHERE additional_id = ?");
    let row = sqlx::query(&sql).bind(additional_id).fetch_optional(pool).await?;
    row.as_ref().map(AdditionalTimings::from_row).transpose()
}

pub async fn get_by_masjid_and_date(
    pool: &SqlitePool,
    masjid_id: i64,
    date: NaiveDate,
) -> Result<Option<AdditionalTimings>> {
    let sql = format!("{SELECT} WHERE masjid_id = ? AND date = ?");
    let row = sqlx::query(&sql)
        .bind(masjid_id)
        .bind(date.to_string())
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(AdditionalTimings::from_row).transpose()
}

/// The masjid's most recent row by date
pub async fn latest_for_masjid(
    pool: &SqlitePool,
    masjid_id: i64,
) -> Result<Option<AdditionalTimings>> {
    let sql = format!("{SELECT} WHERE masjid_id = ? ORDER BY date DESC LIMIT 1");
    let row = sqlx::query(&sql).bind(masjid_id).fetch_optional(pool).await?;
    row.as_ref().map(AdditionalTimings::from_row).transpose()
}

/// Paged listing with optional masjid filter, newest dates first
pub async fn list(
    pool: &SqlitePool,
    window: PageWindow,
    masjid_id: Option<i64>,
) -> Result<(Vec<AdditionalTimings>, i64)> {
    let filter = if masjid_id.is_some() { " WHERE masjid_id = ?" } else { "" };

    let count_sql = format!("SELECT COUNT(*) FROM daily_additional_timings{filter}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(id) = masjid_id {
        count_query = count_query.bind(id);
    }
    let total = count_query.fetch_one(pool).await?;

    let list_sql = format!("{SELECT}{filter} ORDER BY date DESC LIMIT ? OFFSET ?");
    let mut list_query = sqlx::query(&list_sql);
    if let Some(id) = masjid_id {
        list_query = list_query.bind(id);
    }
    let rows = list_query
        .bind(window.page_size)
        .bind(window.offset)
        .fetch_all(pool)
        .await?;

    let timings = rows
        .iter()
        .map(AdditionalTimings::from_row)
        .collect::<Result<_>>()?;
    Ok((timings, total))
}

pub async fn exists(pool: &SqlitePool, masjid_id: i64, date: NaiveDate) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM daily_additional_timings WHERE masjid_id = ? AND date = ?",
    )
    .bind(masjid_id)
    .bind(date.to_string())
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

pub async fn create(
    pool: &SqlitePool,
    timings: &NewAdditionalTimings,
) -> Result<AdditionalTimings> {
    let result = sqlx::query(
        "INSERT INTO daily_additional_timings (masjid_id, date, sunrise_time, sunset_time, \
         zawal_time, tahajjud_time, sehri_end_time, iftar_time) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(timings.masjid_id)
    .bind(timings.date.to_string())
    .bind(time::to_hhmm(timings.sunrise_time))
    .bind(time::to_hhmm(timings.sunset_time))
    .bind(time::to_hhmm(timings.zawal_time))
    .bind(time::to_hhmm(timings.tahajjud_time))
    .bind(time::to_hhmm(timings.sehri_end_time))
    .bind(time::to_hhmm(timings.iftar_time))
    .execute(pool)
    .await?;

    Ok(AdditionalTimings {
        additional_id: result.last_insert_rowid(),
        masjid_id: timings.masjid_id,
        date: timings.date,
        sunrise_time: timings.sunrise_time,
        sunset_time: timings.sunset_time,
        zawal_time: timings.zawal_time,
        tahajjud_time: timings.tahajjud_time,
        sehri_end_time: timings.sehri_end_time,
        iftar_time: timings.iftar_time,
    })
}

pub async fn update(
    pool: &SqlitePool,
    additional_id: i64,
    update: &AdditionalTimingsUpdate,
) -> Result<Option<AdditionalTimings>> {
    let Some(current) = get(pool, additional_id).await? else {
        return Ok(None);
    };

    let merged = AdditionalTimings {
        additional_id,
        masjid_id: current.masjid_id,
        date: update.date.unwrap_or(current.date),
        sunrise_time: update.sunrise_time.or(current.sunrise_time),
        sunset_time: update.sunset_time.or(current.sunset_time),
        zawal_time: update.zawal_time.or(current.zawal_time),
        tahajjud_time: update.tahajjud_time.or(current.tahajjud_time),
        sehri_end_time: update.sehri_end_time.or(current.sehri_end_time),
        iftar_time: update.iftar_time.or(current.iftar_time),
    };

    sqlx::query(
        "UPDATE daily_additional_timings SET date = ?, sunrise_time = ?, sunset_time = ?, \
         zawal_time = ?, tahajjud_time = ?, sehri_end_time = ?, iftar_time = ? \
         WHERE additional_id = ?",
    )
    .bind(merged.date.to_string())
    .bind(time::to_hhmm(merged.sunrise_time))
    .bind(time::to_hhmm(merged.sunset_time))
    .bind(time::to_hhmm(merged.zawal_time))
    .bind(time::to_hhmm(merged.tahajjud_time))
    .bind(time::to_hhmm(merged.sehri_end_time))
    .bind(time::to_hhmm(merged.iftar_time))
    .bind(additional_id)
    .execute(pool)
    .await?;

    Ok(Some(merged))
}

pub async fn delete(pool: &SqlitePool, additional_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM daily_additional_timings WHERE additional_id = ?")
        .bind(additional_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
