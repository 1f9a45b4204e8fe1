//! Salah timing queries
//!
//! One row per masjid and date. Besides the CRUD surface this module carries
//! the two lookups the schedule resolver is built from: the exact-date match
//! and the masjid's latest row by date.

use chrono::NaiveDate;
use salah_common::db::models::{PrayerTimes, SalahTiming};
use salah_common::{Error, Result};
use sqlx::SqlitePool;

use super::{bind_times, TIME_COLUMNS};
use crate::pagination::PageWindow;

/// Fields for a new timing row
#[derive(Debug, Clone)]
pub struct NewSalahTiming {
    pub masjid_id: i64,
    pub date: NaiveDate,
    pub islamic_date: Option<String>,
    pub times: PrayerTimes,
}

/// Partial update; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct SalahTimingUpdate {
    pub date: Option<NaiveDate>,
    pub islamic_date: Option<String>,
    pub times: PrayerTimes,
}

const SELECT: &str = "SELECT salah_id, masjid_id, date, islamic_date, fajr_azan_time, \
    fajr_iqamah_time, dhuhr_azan_time, dhuhr_iqamah_time, asr_azan_time, asr_iqamah_time, \
    maghrib_azan_time, maghrib_iqamah_time, isha_azan_time, isha_iqamah_time, \
    jummah_azan_time, jummah_iqamah_time FROM salah_timings";

pub async fn get(pool: &SqlitePool, salah_id: i64) -> Result<Option<SalahTiming>> {
    let sql = format!("{SELECT} WHERE salah_id = ?");
    let row = sqlx::query(&sql).bind(salah_id).fetch_optional(pool).await?;
    row.as_ref().map(SalahTiming::from_row).transpose()
}

/// Exact (masjid, date) lookup — resolver step 1
pub async fn get_by_masjid_and_date(
    pool: &SqlitePool,
    masjid_id: i64,
    date: NaiveDate,
) -> Result<Option<SalahTiming>> {
    let sql = format!("{SELECT} WHERE masjid_id = ? AND date = ?");
    let row = sqlx::query(&sql)
        .bind(masjid_id)
        .bind(date.to_string())
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(SalahTiming::from_row).transpose()
}

/// The masjid's most recent row by date, regardless of the query date —
/// resolver step 3
pub async fn latest_for_masjid(pool: &SqlitePool, masjid_id: i64) -> Result<Option<SalahTiming>> {
    let sql = format!("{SELECT} WHERE masjid_id = ? ORDER BY date DESC LIMIT 1");
    let row = sqlx::query(&sql).bind(masjid_id).fetch_optional(pool).await?;
    row.as_ref().map(SalahTiming::from_row).transpose()
}

/// Paged listing with optional masjid and date filters, newest dates first
pub async fn list(
    pool: &SqlitePool,
    window: PageWindow,
    masjid_id: Option<i64>,
    date: Option<NaiveDate>,
) -> Result<(Vec<SalahTiming>, i64)> {
    let mut clauses = Vec::new();
    if masjid_id.is_some() {
        clauses.push("masjid_id = ?");
    }
    if date.is_some() {
        clauses.push("date = ?");
    }
    let filter = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM salah_timings{filter}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(id) = masjid_id {
        count_query = count_query.bind(id);
    }
    if let Some(day) = date {
        count_query = count_query.bind(day.to_string());
    }
    let total = count_query.fetch_one(pool).await?;

    let list_sql = format!("{SELECT}{filter} ORDER BY date DESC LIMIT ? OFFSET ?");
    let mut list_query = sqlx::query(&list_sql);
    if let Some(id) = masjid_id {
        list_query = list_query.bind(id);
    }
    if let Some(day) = date {
        list_query = list_query.bind(day.to_string());
    }
    let rows = list_query
        .bind(window.page_size)
        .bind(window.offset)
        .fetch_all(pool)
        .await?;

    let timings = rows.iter().map(SalahTiming::from_row).collect::<Result<_>>()?;
    Ok((timings, total))
}

/// All rows for a masjid within an optional date range, oldest first
pub async fn list_by_masjid(
    pool: &SqlitePool,
    masjid_id: i64,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<Vec<SalahTiming>> {
    let mut sql = format!("{SELECT} WHERE masjid_id = ?");
    if start_date.is_some() {
        sql.push_str(" AND date >= ?");
    }
    if end_date.is_some() {
        sql.push_str(" AND date <= ?");
    }
    sql.push_str(" ORDER BY date");

    let mut query = sqlx::query(&sql).bind(masjid_id);
    if let Some(start) = start_date {
        query = query.bind(start.to_string());
    }
    if let Some(end) = end_date {
        query = query.bind(end.to_string());
    }
    let rows = query.fetch_all(pool).await?;
    rows.iter().map(SalahTiming::from_row).collect()
}

pub async fn exists(pool: &SqlitePool, masjid_id: i64, date: NaiveDate) -> Result<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM salah_timings WHERE masjid_id = ? AND date = ?")
            .bind(masjid_id)
            .bind(date.to_string())
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

pub async fn create(pool: &SqlitePool, timing: &NewSalahTiming) -> Result<SalahTiming> {
    let sql = format!(
        "INSERT INTO salah_timings (masjid_id, date, islamic_date, {TIME_COLUMNS}) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    );
    let query = sqlx::query(&sql)
        .bind(timing.masjid_id)
        .bind(timing.date.to_string())
        .bind(&timing.islamic_date);
    let result = bind_times(query, &timing.times).execute(pool).await?;

    Ok(SalahTiming {
        salah_id: result.last_insert_rowid(),
        masjid_id: timing.masjid_id,
        date: timing.date,
        islamic_date: timing.islamic_date.clone(),
        times: timing.times.clone(),
    })
}

/// Insert one row per date over an inclusive range, skipping dates that
/// already have a row. Returns the number of rows actually created.
pub async fn create_range(
    pool: &SqlitePool,
    masjid_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    times: &PrayerTimes,
) -> Result<i64> {
    if end_date < start_date {
        return Err(Error::InvalidInput(
            "End date must not be before start date".to_string(),
        ));
    }

    let sql = format!(
        "INSERT INTO salah_timings (masjid_id, date, {TIME_COLUMNS}) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
         ON CONFLICT(masjid_id, date) DO NOTHING"
    );

    let mut inserted = 0;
    let mut date = start_date;
    loop {
        let query = sqlx::query(&sql).bind(masjid_id).bind(date.to_string());
        let result = bind_times(query, times).execute(pool).await?;
        inserted += result.rows_affected() as i64;

        if date >= end_date {
            break;
        }
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    Ok(inserted)
}

pub async fn update(
    pool: &SqlitePool,
    salah_id: i64,
    update: &SalahTimingUpdate,
) -> Result<Option<SalahTiming>> {
    let Some(current) = get(pool, salah_id).await? else {
        return Ok(None);
    };

    let merged = SalahTiming {
        salah_id,
        masjid_id: current.masjid_id,
        date: update.date.unwrap_or(current.date),
        islamic_date: update.islamic_date.clone().or(current.islamic_date),
        times: current.times.merged_with(&update.times),
    };

    let sql = format!(
        "UPDATE salah_timings SET date = ?, islamic_date = ?, \
         fajr_azan_time = ?, fajr_iqamah_time = ?, dhuhr_azan_time = ?, dhuhr_iqamah_time = ?, \
         asr_azan_time = ?, asr_iqamah_time = ?, maghrib_azan_time = ?, maghrib_iqamah_time = ?, \
         isha_azan_time = ?, isha_iqamah_time = ?, jummah_azan_time = ?, jummah_iqamah_time = ? \
         WHERE salah_id = ?"
    );
    let query = sqlx::query(&sql)
        .bind(merged.date.to_string())
        .bind(&merged.islamic_date);
    bind_times(query, &merged.times)
        .bind(salah_id)
        .execute(pool)
        .await?;

    Ok(Some(merged))
}

pub async fn delete(pool: &SqlitePool, salah_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM salah_timings WHERE salah_id = ?")
        .bind(salah_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
