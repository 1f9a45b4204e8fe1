//! Special event queries
//!
//! Events are exact-date only: the daily schedule never falls back to an
//! older event list.

use chrono::{NaiveDate, NaiveTime};
use salah_common::db::models::SpecialEvent;
use salah_common::{time, Result};
use sqlx::SqlitePool;

/// Fields for a new event row
#[derive(Debug, Clone)]
pub struct NewSpecialEvent {
    pub masjid_id: i64,
    pub event_name: String,
    pub event_date: NaiveDate,
    pub event_time: Option<NaiveTime>,
    pub description: Option<String>,
}

/// Partial update; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct SpecialEventUpdate {
    pub event_name: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<NaiveTime>,
    pub description: Option<String>,
}

const SELECT: &str = "SELECT event_id, masjid_id, event_name, event_date, event_time, \
    description FROM special_events";

pub async fn get(pool: &SqlitePool, event_id: i64) -> Result<Option<SpecialEvent>> {
    let sql = format!("{SELECT} WHERE event_id = ?");
    let row = sqlx::query(&sql).bind(event_id).fetch_optional(pool).await?;
    row.as_ref().map(SpecialEvent::from_row).transpose()
}

/// Events for one masjid, optionally bounded by date range
pub async fn list_by_masjid(
    pool: &SqlitePool,
    masjid_id: i64,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<Vec<SpecialEvent>> {
    let mut sql = format!("{SELECT} WHERE masjid_id = ?");
    if start_date.is_some() {
        sql.push_str(" AND event_date >= ?");
    }
    if end_date.is_some() {
        sql.push_str(" AND event_date <= ?");
    }
    sql.push_str(" ORDER BY event_date, event_time");

    let mut query = sqlx::query(&sql).bind(masjid_id);
    if let Some(start) = start_date {
        query = query.bind(start.to_string());
    }
    if let Some(end) = end_date {
        query = query.bind(end.to_string());
    }
    let rows = query.fetch_all(pool).await?;
    rows.iter().map(SpecialEvent::from_row).collect()
}

/// Events on exactly one date, for the daily schedule
pub async fn list_for_masjid_on(
    pool: &SqlitePool,
    masjid_id: i64,
    date: NaiveDate,
) -> Result<Vec<SpecialEvent>> {
    let sql = format!("{SELECT} WHERE masjid_id = ? AND event_date = ? ORDER BY event_time");
    let rows = sqlx::query(&sql)
        .bind(masjid_id)
        .bind(date.to_string())
        .fetch_all(pool)
        .await?;
    rows.iter().map(SpecialEvent::from_row).collect()
}

/// Events within [from, to], across all masjids unless one is given
pub async fn upcoming(
    pool: &SqlitePool,
    masjid_id: Option<i64>,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<SpecialEvent>> {
    let mut sql = format!("{SELECT} WHERE event_date >= ? AND event_date <= ?");
    if masjid_id.is_some() {
        sql.push_str(" AND masjid_id = ?");
    }
    sql.push_str(" ORDER BY event_date, event_time");

    let mut query = sqlx::query(&sql).bind(from.to_string()).bind(to.to_string());
    if let Some(id) = masjid_id {
        query = query.bind(id);
    }
    let rows = query.fetch_all(pool).await?;
    rows.iter().map(SpecialEvent::from_row).collect()
}

pub async fn create(pool: &SqlitePool, event: &NewSpecialEvent) -> Result<SpecialEvent> {
    let result = sqlx::query(
        "INSERT INTO special_events (masjid_id, event_name, event_date, event_time, description) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(event.masjid_id)
    .bind(&event.event_name)
    .bind(event.event_date.to_string())
    .bind(time::to_hhmm(event.event_time))
    .bind(&event.description)
    .execute(pool)
    .await?;

    Ok(SpecialEvent {
        event_id: result.last_insert_rowid(),
        masjid_id: event.masjid_id,
        event_name: event.event_name.clone(),
        event_date: event.event_date,
        event_time: event.event_time,
        description: event.description.clone(),
    })
}

pub async fn update(
    pool: &SqlitePool,
    event_id: i64,
    update: &SpecialEventUpdate,
) -> Result<Option<SpecialEvent>> {
    let Some(current) = get(pool, event_id).await? else {
        return Ok(None);
    };

    let merged = SpecialEvent {
        event_id,
        masjid_id: current.masjid_id,
        event_name: update.event_name.clone().unwrap_or(current.event_name),
        event_date: update.event_date.unwrap_or(current.event_date),
        event_time: update.event_time.or(current.event_time),
        description: update.description.clone().or(current.description),
    };

    sqlx::query(
        "UPDATE special_events SET event_name = ?, event_date = ?, event_time = ?, \
         description = ? WHERE event_id = ?",
    )
    .bind(&merged.event_name)
    .bind(merged.event_date.to_string())
    .bind(time::to_hhmm(merged.event_time))
    .bind(&merged.description)
    .bind(event_id)
    .execute(pool)
    .await?;

    Ok(Some(merged))
}

pub async fn delete(pool: &SqlitePool, event_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM special_events WHERE event_id = ?")
        .bind(event_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::masjids::test_support::seed_masjid;

    fn date(raw: &str) -> NaiveDate {
        raw.parse().unwrap()
    }

    async fn seed_event(pool: &SqlitePool, masjid_id: i64, name: &str, day: &str) -> SpecialEvent {
        create(
            pool,
            &NewSpecialEvent {
                masjid_id,
                event_name: name.to_string(),
                event_date: date(day),
                event_time: None,
                description: None,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_exact_date_listing_only() {
        let pool = salah_common::db::connect_memory().await.unwrap();
        let masjid_id = seed_masjid(&pool, "M").await;
        seed_event(&pool, masjid_id, "Eid Prayer", "2024-04-10").await;
        seed_event(&pool, masjid_id, "Lecture", "2024-04-11").await;

        let on_eid = list_for_masjid_on(&pool, masjid_id, date("2024-04-10"))
            .await
            .unwrap();
        assert_eq!(on_eid.len(), 1);
        assert_eq!(on_eid[0].event_name, "Eid Prayer");

        // No fallback to nearby dates
        let empty = list_for_masjid_on(&pool, masjid_id, date("2024-04-12"))
            .await
            .unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_upcoming_window_and_masjid_filter() {
        let pool = salah_common::db::connect_memory().await.unwrap();
        let masjid_id = seed_masjid(&pool, "M").await;
        let other_id = seed_masjid(&pool, "N").await;
        seed_event(&pool, masjid_id, "Soon", "2024-04-05").await;
        seed_event(&pool, masjid_id, "Far", "2024-06-01").await;
        seed_event(&pool, other_id, "Elsewhere", "2024-04-06").await;

        let window = upcoming(&pool, None, date("2024-04-01"), date("2024-05-01"))
            .await
            .unwrap();
        assert_eq!(window.len(), 2);

        let only_m = upcoming(&pool, Some(masjid_id), date("2024-04-01"), date("2024-05-01"))
            .await
            .unwrap();
        assert_eq!(only_m.len(), 1);
        assert_eq!(only_m[0].event_name, "Soon");
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let pool = salah_common::db::connect_memory().await.unwrap();
        let masjid_id = seed_masjid(&pool, "M").await;
        let event = seed_event(&pool, masjid_id, "Lecture", "2024-04-11").await;

        let updated = update(
            &pool,
            event.event_id,
            &SpecialEventUpdate {
                event_time: NaiveTime::from_hms_opt(19, 30, 0),
                ..SpecialEventUpdate::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.event_name, "Lecture");
        assert_eq!(updated.event_time, NaiveTime::from_hms_opt(19, 30, 0));
    }
}
