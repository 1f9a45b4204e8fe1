//! Daily schedule aggregation
//!
//! Combines the resolved prayer timing, the day's additional timings and the
//! day's special events into one view. Only a missing masjid is an error;
//! a masjid with no data yields an empty-but-successful schedule.

use chrono::NaiveDate;
use salah_common::db::models::{AdditionalTimings, SpecialEvent};
use salah_common::Result;
use sqlx::SqlitePool;

use crate::db;
use crate::db::masjids::MasjidSummary;

use super::resolver::{resolve_timing, ResolvedTiming};

/// Everything to show for one masjid and date
#[derive(Debug, Clone)]
pub struct DailySchedule {
    pub date: NaiveDate,
    /// Copied from the resolved timing's free-text Islamic date, when present
    pub islamic_date: Option<String>,
    pub masjid: MasjidSummary,
    pub timing: Option<ResolvedTiming>,
    pub additional_timings: Option<AdditionalTimings>,
    pub special_events: Vec<SpecialEvent>,
}

/// Assemble the daily schedule for `masjid_id` on `date`
///
/// Returns `None` when the masjid does not exist. Additional timings use the
/// exact-else-latest fallback with no today gate and no default tier; events
/// match the exact date only.
pub async fn daily_schedule(
    pool: &SqlitePool,
    masjid_id: i64,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<Option<DailySchedule>> {
    let Some(masjid) = db::masjids::get_summary(pool, masjid_id).await? else {
        return Ok(None);
    };

    let timing = resolve_timing(pool, masjid_id, date, today).await?;

    let additional_timings =
        match db::additional::get_by_masjid_and_date(pool, masjid_id, date).await? {
            Some(exact) => Some(exact),
            None => db::additional::latest_for_masjid(pool, masjid_id).await?,
        };

    let special_events = db::events::list_for_masjid_on(pool, masjid_id, date).await?;

    let islamic_date = timing.as_ref().and_then(|t| t.islamic_date.clone());

    Ok(Some(DailySchedule {
        date,
        islamic_date,
        masjid,
        timing,
        additional_timings,
        special_events,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::additional::NewAdditionalTimings;
    use crate::db::events::NewSpecialEvent;
    use crate::db::masjids::test_support::seed_masjid;
    use crate::db::timings::NewSalahTiming;
    use crate::schedule::TimingSource;
    use salah_common::db::models::PrayerTimes;
    use chrono::NaiveTime;

    fn date(raw: &str) -> NaiveDate {
        raw.parse().unwrap()
    }

    #[tokio::test]
    async fn test_missing_masjid_is_none() {
        let pool = salah_common::db::connect_memory().await.unwrap();
        let today = date("2024-03-20");
        let schedule = daily_schedule(&pool, 999, today, today).await.unwrap();
        assert!(schedule.is_none());
    }

    #[tokio::test]
    async fn test_empty_masjid_yields_empty_schedule() {
        let pool = salah_common::db::connect_memory().await.unwrap();
        let masjid_id = seed_masjid(&pool, "M").await;
        let today = date("2024-03-20");

        let schedule = daily_schedule(&pool, masjid_id, today, today)
            .await
            .unwrap()
            .unwrap();
        assert!(schedule.timing.is_none());
        assert!(schedule.additional_timings.is_none());
        assert!(schedule.special_events.is_empty());
        assert!(schedule.islamic_date.is_none());
        assert_eq!(schedule.masjid.masjid_id, masjid_id);
    }

    #[tokio::test]
    async fn test_full_day_assembly() {
        let pool = salah_common::db::connect_memory().await.unwrap();
        let masjid_id = seed_masjid(&pool, "M").await;
        let today = date("2024-03-20");

        db::timings::create(
            &pool,
            &NewSalahTiming {
                masjid_id,
                date: today,
                islamic_date: Some("10 Ramadan 1445".to_string()),
                times: PrayerTimes {
                    fajr_azan_time: NaiveTime::from_hms_opt(5, 30, 0),
                    ..PrayerTimes::default()
                },
            },
        )
        .await
        .unwrap();

        db::additional::create(
            &pool,
            &NewAdditionalTimings {
                masjid_id,
                date: today,
                iftar_time: NaiveTime::from_hms_opt(18, 40, 0),
                ..NewAdditionalTimings::default()
            },
        )
        .await
        .unwrap();

        db::events::create(
            &pool,
            &NewSpecialEvent {
                masjid_id,
                event_name: "Taraweeh".to_string(),
                event_date: today,
                event_time: NaiveTime::from_hms_opt(21, 0, 0),
                description: None,
            },
        )
        .await
        .unwrap();

        let schedule = daily_schedule(&pool, masjid_id, today, today)
            .await
            .unwrap()
            .unwrap();

        let timing = schedule.timing.unwrap();
        assert_eq!(timing.source, TimingSource::Exact);
        assert_eq!(schedule.islamic_date.as_deref(), Some("10 Ramadan 1445"));
        assert_eq!(
            schedule.additional_timings.unwrap().iftar_time,
            NaiveTime::from_hms_opt(18, 40, 0)
        );
        assert_eq!(schedule.special_events.len(), 1);
        assert_eq!(schedule.special_events[0].event_name, "Taraweeh");
    }

    #[tokio::test]
    async fn test_additional_timings_fall_back_without_today_gate() {
        let pool = salah_common::db::connect_memory().await.unwrap();
        let masjid_id = seed_masjid(&pool, "M").await;
        let today = date("2024-03-20");

        db::additional::create(
            &pool,
            &NewAdditionalTimings {
                masjid_id,
                date: date("2024-03-10"),
                sunrise_time: NaiveTime::from_hms_opt(6, 35, 0),
                ..NewAdditionalTimings::default()
            },
        )
        .await
        .unwrap();

        // Query a past date with no exact row: the latest row stands in
        let schedule = daily_schedule(&pool, masjid_id, date("2024-03-01"), today)
            .await
            .unwrap()
            .unwrap();
        let additional = schedule.additional_timings.unwrap();
        assert_eq!(additional.date, date("2024-03-10"));
    }

    #[tokio::test]
    async fn test_events_do_not_fall_back() {
        let pool = salah_common::db::connect_memory().await.unwrap();
        let masjid_id = seed_masjid(&pool, "M").await;
        let today = date("2024-03-20");

        db::events::create(
            &pool,
            &NewSpecialEvent {
                masjid_id,
                event_name: "Jalsa".to_string(),
                event_date: date("2024-03-10"),
                event_time: None,
                description: None,
            },
        )
        .await
        .unwrap();

        let schedule = daily_schedule(&pool, masjid_id, today, today)
            .await
            .unwrap()
            .unwrap();
        assert!(schedule.special_events.is_empty());
    }

    #[tokio::test]
    async fn test_islamic_date_absent_for_default_resolution() {
        let pool = salah_common::db::connect_memory().await.unwrap();
        let masjid_id = seed_masjid(&pool, "M").await;
        let today = date("2024-03-20");

        db::default_schedules::create(
            &pool,
            masjid_id,
            &PrayerTimes::default(),
            salah_common::time::now(),
        )
        .await
        .unwrap();

        let schedule = daily_schedule(&pool, masjid_id, today, today)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(schedule.timing.unwrap().source, TimingSource::Default);
        assert!(schedule.islamic_date.is_none());
    }
}
