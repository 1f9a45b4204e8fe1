//! Prayer-timing resolution
//!
//! `today` is an explicit parameter, read from the server's local clock at
//! the HTTP boundary. The default-schedule tier applies only when the
//! requested date IS today: a default is a statement about the current day,
//! not about arbitrary past or future dates.

use chrono::NaiveDate;
use salah_common::db::models::{DefaultSchedule, PrayerTimes, SalahTiming};
use salah_common::Result;
use sqlx::SqlitePool;

use crate::db;

/// Where a resolved timing came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingSource {
    /// Timing row recorded for exactly the requested date
    Exact,
    /// Synthesized from the masjid's default schedule (requested date is today)
    Default,
    /// The masjid's most recent timing row, standing in for a date that has none
    Fallback,
}

/// A prayer timing resolved for one masjid and date, with provenance
#[derive(Debug, Clone)]
pub struct ResolvedTiming {
    /// Row id of the backing timing; `None` when synthesized from the
    /// default schedule
    pub salah_id: Option<i64>,
    pub masjid_id: i64,
    /// The backing row's own date for exact/fallback results, the requested
    /// date for a default-schedule result
    pub date: NaiveDate,
    pub islamic_date: Option<String>,
    pub times: PrayerTimes,
    pub source: TimingSource,
}

impl ResolvedTiming {
    fn exact(timing: SalahTiming) -> Self {
        Self::from_timing(timing, TimingSource::Exact)
    }

    fn fallback(timing: SalahTiming) -> Self {
        Self::from_timing(timing, TimingSource::Fallback)
    }

    fn from_timing(timing: SalahTiming, source: TimingSource) -> Self {
        Self {
            salah_id: Some(timing.salah_id),
            masjid_id: timing.masjid_id,
            date: timing.date,
            islamic_date: timing.islamic_date,
            times: timing.times,
            source,
        }
    }

    fn from_default(schedule: DefaultSchedule, date: NaiveDate) -> Self {
        Self {
            salah_id: None,
            masjid_id: schedule.masjid_id,
            date,
            islamic_date: None,
            times: schedule.times,
            source: TimingSource::Default,
        }
    }

    pub fn is_default(&self) -> bool {
        self.source == TimingSource::Default
    }

    pub fn is_fallback(&self) -> bool {
        self.source == TimingSource::Fallback
    }
}

/// Resolve the timing to present for `masjid_id` on `date`
///
/// Returns `None` only when the masjid has no timing rows at all and the
/// default tier doesn't apply. Missing masjids are the caller's concern; a
/// masjid id with no data resolves to `None` the same way.
pub async fn resolve_timing(
    pool: &SqlitePool,
    masjid_id: i64,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<Option<ResolvedTiming>> {
    if let Some(timing) = db::timings::get_by_masjid_and_date(pool, masjid_id, date).await? {
        return Ok(Some(ResolvedTiming::exact(timing)));
    }

    if date == today {
        if let Some(schedule) = db::default_schedules::get_by_masjid(pool, masjid_id).await? {
            return Ok(Some(ResolvedTiming::from_default(schedule, date)));
        }
    }

    Ok(db::timings::latest_for_masjid(pool, masjid_id)
        .await?
        .map(ResolvedTiming::fallback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::masjids::test_support::seed_masjid;
    use crate::db::timings::NewSalahTiming;
    use chrono::NaiveTime;

    fn date(raw: &str) -> NaiveDate {
        raw.parse().unwrap()
    }

    fn t(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    async fn seed_timing(pool: &SqlitePool, masjid_id: i64, day: &str, fajr: Option<NaiveTime>) {
        db::timings::create(
            pool,
            &NewSalahTiming {
                masjid_id,
                date: date(day),
                islamic_date: None,
                times: PrayerTimes {
                    fajr_azan_time: fajr,
                    ..PrayerTimes::default()
                },
            },
        )
        .await
        .unwrap();
    }

    async fn seed_default(pool: &SqlitePool, masjid_id: i64, fajr: Option<NaiveTime>) {
        db::default_schedules::create(
            pool,
            masjid_id,
            &PrayerTimes {
                fajr_azan_time: fajr,
                ..PrayerTimes::default()
            },
            salah_common::time::now(),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_exact_match_wins_over_everything() {
        let pool = salah_common::db::connect_memory().await.unwrap();
        let masjid_id = seed_masjid(&pool, "M").await;
        let today = date("2024-03-20");

        seed_timing(&pool, masjid_id, "2024-03-20", t(5, 30)).await;
        seed_default(&pool, masjid_id, t(5, 0)).await;

        let resolved = resolve_timing(&pool, masjid_id, today, today)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.source, TimingSource::Exact);
        assert_eq!(resolved.times.fajr_azan_time, t(5, 30));
        assert!(resolved.salah_id.is_some());
        assert!(!resolved.is_default());
        assert!(!resolved.is_fallback());
    }

    #[tokio::test]
    async fn test_default_serves_today_without_exact_row() {
        let pool = salah_common::db::connect_memory().await.unwrap();
        let masjid_id = seed_masjid(&pool, "M").await;
        let today = date("2024-03-20");

        seed_timing(&pool, masjid_id, "2024-03-15", t(5, 30)).await;
        seed_default(&pool, masjid_id, t(5, 0)).await;

        let resolved = resolve_timing(&pool, masjid_id, today, today)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.source, TimingSource::Default);
        assert_eq!(resolved.times.fajr_azan_time, t(5, 0));
        assert_eq!(resolved.salah_id, None);
        // The view is dated with the requested day
        assert_eq!(resolved.date, today);
    }

    #[tokio::test]
    async fn test_default_does_not_apply_to_other_dates() {
        let pool = salah_common::db::connect_memory().await.unwrap();
        let masjid_id = seed_masjid(&pool, "M").await;
        let today = date("2024-03-20");

        seed_timing(&pool, masjid_id, "2024-03-15", t(5, 30)).await;
        seed_default(&pool, masjid_id, t(5, 0)).await;

        // Yesterday: not today, so the default tier is skipped entirely
        let resolved = resolve_timing(&pool, masjid_id, date("2024-03-19"), today)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.source, TimingSource::Fallback);
        assert_eq!(resolved.times.fajr_azan_time, t(5, 30));
    }

    #[tokio::test]
    async fn test_fallback_takes_latest_even_when_after_query_date() {
        let pool = salah_common::db::connect_memory().await.unwrap();
        let masjid_id = seed_masjid(&pool, "M").await;
        let today = date("2024-03-20");

        // Worked example: rows on 2024-01-01 and 2024-03-15, query 2024-02-01
        seed_timing(&pool, masjid_id, "2024-01-01", t(5, 45)).await;
        seed_timing(&pool, masjid_id, "2024-03-15", t(5, 30)).await;
        seed_default(&pool, masjid_id, t(5, 0)).await;

        let resolved = resolve_timing(&pool, masjid_id, date("2024-02-01"), today)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.source, TimingSource::Fallback);
        // The masjid's latest row by date, 2024-03-15, despite being after
        // the requested 2024-02-01
        assert_eq!(resolved.date, date("2024-03-15"));
        assert_eq!(resolved.times.fajr_azan_time, t(5, 30));
    }

    #[tokio::test]
    async fn test_today_without_default_falls_back() {
        let pool = salah_common::db::connect_memory().await.unwrap();
        let masjid_id = seed_masjid(&pool, "M").await;
        let today = date("2024-03-20");

        seed_timing(&pool, masjid_id, "2024-03-15", t(5, 30)).await;

        let resolved = resolve_timing(&pool, masjid_id, today, today)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.source, TimingSource::Fallback);
        assert_eq!(resolved.date, date("2024-03-15"));
    }

    #[tokio::test]
    async fn test_default_only_masjid_has_no_fallback_for_other_days() {
        let pool = salah_common::db::connect_memory().await.unwrap();
        let masjid_id = seed_masjid(&pool, "N").await;
        let today = date("2024-03-20");

        // Worked example: zero timing rows, default schedule present
        seed_default(&pool, masjid_id, t(5, 0)).await;

        let today_view = resolve_timing(&pool, masjid_id, today, today)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(today_view.source, TimingSource::Default);

        let yesterday = resolve_timing(&pool, masjid_id, date("2024-03-19"), today)
            .await
            .unwrap();
        assert!(yesterday.is_none());
    }

    #[tokio::test]
    async fn test_no_data_at_all_resolves_to_none() {
        let pool = salah_common::db::connect_memory().await.unwrap();
        let masjid_id = seed_masjid(&pool, "M").await;
        let today = date("2024-03-20");

        let resolved = resolve_timing(&pool, masjid_id, today, today).await.unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn test_resolution_does_not_touch_the_default_schedule() {
        let pool = salah_common::db::connect_memory().await.unwrap();
        let masjid_id = seed_masjid(&pool, "M").await;
        let today = date("2024-03-20");

        seed_default(&pool, masjid_id, t(5, 0)).await;
        let before = db::default_schedules::get_by_masjid(&pool, masjid_id)
            .await
            .unwrap()
            .unwrap();

        resolve_timing(&pool, masjid_id, today, today).await.unwrap();

        let after = db::default_schedules::get_by_masjid(&pool, masjid_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.last_updated, before.last_updated);
        assert_eq!(after.times, before.times);
    }
}
