//! Schema initialization
//!
//! Tables are created idempotently at startup. Uniqueness rules live here:
//! one timing row per (masjid, date), one additional-timings row per
//! (masjid, date), one default schedule per masjid.

use sqlx::SqlitePool;

use crate::Result;

/// Create all tables if they don't exist
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    create_states_table(pool).await?;
    create_cities_table(pool).await?;
    create_masjids_table(pool).await?;
    create_salah_timings_table(pool).await?;
    create_default_schedules_table(pool).await?;
    create_additional_timings_table(pool).await?;
    create_special_events_table(pool).await?;

    tracing::info!("Database schema initialized");

    Ok(())
}

pub async fn create_states_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS states (
            state_id INTEGER PRIMARY KEY AUTOINCREMENT,
            state_name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_cities_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cities (
            city_id INTEGER PRIMARY KEY AUTOINCREMENT,
            city_name TEXT NOT NULL,
            state_id INTEGER NOT NULL REFERENCES states(state_id) ON DELETE CASCADE,
            UNIQUE(state_id, city_name)
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_masjids_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS masjids (
            masjid_id INTEGER PRIMARY KEY AUTOINCREMENT,
            masjid_name TEXT NOT NULL,
            address TEXT NOT NULL,
            city_id INTEGER NOT NULL REFERENCES cities(city_id) ON DELETE CASCADE,
            latitude REAL,
            longitude REAL,
            contact_number TEXT,
            imam_name TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_salah_timings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS salah_timings (
            salah_id INTEGER PRIMARY KEY AUTOINCREMENT,
            masjid_id INTEGER NOT NULL REFERENCES masjids(masjid_id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            islamic_date TEXT,
            fajr_azan_time TEXT,
            fajr_iqamah_time TEXT,
            dhuhr_azan_time TEXT,
            dhuhr_iqamah_time TEXT,
            asr_azan_time TEXT,
            asr_iqamah_time TEXT,
            maghrib_azan_time TEXT,
            maghrib_iqamah_time TEXT,
            isha_azan_time TEXT,
            isha_iqamah_time TEXT,
            jummah_azan_time TEXT,
            jummah_iqamah_time TEXT,
            UNIQUE(masjid_id, date)
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_default_schedules_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS default_schedules (
            schedule_id INTEGER PRIMARY KEY AUTOINCREMENT,
            masjid_id INTEGER NOT NULL UNIQUE REFERENCES masjids(masjid_id) ON DELETE CASCADE,
            fajr_azan_time TEXT,
            fajr_iqamah_time TEXT,
            dhuhr_azan_time TEXT,
            dhuhr_iqamah_time TEXT,
            asr_azan_time TEXT,
            asr_iqamah_time TEXT,
            maghrib_azan_time TEXT,
            maghrib_iqamah_time TEXT,
            isha_azan_time TEXT,
            isha_iqamah_time TEXT,
            jummah_azan_time TEXT,
            jummah_iqamah_time TEXT,
            last_updated TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_additional_timings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS daily_additional_timings (
            additional_id INTEGER PRIMARY KEY AUTOINCREMENT,
            masjid_id INTEGER NOT NULL REFERENCES masjids(masjid_id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            sunrise_time TEXT,
            sunset_time TEXT,
            zawal_time TEXT,
            tahajjud_time TEXT,
            sehri_end_time TEXT,
            iftar_time TEXT,
            UNIQUE(masjid_id, date)
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_special_events_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS special_events (
            event_id INTEGER PRIMARY KEY AUTOINCREMENT,
            masjid_id INTEGER NOT NULL REFERENCES masjids(masjid_id) ON DELETE CASCADE,
            event_name TEXT NOT NULL,
            event_date TEXT NOT NULL,
            event_time TEXT,
            description TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let pool = crate::db::connect_memory().await.unwrap();
        // connect_memory already ran init once; a second run must not fail
        super::init_schema(&pool).await.unwrap();

        let tables: Vec<String> =
            sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
                .fetch_all(&pool)
                .await
                .unwrap()
                .iter()
                .map(|row| row.get::<String, _>(0))
                .collect();

        for expected in [
            "states",
            "cities",
            "masjids",
            "salah_timings",
            "default_schedules",
            "daily_additional_timings",
            "special_events",
        ] {
            assert!(tables.iter().any(|t| t == expected), "missing table {expected}");
        }
    }

    #[tokio::test]
    async fn test_unique_timing_per_masjid_and_date() {
        let pool = crate::db::connect_memory().await.unwrap();
        sqlx::query("INSERT INTO states (state_name) VALUES ('S')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO cities (city_name, state_id) VALUES ('C', 1)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO masjids (masjid_name, address, city_id) VALUES ('M', 'A', 1)")
            .execute(&pool)
            .await
            .unwrap();

        let insert = "INSERT INTO salah_timings (masjid_id, date) VALUES (1, '2024-01-01')";
        sqlx::query(insert).execute(&pool).await.unwrap();
        let duplicate = sqlx::query(insert).execute(&pool).await;
        assert!(duplicate.is_err(), "duplicate (masjid_id, date) must be rejected");
    }
}
