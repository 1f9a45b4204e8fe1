//! State and city queries (geographic hierarchy)

use salah_common::db::models::{City, State};
use salah_common::Result;
use sqlx::SqlitePool;

use crate::pagination::PageWindow;

pub async fn count_states(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM states")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn list_states(pool: &SqlitePool, window: PageWindow) -> Result<Vec<State>> {
    let rows = sqlx::query("SELECT state_id, state_name FROM states ORDER BY state_name LIMIT ? OFFSET ?")
        .bind(window.page_size)
        .bind(window.offset)
        .fetch_all(pool)
        .await?;
    rows.iter().map(State::from_row).collect()
}

pub async fn get_state(pool: &SqlitePool, state_id: i64) -> Result<Option<State>> {
    let row = sqlx::query("SELECT state_id, state_name FROM states WHERE state_id = ?")
        .bind(state_id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(State::from_row).transpose()
}

pub async fn create_state(pool: &SqlitePool, state_name: &str) -> Result<State> {
    let result = sqlx::query("INSERT INTO states (state_name) VALUES (?)")
        .bind(state_name)
        .execute(pool)
        .await?;
    Ok(State {
        state_id: result.last_insert_rowid(),
        state_name: state_name.to_string(),
    })
}

pub async fn update_state(
    pool: &SqlitePool,
    state_id: i64,
    state_name: &str,
) -> Result<Option<State>> {
    let result = sqlx::query("UPDATE states SET state_name = ? WHERE state_id = ?")
        .bind(state_name)
        .bind(state_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }
    Ok(Some(State {
        state_id,
        state_name: state_name.to_string(),
    }))
}

pub async fn delete_state(pool: &SqlitePool, state_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM states WHERE state_id = ?")
        .bind(state_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list_cities_by_state(pool: &SqlitePool, state_id: i64) -> Result<Vec<City>> {
    let rows = sqlx::query(
        "SELECT city_id, city_name, state_id FROM cities WHERE state_id = ? ORDER BY city_name",
    )
    .bind(state_id)
    .fetch_all(pool)
    .await?;
    rows.iter().map(City::from_row).collect()
}

pub async fn get_city(pool: &SqlitePool, city_id: i64) -> Result<Option<City>> {
    let row = sqlx::query("SELECT city_id, city_name, state_id FROM cities WHERE city_id = ?")
        .bind(city_id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(City::from_row).transpose()
}

pub async fn create_city(pool: &SqlitePool, city_name: &str, state_id: i64) -> Result<City> {
    let result = sqlx::query("INSERT INTO cities (city_name, state_id) VALUES (?, ?)")
        .bind(city_name)
        .bind(state_id)
        .execute(pool)
        .await?;
    Ok(City {
        city_id: result.last_insert_rowid(),
        city_name: city_name.to_string(),
        state_id,
    })
}

pub async fn update_city(
    pool: &SqlitePool,
    city_id: i64,
    city_name: Option<&str>,
    state_id: Option<i64>,
) -> Result<Option<City>> {
    let Some(current) = get_city(pool, city_id).await? else {
        return Ok(None);
    };
    let city_name = city_name.unwrap_or(&current.city_name).to_string();
    let state_id = state_id.unwrap_or(current.state_id);

    sqlx::query("UPDATE cities SET city_name = ?, state_id = ? WHERE city_id = ?")
        .bind(&city_name)
        .bind(state_id)
        .bind(city_id)
        .execute(pool)
        .await?;

    Ok(Some(City {
        city_id,
        city_name,
        state_id,
    }))
}

pub async fn delete_city(pool: &SqlitePool, city_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM cities WHERE city_id = ?")
        .bind(city_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::page_window;

    #[tokio::test]
    async fn test_state_round_trip() {
        let pool = salah_common::db::connect_memory().await.unwrap();

        let state = create_state(&pool, "Maharashtra").await.unwrap();
        assert_eq!(
            get_state(&pool, state.state_id).await.unwrap().unwrap().state_name,
            "Maharashtra"
        );

        update_state(&pool, state.state_id, "MH").await.unwrap().unwrap();
        assert_eq!(
            get_state(&pool, state.state_id).await.unwrap().unwrap().state_name,
            "MH"
        );

        assert!(delete_state(&pool, state.state_id).await.unwrap());
        assert!(get_state(&pool, state.state_id).await.unwrap().is_none());
        assert!(!delete_state(&pool, state.state_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_state_name_rejected() {
        let pool = salah_common::db::connect_memory().await.unwrap();
        create_state(&pool, "Kerala").await.unwrap();
        assert!(create_state(&pool, "Kerala").await.is_err());
    }

    #[tokio::test]
    async fn test_cities_listed_by_state() {
        let pool = salah_common::db::connect_memory().await.unwrap();
        let state = create_state(&pool, "Karnataka").await.unwrap();
        let other = create_state(&pool, "Gujarat").await.unwrap();
        create_city(&pool, "Mysuru", state.state_id).await.unwrap();
        create_city(&pool, "Bengaluru", state.state_id).await.unwrap();
        create_city(&pool, "Surat", other.state_id).await.unwrap();

        let cities = list_cities_by_state(&pool, state.state_id).await.unwrap();
        let names: Vec<&str> = cities.iter().map(|c| c.city_name.as_str()).collect();
        assert_eq!(names, vec!["Bengaluru", "Mysuru"]);
    }

    #[tokio::test]
    async fn test_states_page_ordered_by_name() {
        let pool = salah_common::db::connect_memory().await.unwrap();
        for name in ["Delta", "Alpha", "Charlie", "Bravo"] {
            create_state(&pool, name).await.unwrap();
        }

        let page = list_states(&pool, page_window(1, 2)).await.unwrap();
        let names: Vec<&str> = page.iter().map(|s| s.state_name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Bravo"]);
        assert_eq!(count_states(&pool).await.unwrap(), 4);
    }
}
