//! Masjid queries
//!
//! Read paths join city and state so responses can carry the display names
//! the clients show alongside each masjid.

use salah_common::db::models::Masjid;
use salah_common::Result;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::pagination::PageWindow;

/// Masjid row joined with its city and state names
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MasjidSummary {
    pub masjid_id: i64,
    pub masjid_name: String,
    pub address: String,
    pub city_id: i64,
    pub city_name: String,
    pub state_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact_number: Option<String>,
    pub imam_name: Option<String>,
}

impl MasjidSummary {
    fn from_row(row: &SqliteRow) -> Result<Self> {
        Ok(Self {
            masjid_id: row.try_get("masjid_id")?,
            masjid_name: row.try_get("masjid_name")?,
            address: row.try_get("address")?,
            city_id: row.try_get("city_id")?,
            city_name: row.try_get("city_name")?,
            state_name: row.try_get("state_name")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            contact_number: row.try_get("contact_number")?,
            imam_name: row.try_get("imam_name")?,
        })
    }
}

/// Fields for a new masjid row
#[derive(Debug, Clone)]
pub struct NewMasjid {
    pub masjid_name: String,
    pub address: String,
    pub city_id: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact_number: Option<String>,
    pub imam_name: Option<String>,
}

/// Partial update; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct MasjidUpdate {
    pub masjid_name: Option<String>,
    pub address: Option<String>,
    pub city_id: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact_number: Option<String>,
    pub imam_name: Option<String>,
}

const SUMMARY_SELECT: &str = "SELECT m.masjid_id, m.masjid_name, m.address, m.city_id, \
    c.city_name, s.state_name, m.latitude, m.longitude, m.contact_number, m.imam_name \
    FROM masjids m \
    JOIN cities c ON c.city_id = m.city_id \
    JOIN states s ON s.state_id = c.state_id";

/// Paged listing with optional city filter and name search
pub async fn list(
    pool: &SqlitePool,
    window: PageWindow,
    city_id: Option<i64>,
    search: Option<&str>,
) -> Result<(Vec<MasjidSummary>, i64)> {
    let mut clauses = Vec::new();
    if city_id.is_some() {
        clauses.push("m.city_id = ?");
    }
    if search.is_some() {
        clauses.push("m.masjid_name LIKE ?");
    }
    let filter = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };

    let count_sql = format!(
        "SELECT COUNT(*) FROM masjids m \
         JOIN cities c ON c.city_id = m.city_id \
         JOIN states s ON s.state_id = c.state_id{filter}"
    );
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(id) = city_id {
        count_query = count_query.bind(id);
    }
    if let Some(term) = search {
        count_query = count_query.bind(format!("%{term}%"));
    }
    let total = count_query.fetch_one(pool).await?;

    let list_sql = format!("{SUMMARY_SELECT}{filter} ORDER BY m.masjid_name LIMIT ? OFFSET ?");
    let mut list_query = sqlx::query(&list_sql);
    if let Some(id) = city_id {
        list_query = list_query.bind(id);
    }
    if let Some(term) = search {
        list_query = list_query.bind(format!("%{term}%"));
    }
    let rows = list_query
        .bind(window.page_size)
        .bind(window.offset)
        .fetch_all(pool)
        .await?;

    let masjids = rows.iter().map(MasjidSummary::from_row).collect::<Result<_>>()?;
    Ok((masjids, total))
}

pub async fn get_summary(pool: &SqlitePool, masjid_id: i64) -> Result<Option<MasjidSummary>> {
    let sql = format!("{SUMMARY_SELECT} WHERE m.masjid_id = ?");
    let row = sqlx::query(&sql).bind(masjid_id).fetch_optional(pool).await?;
    row.as_ref().map(MasjidSummary::from_row).transpose()
}

pub async fn get(pool: &SqlitePool, masjid_id: i64) -> Result<Option<Masjid>> {
    let row = sqlx::query(
        "SELECT masjid_id, masjid_name, address, city_id, latitude, longitude, \
         contact_number, imam_name FROM masjids WHERE masjid_id = ?",
    )
    .bind(masjid_id)
    .fetch_optional(pool)
    .await?;
    row.as_ref().map(Masjid::from_row).transpose()
}

pub async fn exists(pool: &SqlitePool, masjid_id: i64) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM masjids WHERE masjid_id = ?")
        .bind(masjid_id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn list_by_city(pool: &SqlitePool, city_id: i64) -> Result<Vec<MasjidSummary>> {
    let sql = format!("{SUMMARY_SELECT} WHERE m.city_id = ? ORDER BY m.masjid_name");
    let rows = sqlx::query(&sql).bind(city_id).fetch_all(pool).await?;
    rows.iter().map(MasjidSummary::from_row).collect()
}

/// All masjids that have coordinates, for the nearby search
pub async fn list_located(pool: &SqlitePool) -> Result<Vec<MasjidSummary>> {
    let sql = format!(
        "{SUMMARY_SELECT} WHERE m.latitude IS NOT NULL AND m.longitude IS NOT NULL"
    );
    let rows = sqlx::query(&sql).fetch_all(pool).await?;
    rows.iter().map(MasjidSummary::from_row).collect()
}

pub async fn create(pool: &SqlitePool, masjid: &NewMasjid) -> Result<MasjidSummary> {
    let result = sqlx::query(
        "INSERT INTO masjids (masjid_name, address, city_id, latitude, longitude, \
         contact_number, imam_name) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&masjid.masjid_name)
    .bind(&masjid.address)
    .bind(masjid.city_id)
    .bind(masjid.latitude)
    .bind(masjid.longitude)
    .bind(&masjid.contact_number)
    .bind(&masjid.imam_name)
    .execute(pool)
    .await?;

    let masjid_id = result.last_insert_rowid();
    get_summary(pool, masjid_id).await?.ok_or_else(|| {
        salah_common::Error::Internal(format!("Masjid {masjid_id} missing after insert"))
    })
}

pub async fn update(
    pool: &SqlitePool,
    masjid_id: i64,
    update: &MasjidUpdate,
) -> Result<Option<MasjidSummary>> {
    let Some(current) = get(pool, masjid_id).await? else {
        return Ok(None);
    };

    sqlx::query(
        "UPDATE masjids SET masjid_name = ?, address = ?, city_id = ?, latitude = ?, \
         longitude = ?, contact_number = ?, imam_name = ? WHERE masjid_id = ?",
    )
    .bind(update.masjid_name.as_ref().unwrap_or(&current.masjid_name))
    .bind(update.address.as_ref().unwrap_or(&current.address))
    .bind(update.city_id.unwrap_or(current.city_id))
    .bind(update.latitude.or(current.latitude))
    .bind(update.longitude.or(current.longitude))
    .bind(update.contact_number.as_ref().or(current.contact_number.as_ref()))
    .bind(update.imam_name.as_ref().or(current.imam_name.as_ref()))
    .bind(masjid_id)
    .execute(pool)
    .await?;

    get_summary(pool, masjid_id).await
}

pub async fn delete(pool: &SqlitePool, masjid_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM masjids WHERE masjid_id = ?")
        .bind(masjid_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::db::locations;

    /// Seed a state, city and masjid; returns the masjid id
    pub async fn seed_masjid(pool: &SqlitePool, name: &str) -> i64 {
        let state = match locations::create_state(pool, "Test State").await {
            Ok(state) => state,
            // Already seeded by an earlier call in the same test
            Err(_) => locations::list_states(pool, crate::pagination::page_window(1, 1))
                .await
                .unwrap()
                .remove(0),
        };
        let city = locations::create_city(pool, &format!("City of {name}"), state.state_id)
            .await
            .unwrap();
        create(
            pool,
            &NewMasjid {
                masjid_name: name.to_string(),
                address: "1 Test Street".to_string(),
                city_id: city.city_id,
                latitude: None,
                longitude: None,
                contact_number: None,
                imam_name: None,
            },
        )
        .await
        .unwrap()
        .masjid_id
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::seed_masjid;
    use super::*;
    use crate::pagination::page_window;

    #[tokio::test]
    async fn test_summary_carries_city_and_state_names() {
        let pool = salah_common::db::connect_memory().await.unwrap();
        let masjid_id = seed_masjid(&pool, "Jama Masjid").await;

        let summary = get_summary(&pool, masjid_id).await.unwrap().unwrap();
        assert_eq!(summary.masjid_name, "Jama Masjid");
        assert_eq!(summary.city_name, "City of Jama Masjid");
        assert_eq!(summary.state_name, "Test State");
    }

    #[tokio::test]
    async fn test_list_filters_by_name_search() {
        let pool = salah_common::db::connect_memory().await.unwrap();
        seed_masjid(&pool, "Jama Masjid").await;
        seed_masjid(&pool, "Noor Masjid").await;

        let (all, total) = list(&pool, page_window(1, 10), None, None).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(all.len(), 2);

        let (hits, total) = list(&pool, page_window(1, 10), None, Some("Noor"))
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(hits[0].masjid_name, "Noor Masjid");
    }

    #[tokio::test]
    async fn test_partial_update_keeps_unsupplied_fields() {
        let pool = salah_common::db::connect_memory().await.unwrap();
        let masjid_id = seed_masjid(&pool, "Jama Masjid").await;

        let updated = update(
            &pool,
            masjid_id,
            &MasjidUpdate {
                imam_name: Some("Imam Sahab".to_string()),
                ..MasjidUpdate::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.masjid_name, "Jama Masjid");
        assert_eq!(updated.address, "1 Test Street");
        assert_eq!(updated.imam_name.as_deref(), Some("Imam Sahab"));
    }

    #[tokio::test]
    async fn test_delete_cascades_is_clean() {
        let pool = salah_common::db::connect_memory().await.unwrap();
        let masjid_id = seed_masjid(&pool, "Jama Masjid").await;
        assert!(delete(&pool, masjid_id).await.unwrap());
        assert!(get(&pool, masjid_id).await.unwrap().is_none());
    }
}
