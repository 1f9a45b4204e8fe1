//! Masjid endpoints, including the nearby search

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use salah_common::api::{ApiResponse, PagedResponse};

use crate::db::masjids::{MasjidSummary, MasjidUpdate, NewMasjid};
use crate::pagination::{self, page_window};
use crate::{db, ApiError, ApiResult, AppState};

/// Default search radius for the nearby endpoint
const DEFAULT_RADIUS_KM: f64 = 5.0;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MasjidListQuery {
    #[serde(default = "pagination::default_page_number")]
    pub page_number: i64,
    #[serde(default = "pagination::default_page_size")]
    pub page_size: i64,
    pub city_id: Option<i64>,
    /// Substring match on the masjid name
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_in_km: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateMasjidRequest {
    pub masjid_name: String,
    pub address: String,
    pub city_id: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact_number: Option<String>,
    pub imam_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateMasjidRequest {
    pub masjid_name: Option<String>,
    pub address: Option<String>,
    pub city_id: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact_number: Option<String>,
    pub imam_name: Option<String>,
}

/// GET /api/masjids
pub async fn list_masjids(
    State(state): State<AppState>,
    Query(query): Query<MasjidListQuery>,
) -> ApiResult<Json<ApiResponse<PagedResponse<MasjidSummary>>>> {
    let window = page_window(query.page_number, query.page_size);
    let (masjids, total) =
        db::masjids::list(&state.db, window, query.city_id, query.search.as_deref()).await?;
    let page = PagedResponse::new(masjids, total, window.page_number, window.page_size);
    Ok(Json(ApiResponse::success(page)))
}

/// GET /api/masjids/nearby
///
/// Loads all masjids with coordinates and filters/sorts by great-circle
/// distance from the given point.
pub async fn nearby_masjids(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> ApiResult<Json<ApiResponse<Vec<MasjidSummary>>>> {
    let radius_km = query.radius_in_km.unwrap_or(DEFAULT_RADIUS_KM);
    if !(radius_km > 0.0) {
        return Err(ApiError::BadRequest("Radius must be positive".to_string()));
    }

    let located = db::masjids::list_located(&state.db).await?;
    let mut with_distance: Vec<(f64, MasjidSummary)> = located
        .into_iter()
        .filter_map(|masjid| {
            let (Some(lat), Some(lon)) = (masjid.latitude, masjid.longitude) else {
                return None;
            };
            let distance = haversine_km(query.latitude, query.longitude, lat, lon);
            (distance <= radius_km).then_some((distance, masjid))
        })
        .collect();
    with_distance.sort_by(|a, b| a.0.total_cmp(&b.0));

    let masjids = with_distance.into_iter().map(|(_, masjid)| masjid).collect();
    Ok(Json(ApiResponse::success(masjids)))
}

/// GET /api/masjids/:masjid_id
pub async fn get_masjid(
    State(state): State<AppState>,
    Path(masjid_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<MasjidSummary>>> {
    let masjid = db::masjids::get_summary(&state.db, masjid_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Masjid not found".to_string()))?;
    Ok(Json(ApiResponse::success(masjid)))
}

/// POST /api/masjids
pub async fn create_masjid(
    State(state): State<AppState>,
    Json(payload): Json<CreateMasjidRequest>,
) -> ApiResult<impl IntoResponse> {
    if payload.masjid_name.trim().is_empty() {
        return Err(ApiError::BadRequest("Masjid name is required".to_string()));
    }
    if payload.address.trim().is_empty() {
        return Err(ApiError::BadRequest("Address is required".to_string()));
    }
    if db::locations::get_city(&state.db, payload.city_id).await?.is_none() {
        return Err(ApiError::NotFound("City not found".to_string()));
    }

    let masjid = db::masjids::create(
        &state.db,
        &NewMasjid {
            masjid_name: payload.masjid_name.trim().to_string(),
            address: payload.address.trim().to_string(),
            city_id: payload.city_id,
            latitude: payload.latitude,
            longitude: payload.longitude,
            contact_number: payload.contact_number,
            imam_name: payload.imam_name,
        },
    )
    .await?;

    tracing::info!("Created masjid {} ({})", masjid.masjid_name, masjid.masjid_id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(masjid, "Masjid created successfully")),
    ))
}

/// PUT /api/masjids/:masjid_id
pub async fn update_masjid(
    State(state): State<AppState>,
    Path(masjid_id): Path<i64>,
    Json(payload): Json<UpdateMasjidRequest>,
) -> ApiResult<Json<ApiResponse<MasjidSummary>>> {
    if let Some(city_id) = payload.city_id {
        if db::locations::get_city(&state.db, city_id).await?.is_none() {
            return Err(ApiError::NotFound("City not found".to_string()));
        }
    }

    let masjid = db::masjids::update(
        &state.db,
        masjid_id,
        &MasjidUpdate {
            masjid_name: payload.masjid_name,
            address: payload.address,
            city_id: payload.city_id,
            latitude: payload.latitude,
            longitude: payload.longitude,
            contact_number: payload.contact_number,
            imam_name: payload.imam_name,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Masjid not found".to_string()))?;

    Ok(Json(ApiResponse::success_with_message(masjid, "Masjid updated successfully")))
}

/// DELETE /api/masjids/:masjid_id
pub async fn delete_masjid(
    State(state): State<AppState>,
    Path(masjid_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<bool>>> {
    if !db::masjids::delete(&state.db, masjid_id).await? {
        return Err(ApiError::NotFound("Masjid not found".to_string()));
    }
    tracing::info!("Deleted masjid {}", masjid_id);
    Ok(Json(ApiResponse::success_with_message(true, "Masjid deleted successfully")))
}

/// Great-circle distance between two coordinates, in kilometers
fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// Build masjid routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/masjids", get(list_masjids).post(create_masjid))
        .route("/api/masjids/nearby", get(nearby_masjids))
        .route(
            "/api/masjids/:masjid_id",
            get(get_masjid).put(update_masjid).delete(delete_masjid),
        )
}

#[cfg(test)]
mod tests {
    use super::haversine_km;

    #[test]
    fn test_haversine_zero_for_same_point() {
        let d = haversine_km(19.076, 72.8777, 19.076, 72.8777);
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Mumbai to Pune, roughly 120 km as the crow flies
        let d = haversine_km(19.076, 72.8777, 18.5204, 73.8567);
        assert!((d - 120.0).abs() < 5.0, "got {d}");
    }

    #[test]
    fn test_haversine_symmetric() {
        let ab = haversine_km(12.97, 77.59, 13.08, 80.27);
        let ba = haversine_km(13.08, 80.27, 12.97, 77.59);
        assert!((ab - ba).abs() < 1e-9);
    }
}
