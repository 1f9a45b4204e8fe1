//! State and city endpoints (geographic hierarchy)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use salah_common::api::{ApiResponse, PagedResponse};
use salah_common::db::models::{City, State as StateRow};

use crate::pagination::{self, page_window};
use crate::{db, ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListQuery {
    #[serde(default = "pagination::default_page_number")]
    pub page_number: i64,
    #[serde(default = "pagination::default_page_size")]
    pub page_size: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateStateRequest {
    pub state_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateCityRequest {
    pub city_name: String,
    pub state_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateCityRequest {
    pub city_name: Option<String>,
    pub state_id: Option<i64>,
}

/// GET /api/states
pub async fn list_states(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ApiResponse<PagedResponse<StateRow>>>> {
    let window = page_window(query.page_number, query.page_size);
    let total = db::locations::count_states(&state.db).await?;
    let states = db::locations::list_states(&state.db, window).await?;
    let page = PagedResponse::new(states, total, window.page_number, window.page_size);
    Ok(Json(ApiResponse::success(page)))
}

/// GET /api/states/:state_id
pub async fn get_state(
    State(state): State<AppState>,
    Path(state_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<StateRow>>> {
    let row = db::locations::get_state(&state.db, state_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("State not found".to_string()))?;
    Ok(Json(ApiResponse::success(row)))
}

/// POST /api/states
pub async fn create_state(
    State(state): State<AppState>,
    Json(payload): Json<CreateStateRequest>,
) -> ApiResult<impl IntoResponse> {
    if payload.state_name.trim().is_empty() {
        return Err(ApiError::BadRequest("State name is required".to_string()));
    }
    let row = db::locations::create_state(&state.db, payload.state_name.trim()).await?;
    tracing::info!("Created state {} ({})", row.state_name, row.state_id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(row, "State created successfully")),
    ))
}

/// PUT /api/states/:state_id
pub async fn update_state(
    State(state): State<AppState>,
    Path(state_id): Path<i64>,
    Json(payload): Json<CreateStateRequest>,
) -> ApiResult<Json<ApiResponse<StateRow>>> {
    if payload.state_name.trim().is_empty() {
        return Err(ApiError::BadRequest("State name is required".to_string()));
    }
    let row = db::locations::update_state(&state.db, state_id, payload.state_name.trim())
        .await?
        .ok_or_else(|| ApiError::NotFound("State not found".to_string()))?;
    Ok(Json(ApiResponse::success_with_message(row, "State updated successfully")))
}

/// DELETE /api/states/:state_id
pub async fn delete_state(
    State(state): State<AppState>,
    Path(state_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<bool>>> {
    if !db::locations::delete_state(&state.db, state_id).await? {
        return Err(ApiError::NotFound("State not found".to_string()));
    }
    Ok(Json(ApiResponse::success_with_message(true, "State deleted successfully")))
}

/// GET /api/states/:state_id/cities
pub async fn list_cities_of_state(
    State(state): State<AppState>,
    Path(state_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Vec<City>>>> {
    if db::locations::get_state(&state.db, state_id).await?.is_none() {
        return Err(ApiError::NotFound("State not found".to_string()));
    }
    let cities = db::locations::list_cities_by_state(&state.db, state_id).await?;
    Ok(Json(ApiResponse::success(cities)))
}

/// GET /api/cities/:city_id
pub async fn get_city(
    State(state): State<AppState>,
    Path(city_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<City>>> {
    let city = db::locations::get_city(&state.db, city_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("City not found".to_string()))?;
    Ok(Json(ApiResponse::success(city)))
}

/// POST /api/cities
pub async fn create_city(
    State(state): State<AppState>,
    Json(payload): Json<CreateCityRequest>,
) -> ApiResult<impl IntoResponse> {
    if payload.city_name.trim().is_empty() {
        return Err(ApiError::BadRequest("City name is required".to_string()));
    }
    if db::locations::get_state(&state.db, payload.state_id).await?.is_none() {
        return Err(ApiError::NotFound("State not found".to_string()));
    }
    let city = db::locations::create_city(&state.db, payload.city_name.trim(), payload.state_id)
        .await?;
    tracing::info!("Created city {} ({})", city.city_name, city.city_id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(city, "City created successfully")),
    ))
}

/// PUT /api/cities/:city_id
pub async fn update_city(
    State(state): State<AppState>,
    Path(city_id): Path<i64>,
    Json(payload): Json<UpdateCityRequest>,
) -> ApiResult<Json<ApiResponse<City>>> {
    let city = db::locations::update_city(
        &state.db,
        city_id,
        payload.city_name.as_deref(),
        payload.state_id,
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("City not found".to_string()))?;
    Ok(Json(ApiResponse::success_with_message(city, "City updated successfully")))
}

/// DELETE /api/cities/:city_id
pub async fn delete_city(
    State(state): State<AppState>,
    Path(city_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<bool>>> {
    if !db::locations::delete_city(&state.db, city_id).await? {
        return Err(ApiError::NotFound("City not found".to_string()));
    }
    Ok(Json(ApiResponse::success_with_message(true, "City deleted successfully")))
}

/// GET /api/cities/:city_id/masjids
pub async fn list_masjids_of_city(
    State(state): State<AppState>,
    Path(city_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Vec<db::masjids::MasjidSummary>>>> {
    if db::locations::get_city(&state.db, city_id).await?.is_none() {
        return Err(ApiError::NotFound("City not found".to_string()));
    }
    let masjids = db::masjids::list_by_city(&state.db, city_id).await?;
    Ok(Json(ApiResponse::success(masjids)))
}

/// Build location routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/states", get(list_states).post(create_state))
        .route(
            "/api/states/:state_id",
            get(get_state).put(update_state).delete(delete_state),
        )
        .route("/api/states/:state_id/cities", get(list_cities_of_state))
        .route("/api/cities", post(create_city))
        .route(
            "/api/cities/:city_id",
            get(get_city).put(update_city).delete(delete_city),
        )
        .route("/api/cities/:city_id/masjids", get(list_masjids_of_city))
}
