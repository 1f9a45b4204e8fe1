//! Special event endpoints
//!
//! Events never fall back across dates; the upcoming listing is a plain
//! date-window query.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{Days, NaiveDate, NaiveTime};
use serde::Deserialize;

use salah_common::api::ApiResponse;
use salah_common::db::models::SpecialEvent;
use salah_common::time;

use crate::db::events::{NewSpecialEvent, SpecialEventUpdate};
use crate::{db, ApiError, ApiResult, AppState};

/// Default horizon for the upcoming listing, in days
const DEFAULT_DAYS_AHEAD: i64 = 30;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpcomingQuery {
    pub masjid_id: Option<i64>,
    pub days_ahead: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateSpecialEventRequest {
    pub masjid_id: i64,
    pub event_name: String,
    pub event_date: NaiveDate,
    #[serde(default, with = "time::hhmm_opt")]
    pub event_time: Option<NaiveTime>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateSpecialEventRequest {
    pub event_name: Option<String>,
    pub event_date: Option<NaiveDate>,
    #[serde(default, with = "time::hhmm_opt")]
    pub event_time: Option<NaiveTime>,
    pub description: Option<String>,
}

/// GET /api/specialevents/upcoming
pub async fn upcoming_events(
    State(state): State<AppState>,
    Query(query): Query<UpcomingQuery>,
) -> ApiResult<Json<ApiResponse<Vec<SpecialEvent>>>> {
    let days_ahead = query.days_ahead.unwrap_or(DEFAULT_DAYS_AHEAD).max(0);
    let from = time::local_today();
    let to = from
        .checked_add_days(Days::new(days_ahead as u64))
        .unwrap_or(from);

    let events = db::events::upcoming(&state.db, query.masjid_id, from, to).await?;
    Ok(Json(ApiResponse::success(events)))
}

/// GET /api/specialevents/:event_id
pub async fn get_special_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<SpecialEvent>>> {
    let event = db::events::get(&state.db, event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Special event not found".to_string()))?;
    Ok(Json(ApiResponse::success(event)))
}

/// GET /api/specialevents/masjid/:masjid_id
pub async fn list_events_by_masjid(
    State(state): State<AppState>,
    Path(masjid_id): Path<i64>,
    Query(query): Query<EventRangeQuery>,
) -> ApiResult<Json<ApiResponse<Vec<SpecialEvent>>>> {
    let events =
        db::events::list_by_masjid(&state.db, masjid_id, query.start_date, query.end_date)
            .await?;
    Ok(Json(ApiResponse::success(events)))
}

/// POST /api/specialevents
pub async fn create_special_event(
    State(state): State<AppState>,
    Json(payload): Json<CreateSpecialEventRequest>,
) -> ApiResult<impl IntoResponse> {
    if payload.event_name.trim().is_empty() {
        return Err(ApiError::BadRequest("Event name is required".to_string()));
    }
    if !db::masjids::exists(&state.db, payload.masjid_id).await? {
        return Err(ApiError::NotFound("Masjid not found".to_string()));
    }

    let event = db::events::create(
        &state.db,
        &NewSpecialEvent {
            masjid_id: payload.masjid_id,
            event_name: payload.event_name.trim().to_string(),
            event_date: payload.event_date,
            event_time: payload.event_time,
            description: payload.description,
        },
    )
    .await?;

    tracing::info!(
        "Created special event {} for masjid {} on {}",
        event.event_id,
        event.masjid_id,
        event.event_date
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(event, "Special event created successfully")),
    ))
}

/// PUT /api/specialevents/:event_id
pub async fn update_special_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(payload): Json<UpdateSpecialEventRequest>,
) -> ApiResult<Json<ApiResponse<SpecialEvent>>> {
    let event = db::events::update(
        &state.db,
        event_id,
        &SpecialEventUpdate {
            event_name: payload.event_name,
            event_date: payload.event_date,
            event_time: payload.event_time,
            description: payload.description,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Special event not found".to_string()))?;

    Ok(Json(ApiResponse::success_with_message(event, "Special event updated successfully")))
}

/// DELETE /api/specialevents/:event_id
pub async fn delete_special_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<bool>>> {
    if !db::events::delete(&state.db, event_id).await? {
        return Err(ApiError::NotFound("Special event not found".to_string()));
    }
    Ok(Json(ApiResponse::success_with_message(
        true,
        "Special event deleted successfully",
    )))
}

/// Build special event routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/specialevents", axum::routing::post(create_special_event))
        .route("/api/specialevents/upcoming", get(upcoming_events))
        .route(
            "/api/specialevents/:event_id",
            get(get_special_event)
                .put(update_special_event)
                .delete(delete_special_event),
        )
        .route(
            "/api/specialevents/masjid/:masjid_id",
            get(list_events_by_masjid),
        )
}
