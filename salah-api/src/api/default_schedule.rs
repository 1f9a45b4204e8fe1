//! Default schedule endpoints
//!
//! One template per masjid. Create rejects a second template outright;
//! update is partial and always refreshes `LastUpdated`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use salah_common::api::ApiResponse;
use salah_common::db::models::{DefaultSchedule, PrayerTimes};
use salah_common::time;

use crate::{db, ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateDefaultScheduleRequest {
    pub masjid_id: i64,
    #[serde(flatten)]
    pub times: PrayerTimes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateDefaultScheduleRequest {
    #[serde(flatten)]
    pub times: PrayerTimes,
}

/// Default schedule as presented to clients
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DefaultScheduleView {
    pub schedule_id: i64,
    pub masjid_id: i64,
    pub masjid_name: String,
    #[serde(flatten)]
    pub times: PrayerTimes,
    pub last_updated: DateTime<Utc>,
}

impl DefaultScheduleView {
    fn new(schedule: DefaultSchedule, masjid_name: String) -> Self {
        Self {
            schedule_id: schedule.schedule_id,
            masjid_id: schedule.masjid_id,
            masjid_name,
            times: schedule.times,
            last_updated: schedule.last_updated,
        }
    }
}

async fn masjid_name(state: &AppState, masjid_id: i64) -> ApiResult<String> {
    Ok(db::masjids::get_summary(&state.db, masjid_id)
        .await?
        .map(|masjid| masjid.masjid_name)
        .unwrap_or_default())
}

/// GET /api/salahtimings/default-schedule/masjid/:masjid_id
pub async fn get_default_schedule(
    State(state): State<AppState>,
    Path(masjid_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<DefaultScheduleView>>> {
    let schedule = db::default_schedules::get_by_masjid(&state.db, masjid_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("Default schedule not found for this masjid".to_string())
        })?;

    let name = masjid_name(&state, masjid_id).await?;
    Ok(Json(ApiResponse::success(DefaultScheduleView::new(schedule, name))))
}

/// POST /api/salahtimings/default-schedule
pub async fn create_default_schedule(
    State(state): State<AppState>,
    Json(payload): Json<CreateDefaultScheduleRequest>,
) -> ApiResult<impl IntoResponse> {
    if !db::masjids::exists(&state.db, payload.masjid_id).await? {
        return Err(ApiError::NotFound("Masjid not found".to_string()));
    }
    if db::default_schedules::exists_for_masjid(&state.db, payload.masjid_id).await? {
        return Err(ApiError::Conflict(
            "Default schedule already exists for this masjid".to_string(),
        ));
    }

    let schedule = db::default_schedules::create(
        &state.db,
        payload.masjid_id,
        &payload.times,
        time::now(),
    )
    .await?;

    tracing::info!(
        "Created default schedule {} for masjid {}",
        schedule.schedule_id,
        schedule.masjid_id
    );
    let name = masjid_name(&state, schedule.masjid_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            DefaultScheduleView::new(schedule, name),
            "Default schedule created successfully",
        )),
    ))
}

/// PUT /api/salahtimings/default-schedule/:schedule_id
pub async fn update_default_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<i64>,
    Json(payload): Json<UpdateDefaultScheduleRequest>,
) -> ApiResult<Json<ApiResponse<DefaultScheduleView>>> {
    let schedule =
        db::default_schedules::update(&state.db, schedule_id, &payload.times, time::now())
            .await?
            .ok_or_else(|| ApiError::NotFound("Default schedule not found".to_string()))?;

    let name = masjid_name(&state, schedule.masjid_id).await?;
    Ok(Json(ApiResponse::success_with_message(
        DefaultScheduleView::new(schedule, name),
        "Default schedule updated successfully",
    )))
}

/// DELETE /api/salahtimings/default-schedule/:schedule_id
pub async fn delete_default_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<bool>>> {
    if !db::default_schedules::delete(&state.db, schedule_id).await? {
        return Err(ApiError::NotFound("Default schedule not found".to_string()));
    }
    Ok(Json(ApiResponse::success_with_message(
        true,
        "Default schedule deleted successfully",
    )))
}

/// Build default schedule routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/salahtimings/default-schedule",
            post(create_default_schedule),
        )
        .route(
            "/api/salahtimings/default-schedule/masjid/:masjid_id",
            get(get_default_schedule),
        )
        .route(
            "/api/salahtimings/default-schedule/:schedule_id",
            put(update_default_schedule).delete(delete_default_schedule),
        )
}
