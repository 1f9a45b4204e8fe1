//! Daily additional timing endpoints (sunrise, sunset, zawal, tahajjud,
//! sehri end, iftar)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use salah_common::api::{ApiResponse, PagedResponse};
use salah_common::db::models::AdditionalTimings;
use salah_common::time;

use crate::db::additional::{AdditionalTimingsUpdate, NewAdditionalTimings};
use crate::pagination::{self, page_window};
use crate::{db, ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdditionalListQuery {
    #[serde(default = "pagination::default_page_number")]
    pub page_number: i64,
    #[serde(default = "pagination::default_page_size")]
    pub page_size: i64,
    pub masjid_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateAdditionalTimingsRequest {
    pub masjid_id: i64,
    pub date: NaiveDate,
    #[serde(default, with = "time::hhmm_opt")]
    pub sunrise_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub sunset_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub zawal_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub tahajjud_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub sehri_end_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub iftar_time: Option<NaiveTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateAdditionalTimingsRequest {
    pub date: Option<NaiveDate>,
    #[serde(default, with = "time::hhmm_opt")]
    pub sunrise_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub sunset_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub zawal_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub tahajjud_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub sehri_end_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm_opt")]
    pub iftar_time: Option<NaiveTime>,
}

/// GET /api/additionaltimings
pub async fn list_additional_timings(
    State(state): State<AppState>,
    Query(query): Query<AdditionalListQuery>,
) -> ApiResult<Json<ApiResponse<PagedResponse<AdditionalTimings>>>> {
    let window = page_window(query.page_number, query.page_size);
    let (timings, total) = db::additional::list(&state.db, window, query.masjid_id).await?;
    let page = PagedResponse::new(timings, total, window.page_number, window.page_size);
    Ok(Json(ApiResponse::success(page)))
}

/// GET /api/additionaltimings/:additional_id
pub async fn get_additional_timings(
    State(state): State<AppState>,
    Path(additional_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<AdditionalTimings>>> {
    let timings = db::additional::get(&state.db, additional_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Additional timings not found".to_string()))?;
    Ok(Json(ApiResponse::success(timings)))
}

/// GET /api/additionaltimings/masjid/:masjid_id/date/:date
///
/// Exact date match, else the masjid's latest row. There is no default
/// template for additional timings and no today gate.
pub async fn get_additional_timings_for_date(
    State(state): State<AppState>,
    Path((masjid_id, raw_date)): Path<(i64, String)>,
) -> ApiResult<Json<ApiResponse<AdditionalTimings>>> {
    let date = time::parse_date(&raw_date)?;

    let timings = match db::additional::get_by_masjid_and_date(&state.db, masjid_id, date).await? {
        Some(exact) => Some(exact),
        None => db::additional::latest_for_masjid(&state.db, masjid_id).await?,
    }
    .ok_or_else(|| ApiError::NotFound("No additional timings found for this masjid".to_string()))?;

    Ok(Json(ApiResponse::success(timings)))
}

/// POST /api/additionaltimings
pub async fn create_additional_timings(
    State(state): State<AppState>,
    Json(payload): Json<CreateAdditionalTimingsRequest>,
) -> ApiResult<impl IntoResponse> {
    if !db::masjids::exists(&state.db, payload.masjid_id).await? {
        return Err(ApiError::NotFound("Masjid not found".to_string()));
    }
    if db::additional::exists(&state.db, payload.masjid_id, payload.date).await? {
        return Err(ApiError::Conflict(
            "Additional timings already exist for this masjid and date".to_string(),
        ));
    }

    let timings = db::additional::create(
        &state.db,
        &NewAdditionalTimings {
            masjid_id: payload.masjid_id,
            date: payload.date,
            sunrise_time: payload.sunrise_time,
            sunset_time: payload.sunset_time,
            zawal_time: payload.zawal_time,
            tahajjud_time: payload.tahajjud_time,
            sehri_end_time: payload.sehri_end_time,
            iftar_time: payload.iftar_time,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            timings,
            "Additional timings created successfully",
        )),
    ))
}

/// PUT /api/additionaltimings/:additional_id
pub async fn update_additional_timings(
    State(state): State<AppState>,
    Path(additional_id): Path<i64>,
    Json(payload): Json<UpdateAdditionalTimingsRequest>,
) -> ApiResult<Json<ApiResponse<AdditionalTimings>>> {
    let timings = db::additional::update(
        &state.db,
        additional_id,
        &AdditionalTimingsUpdate {
            date: payload.date,
            sunrise_time: payload.sunrise_time,
            sunset_time: payload.sunset_time,
            zawal_time: payload.zawal_time,
            tahajjud_time: payload.tahajjud_time,
            sehri_end_time: payload.sehri_end_time,
            iftar_time: payload.iftar_time,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Additional timings not found".to_string()))?;

    Ok(Json(ApiResponse::success_with_message(
        timings,
        "Additional timings updated successfully",
    )))
}

/// DELETE /api/additionaltimings/:additional_id
pub async fn delete_additional_timings(
    State(state): State<AppState>,
    Path(additional_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<bool>>> {
    if !db::additional::delete(&state.db, additional_id).await? {
        return Err(ApiError::NotFound("Additional timings not found".to_string()));
    }
    Ok(Json(ApiResponse::success_with_message(
        true,
        "Additional timings deleted successfully",
    )))
}

/// Build additional timing routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/additionaltimings",
            get(list_additional_timings).post(create_additional_timings),
        )
        .route(
            "/api/additionaltimings/:additional_id",
            get(get_additional_timings)
                .put(update_additional_timings)
                .delete(delete_additional_timings),
        )
        .route(
            "/api/additionaltimings/masjid/:masjid_id/date/:date",
            get(get_additional_timings_for_date),
        )
}
