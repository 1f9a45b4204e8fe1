//! Salah timing endpoints
//!
//! Carries the two read paths the mobile client lives on: the resolved
//! timing for one masjid and date (with `IsDefault`/`IsFallback`
//! provenance) and the combined daily schedule.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use salah_common::api::{ApiResponse, PagedResponse};
use salah_common::db::models::{AdditionalTimings, PrayerTimes, SalahTiming, SpecialEvent};
use salah_common::time;

use crate::db::masjids::MasjidSummary;
use crate::db::timings::{NewSalahTiming, SalahTimingUpdate};
use crate::pagination::{self, page_window};
use crate::schedule::{self, DailySchedule, ResolvedTiming};
use crate::{db, ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimingListQuery {
    #[serde(default = "pagination::default_page_number")]
    pub page_number: i64,
    #[serde(default = "pagination::default_page_size")]
    pub page_size: i64,
    pub masjid_id: Option<i64>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DateRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateSalahTimingRequest {
    pub masjid_id: i64,
    pub date: NaiveDate,
    pub islamic_date: Option<String>,
    #[serde(flatten)]
    pub times: PrayerTimes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchCreateSalahTimingRequest {
    pub masjid_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(flatten)]
    pub times: PrayerTimes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateSalahTimingRequest {
    pub date: Option<NaiveDate>,
    pub islamic_date: Option<String>,
    #[serde(flatten)]
    pub times: PrayerTimes,
}

/// A resolved timing as presented to clients, with provenance flags
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SalahTimingView {
    /// Backing row id; absent when the view comes from the default schedule
    pub salah_id: Option<i64>,
    pub masjid_id: i64,
    pub masjid_name: String,
    pub date: NaiveDate,
    pub islamic_date: Option<String>,
    #[serde(flatten)]
    pub times: PrayerTimes,
    pub is_default: bool,
    pub is_fallback: bool,
}

impl SalahTimingView {
    pub fn new(resolved: ResolvedTiming, masjid_name: String) -> Self {
        Self {
            salah_id: resolved.salah_id,
            masjid_id: resolved.masjid_id,
            masjid_name,
            date: resolved.date,
            islamic_date: resolved.islamic_date.clone(),
            is_default: resolved.is_default(),
            is_fallback: resolved.is_fallback(),
            times: resolved.times,
        }
    }
}

/// The combined per-day view
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DailyScheduleView {
    pub date: NaiveDate,
    pub islamic_date: Option<String>,
    pub masjid: MasjidSummary,
    pub salah_timing: Option<SalahTimingView>,
    pub additional_timings: Option<AdditionalTimings>,
    pub special_events: Vec<SpecialEvent>,
}

impl From<DailySchedule> for DailyScheduleView {
    fn from(schedule: DailySchedule) -> Self {
        let masjid_name = schedule.masjid.masjid_name.clone();
        Self {
            date: schedule.date,
            islamic_date: schedule.islamic_date,
            salah_timing: schedule
                .timing
                .map(|timing| SalahTimingView::new(timing, masjid_name)),
            masjid: schedule.masjid,
            additional_timings: schedule.additional_timings,
            special_events: schedule.special_events,
        }
    }
}

/// GET /api/salahtimings
pub async fn list_salah_timings(
    State(state): State<AppState>,
    Query(query): Query<TimingListQuery>,
) -> ApiResult<Json<ApiResponse<PagedResponse<SalahTiming>>>> {
    let window = page_window(query.page_number, query.page_size);
    let (timings, total) =
        db::timings::list(&state.db, window, query.masjid_id, query.date).await?;
    let page = PagedResponse::new(timings, total, window.page_number, window.page_size);
    Ok(Json(ApiResponse::success(page)))
}

/// GET /api/salahtimings/:salah_id
pub async fn get_salah_timing(
    State(state): State<AppState>,
    Path(salah_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<SalahTiming>>> {
    let timing = db::timings::get(&state.db, salah_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Salah timing not found".to_string()))?;
    Ok(Json(ApiResponse::success(timing)))
}

/// GET /api/salahtimings/masjid/:masjid_id
pub async fn list_salah_timings_by_masjid(
    State(state): State<AppState>,
    Path(masjid_id): Path<i64>,
    Query(query): Query<DateRangeQuery>,
) -> ApiResult<Json<ApiResponse<Vec<SalahTiming>>>> {
    let timings =
        db::timings::list_by_masjid(&state.db, masjid_id, query.start_date, query.end_date)
            .await?;
    Ok(Json(ApiResponse::success(timings)))
}

/// GET /api/salahtimings/masjid/:masjid_id/date/:date
///
/// The resolved timing for one masjid and date: exact row, else default
/// schedule (today only), else the masjid's latest row. 404 when the masjid
/// has no timing data at all.
pub async fn get_timing_for_masjid_and_date(
    State(state): State<AppState>,
    Path((masjid_id, raw_date)): Path<(i64, String)>,
) -> ApiResult<Json<ApiResponse<SalahTimingView>>> {
    let date = time::parse_date(&raw_date)?;
    let today = time::local_today();

    let resolved = schedule::resolve_timing(&state.db, masjid_id, date, today)
        .await?
        .ok_or_else(|| ApiError::NotFound("No salah timing found for this masjid".to_string()))?;

    let masjid_name = db::masjids::get_summary(&state.db, masjid_id)
        .await?
        .map(|masjid| masjid.masjid_name)
        .unwrap_or_default();

    Ok(Json(ApiResponse::success(SalahTimingView::new(resolved, masjid_name))))
}

/// GET /api/salahtimings/daily-schedule/masjid/:masjid_id/date/:date
///
/// 404 only when the masjid itself does not exist; a masjid with no data
/// yields a successful, empty schedule.
pub async fn get_daily_schedule(
    State(state): State<AppState>,
    Path((masjid_id, raw_date)): Path<(i64, String)>,
) -> ApiResult<Json<ApiResponse<DailyScheduleView>>> {
    let date = time::parse_date(&raw_date)?;
    let today = time::local_today();

    let schedule = schedule::daily_schedule(&state.db, masjid_id, date, today)
        .await?
        .ok_or_else(|| ApiError::NotFound("Masjid not found".to_string()))?;

    Ok(Json(ApiResponse::success(DailyScheduleView::from(schedule))))
}

/// POST /api/salahtimings
pub async fn create_salah_timing(
    State(state): State<AppState>,
    Json(payload): Json<CreateSalahTimingRequest>,
) -> ApiResult<impl IntoResponse> {
    if !db::masjids::exists(&state.db, payload.masjid_id).await? {
        return Err(ApiError::NotFound("Masjid not found".to_string()));
    }
    if db::timings::exists(&state.db, payload.masjid_id, payload.date).await? {
        return Err(ApiError::Conflict(
            "Salah timing already exists for this masjid and date".to_string(),
        ));
    }

    let timing = db::timings::create(
        &state.db,
        &NewSalahTiming {
            masjid_id: payload.masjid_id,
            date: payload.date,
            islamic_date: payload.islamic_date,
            times: payload.times,
        },
    )
    .await?;

    tracing::info!(
        "Created salah timing {} for masjid {} on {}",
        timing.salah_id,
        timing.masjid_id,
        timing.date
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(timing, "Salah timing created successfully")),
    ))
}

/// POST /api/salahtimings/batch
///
/// One row per date over an inclusive range; dates that already have a row
/// are left untouched. Returns the number of rows created.
pub async fn batch_create_salah_timings(
    State(state): State<AppState>,
    Json(payload): Json<BatchCreateSalahTimingRequest>,
) -> ApiResult<impl IntoResponse> {
    if !db::masjids::exists(&state.db, payload.masjid_id).await? {
        return Err(ApiError::NotFound("Masjid not found".to_string()));
    }

    let inserted = db::timings::create_range(
        &state.db,
        payload.masjid_id,
        payload.start_date,
        payload.end_date,
        &payload.times,
    )
    .await?;

    tracing::info!(
        "Batch created {} salah timings for masjid {} ({} to {})",
        inserted,
        payload.masjid_id,
        payload.start_date,
        payload.end_date
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            inserted,
            format!("Created {inserted} salah timings"),
        )),
    ))
}

/// PUT /api/salahtimings/:salah_id
pub async fn update_salah_timing(
    State(state): State<AppState>,
    Path(salah_id): Path<i64>,
    Json(payload): Json<UpdateSalahTimingRequest>,
) -> ApiResult<Json<ApiResponse<SalahTiming>>> {
    let timing = db::timings::update(
        &state.db,
        salah_id,
        &SalahTimingUpdate {
            date: payload.date,
            islamic_date: payload.islamic_date,
            times: payload.times,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Salah timing not found".to_string()))?;

    Ok(Json(ApiResponse::success_with_message(timing, "Salah timing updated successfully")))
}

/// DELETE /api/salahtimings/:salah_id
pub async fn delete_salah_timing(
    State(state): State<AppState>,
    Path(salah_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<bool>>> {
    if !db::timings::delete(&state.db, salah_id).await? {
        return Err(ApiError::NotFound("Salah timing not found".to_string()));
    }
    Ok(Json(ApiResponse::success_with_message(true, "Salah timing deleted successfully")))
}

/// Build salah timing routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/salahtimings",
            get(list_salah_timings).post(create_salah_timing),
        )
        .route("/api/salahtimings/batch", post(batch_create_salah_timings))
        .route(
            "/api/salahtimings/:salah_id",
            get(get_salah_timing)
                .put(update_salah_timing)
                .delete(delete_salah_timing),
        )
        .route(
            "/api/salahtimings/masjid/:masjid_id",
            get(list_salah_timings_by_masjid),
        )
        .route(
            "/api/salahtimings/masjid/:masjid_id/date/:date",
            get(get_timing_for_masjid_and_date),
        )
        .route(
            "/api/salahtimings/daily-schedule/masjid/:masjid_id/date/:date",
            get(get_daily_schedule),
        )
}
