//! salah-api library - masjid directory and prayer schedule service
//!
//! HTTP service storing the geographic hierarchy (state, city, masjid),
//! per-date prayer timing records, per-masjid default schedules, additional
//! daily timings and special events, and resolving the schedule to present
//! for any masjid and date.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod pagination;
pub mod schedule;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
///
/// The CORS layer is permissive: the service is consumed directly by the
/// mobile client from arbitrary origins.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health::routes())
        .merge(api::locations::routes())
        .merge(api::masjids::routes())
        .merge(api::timings::routes())
        .merge(api::default_schedule::routes())
        .merge(api::additional::routes())
        .merge(api::events::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
