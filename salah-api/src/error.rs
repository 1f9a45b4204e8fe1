//! Error types for salah-api
//!
//! Handlers return [`ApiError`]; the `IntoResponse` impl turns every variant
//! into an envelope-shaped body (`Success: false`) with the matching HTTP
//! status, so clients always see one response shape.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use salah_common::api::ApiResponse;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Row already exists for its unique key (409)
    #[error("{0}")]
    Conflict(String),

    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),
}

impl From<salah_common::Error> for ApiError {
    fn from(err: salah_common::Error) -> Self {
        use salah_common::Error;
        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::Conflict(msg) => ApiError::Conflict(msg),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            // A lost duplicate-create race surfaces as a constraint error;
            // report it the same way as the checked path.
            Error::Database(ref db_err) if is_unique_violation(db_err) => {
                ApiError::Conflict("Resource already exists".to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::from(salah_common::Error::Database(err))
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.message().contains("UNIQUE constraint failed"))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, envelope) = match self {
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ApiResponse::<serde_json::Value>::not_found(msg),
            ),
            ApiError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ApiResponse::error(msg, Vec::new()),
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::error(msg, Vec::new()),
            ),
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::error("An unexpected error occurred", vec![msg]),
                )
            }
        };

        (status, Json(envelope)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_not_found_maps_to_404_envelope() {
        let response = ApiError::NotFound("Masjid not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["Success"], false);
        assert_eq!(body["Message"], "Masjid not found");
        assert_eq!(body["Data"], serde_json::Value::Null);
        assert_eq!(body["Errors"][0], "Resource not found");
    }

    #[test]
    fn test_common_conflict_maps_to_conflict() {
        let err = ApiError::from(salah_common::Error::Conflict("exists".to_string()));
        assert!(matches!(err, ApiError::Conflict(_)));
    }
}
