use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::types::trip::GuidanceResponse;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Trip store unavailable: {0}")]
    Unavailable(String),
    #[error("Trip store did not respond within {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error("Trip not found: {0}")]
    TripNotFound(String),
    /// The update was computed but could not be persisted.
    #[error("Failed to persist trip state: {source}")]
    Persistence {
        #[source]
        source: StoreError,
        guidance: Option<Box<GuidanceResponse>>,
    },
}

impl From<StoreError> for TrackingError {
    fn from(source: StoreError) -> Self {
        TrackingError::Persistence {
            source,
            guidance: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Tracking(#[from] TrackingError),
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, body) = match self {
            AppError::Tracking(TrackingError::TripNotFound(_)) => {
                (StatusCode::NOT_FOUND, json!({ "error": message }))
            }
            AppError::Tracking(TrackingError::Persistence { guidance, .. }) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": message, "guidance": guidance }),
            ),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
        };

        (status, Json(body)).into_response()
    }
}
