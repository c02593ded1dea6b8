use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;
use crate::types::plan::MetaData;
use crate::types::trip::{GuidanceResponse, Phase, ProgressUpdate, TripState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/transit/trips", post(create_trip))
        .route("/api/transit/trips/:trip_id", get(get_trip))
        .route("/api/transit/trips/:trip_id/progress", post(progress))
        .route("/api/transit/trips/:trip_id/event", post(event))
}

#[derive(Deserialize, Default)]
struct CreateTripRequest {
    #[serde(default)]
    meta_data: Option<MetaData>,
}

#[derive(Serialize, Deserialize)]
struct CreateTripResponse {
    trip_id: String,
    meta_data: Option<MetaData>,
}

async fn create_trip(
    State(state): State<AppState>,
    body: Option<Json<CreateTripRequest>>,
) -> Result<Json<CreateTripResponse>, AppError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let trip = state.coordinator().create_trip().await?;

    if let Some(meta) = &request.meta_data {
        tracing::info!(
            "Trip {} planned with {} itineraries",
            trip.trip_id,
            meta.plan.itineraries.len()
        );
    }

    Ok(Json(CreateTripResponse {
        trip_id: trip.trip_id,
        meta_data: request.meta_data,
    }))
}

async fn get_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Json<TripState>, AppError> {
    Ok(Json(state.coordinator().trip(&trip_id).await?))
}

async fn progress(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Json(update): Json<ProgressUpdate>,
) -> Result<Json<GuidanceResponse>, AppError> {
    let sample = &update.progress;
    if !sample.lat.is_finite() || !sample.lon.is_finite() {
        return Err(AppError::BadRequest("Coordinates must be finite".to_string()));
    }

    let response = state
        .coordinator()
        .update_progress(&trip_id, &update.meta_data.plan, sample)
        .await?;
    Ok(Json(response))
}

#[derive(Deserialize)]
struct EventRequest {
    #[serde(rename = "type")]
    event_type: String,
}

#[derive(Serialize, Deserialize)]
struct EventResponse {
    trip_id: String,
    phase: Phase,
}

async fn event(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Json(request): Json<EventRequest>,
) -> Result<Json<EventResponse>, AppError> {
    let trip = state
        .coordinator()
        .apply_event(&trip_id, &request.event_type)
        .await?;
    Ok(Json(EventResponse {
        trip_id: trip.trip_id,
        phase: trip.phase,
    }))
}
