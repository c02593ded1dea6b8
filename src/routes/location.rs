use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;
use crate::tracking::geo::{distance, GeoPoint};
use crate::tracking::phrases;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/location/track", post(track))
}

#[derive(Deserialize)]
struct TrackRequest {
    current_x: f64,
    current_y: f64,
    dest_x: f64,
    dest_y: f64,
    #[serde(default = "default_threshold")]
    threshold_meters: f64,
}

fn default_threshold() -> f64 {
    3.0
}

#[derive(Serialize, Deserialize)]
struct TrackResponse {
    distance_meters: f64,
    arrived: bool,
    off_route: bool,
    message: String,
}

/// Straight-line check against a single destination, without trip state.
async fn track(Json(req): Json<TrackRequest>) -> Result<Json<TrackResponse>, AppError> {
    let coords = [req.current_x, req.current_y, req.dest_x, req.dest_y];
    if coords.iter().any(|c| !c.is_finite()) {
        return Err(AppError::BadRequest("Coordinates must be finite".to_string()));
    }

    let dist = distance(
        GeoPoint::new(req.current_y, req.current_x),
        GeoPoint::new(req.dest_y, req.dest_x),
    );
    let arrived = dist <= req.threshold_meters;
    let message = if arrived {
        phrases::DESTINATION_REACHED.to_string()
    } else if dist < 100.0 {
        phrases::destination_near(dist.round())
    } else {
        phrases::destination_far(dist.round())
    };

    Ok(Json(TrackResponse {
        distance_meters: dist,
        arrived,
        off_route: false,
        message,
    }))
}
