use axum::{routing::post, Json, Router};
use serde::Deserialize;

use crate::state::AppState;
use crate::tracking::arrival::{
    ArrivalEvaluator, ArrivalRequest, ArrivalResult, TransitEvaluator, WalkEvaluator,
};
use crate::types::plan::Itinerary;

/// Stateless single evaluations, for field debugging.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/transit/arrival/walk", post(walk))
        .route("/api/transit/arrival/transit", post(transit))
}

#[derive(Deserialize)]
struct ArrivalCheck {
    itinerary: Itinerary,
    #[serde(flatten)]
    request: ArrivalRequest,
}

async fn walk(Json(check): Json<ArrivalCheck>) -> Json<ArrivalResult> {
    Json(WalkEvaluator.evaluate(&check.itinerary, &check.request))
}

async fn transit(Json(check): Json<ArrivalCheck>) -> Json<ArrivalResult> {
    Json(TransitEvaluator.evaluate(&check.itinerary, &check.request))
}
