//! Per-update orchestration: load, smooth, evaluate, apply hysteresis, persist.
//!
//! Updates and events for one trip are serialized by a per-trip lock held
//! across the whole load/mutate/save sequence. Distinct trips never contend.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::arrival::{self, ArrivalRequest, ArrivalResult};
use super::geo::GeoPoint;
use super::guidance::{guidance_text, terminal_text};
use crate::config::TrackingConfig;
use crate::error::{StoreError, TrackingError};
use crate::store::TripStore;
use crate::types::plan::Plan;
use crate::types::trip::{GuidanceResponse, Phase, ProgressSample, TripEvent, TripState};

pub struct ProgressCoordinator<S> {
    store: S,
    config: TrackingConfig,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl<S: TripStore> ProgressCoordinator<S> {
    pub fn new(store: S, config: TrackingConfig) -> Self {
        Self {
            store,
            config,
            locks: DashMap::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    pub async fn create_trip(&self) -> Result<TripState, TrackingError> {
        let trip_id = Uuid::new_v4().to_string();
        let state = self
            .bounded(self.store.init(&trip_id, 0, 0, Some(0), Phase::Walking))
            .await?;
        tracing::info!("Created trip {}", trip_id);
        Ok(state)
    }

    pub async fn trip(&self, trip_id: &str) -> Result<TripState, TrackingError> {
        self.bounded(self.store.load(trip_id))
            .await?
            .ok_or_else(|| TrackingError::TripNotFound(trip_id.to_string()))
    }

    pub async fn update_progress(
        &self,
        trip_id: &str,
        plan: &Plan,
        sample: &ProgressSample,
    ) -> Result<GuidanceResponse, TrackingError> {
        let lock = self.trip_lock(trip_id);
        let _guard = lock.lock().await;

        let mut state = match self.bounded(self.store.load(trip_id)).await? {
            Some(state) => state,
            None => {
                tracing::info!("No state for trip {}, starting fresh", trip_id);
                self.bounded(self.store.init(trip_id, 0, 0, Some(0), Phase::Walking))
                    .await?
            }
        };

        if let Some(speed) = sample.speed_mps {
            tracing::debug!("Trip {} reported speed {:.2} m/s", trip_id, speed);
        }

        let response = advance(&mut state, plan, sample, &self.config);

        if let Err(source) = self.bounded(self.store.save(trip_id, &state)).await {
            tracing::error!("Failed to save trip {}: {}", trip_id, source);
            return Err(TrackingError::Persistence {
                source,
                guidance: Some(Box::new(response)),
            });
        }

        Ok(response)
    }

    /// Applies a traveler-confirmed event. Unrecognized event types leave the
    /// phase untouched.
    pub async fn apply_event(&self, trip_id: &str, event_type: &str) -> Result<TripState, TrackingError> {
        let lock = self.trip_lock(trip_id);
        let _guard = lock.lock().await;

        let mut state = self
            .bounded(self.store.load(trip_id))
            .await?
            .ok_or_else(|| TrackingError::TripNotFound(trip_id.to_string()))?;

        match TripEvent::from_str(event_type) {
            Some(event) => {
                let phase = event.target_phase();
                tracing::info!(
                    "Trip {} event {}: {} -> {}",
                    trip_id,
                    event_type,
                    state.phase.as_str(),
                    phase.as_str()
                );
                state.phase = phase;
            }
            None => tracing::debug!("Ignoring unknown event {:?} for trip {}", event_type, trip_id),
        }

        self.bounded(self.store.save(trip_id, &state)).await?;
        Ok(state)
    }

    /// Drops lock entries no update is currently holding.
    pub fn prune_locks(&self) {
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    fn trip_lock(&self, trip_id: &str) -> Arc<Mutex<()>> {
        self.locks.entry(trip_id.to_string()).or_default().clone()
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        let limit = self.config.store_timeout;
        tokio::time::timeout(limit, call)
            .await
            .map_err(|_| StoreError::Timeout(limit))?
    }
}

/// Runs one update against `state` in place and returns the response.
pub fn advance(
    state: &mut TripState,
    plan: &Plan,
    sample: &ProgressSample,
    config: &TrackingConfig,
) -> GuidanceResponse {
    if state.phase.is_terminal() {
        record_sample(state, sample);
        let tts = terminal_text(state.phase);
        return respond(state, tts, &ArrivalResult::not_found(), false);
    }

    state.window.push(sample.lat, sample.lon, config.median_window);
    let position = state.window.median_point().unwrap_or_else(|| {
        tracing::debug!("Empty sample window for trip {}, using raw sample", state.trip_id);
        GeoPoint::new(sample.lat, sample.lon)
    });

    let Some((itinerary_index, itinerary)) = clamp_get(&plan.itineraries, state.itinerary_index) else {
        return route_not_found(state, sample);
    };
    state.itinerary_index = itinerary_index;

    let Some((leg_index, leg)) = clamp_get(&itinerary.legs, state.leg_index) else {
        return route_not_found(state, sample);
    };
    state.leg_index = leg_index;

    let mode = leg.mode();
    let params = if mode.is_transit() {
        config.transit
    } else {
        config.walk
    };

    let req = ArrivalRequest {
        curr_lat: position.lat,
        curr_lon: position.lon,
        leg_index,
        step_index: state.step_index,
        arrive_radius_m: sample.arrive_radius_m.unwrap_or(params.arrive_radius_m),
        look_ahead_m: sample.look_ahead_m.or(params.look_ahead_m),
    };
    let result = arrival::evaluate(&mode, itinerary, &req);

    if result.arrived {
        state.arrival_streak = state.arrival_streak.saturating_add(1);
    } else {
        state.arrival_streak = 0;
    }
    let confirmed = result.arrived && state.arrival_streak >= config.arrival_hysteresis_n;

    if confirmed {
        if let Some(next_leg) = result.next_leg_index {
            let bounded = next_leg.min(itinerary.legs.len() - 1);
            if bounded != state.leg_index {
                state.leg_index = bounded;
                state.step_index = Some(0);
            }
        }
        if let Some(next_step) = result.next_step_index {
            state.step_index = Some(next_step);
        }
        state.arrival_streak = 0;
        tracing::info!(
            "Trip {} confirmed arrival, now at leg {} step {:?}",
            state.trip_id,
            state.leg_index,
            state.step_index
        );
    } else if result.arrived {
        tracing::debug!(
            "Trip {} arrival signal {}/{}, holding position",
            state.trip_id,
            state.arrival_streak,
            config.arrival_hysteresis_n
        );
    }

    if state.phase.is_mode_derived() {
        state.phase = if mode.is_transit() {
            Phase::Onboard
        } else {
            Phase::Walking
        };
    }

    record_sample(state, sample);

    let tts = guidance_text(&result, state, itinerary, leg);
    respond(state, tts, &result, confirmed)
}

/// Clamps `index` into the list and returns the element, `None` for an empty list.
fn clamp_get<T>(items: &[T], index: usize) -> Option<(usize, &T)> {
    let last = items.len().checked_sub(1)?;
    let index = index.min(last);
    Some((index, &items[index]))
}

fn route_not_found(state: &mut TripState, sample: &ProgressSample) -> GuidanceResponse {
    tracing::warn!("Trip {} has no usable itinerary or leg in the supplied plan", state.trip_id);
    state.arrival_streak = 0;
    record_sample(state, sample);
    let result = ArrivalResult::not_found();
    let tts = result.current_instruction.clone();
    respond(state, tts, &result, false)
}

fn record_sample(state: &mut TripState, sample: &ProgressSample) {
    state.last_lat = Some(sample.lat);
    state.last_lon = Some(sample.lon);
    state.last_timestamp = Some(
        sample
            .timestamp_epoch_ms
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .unwrap_or_else(Utc::now),
    );
}

fn respond(state: &TripState, tts: String, result: &ArrivalResult, confirmed: bool) -> GuidanceResponse {
    let remaining_meters = if result.remaining_meters.is_finite() {
        result.remaining_meters.max(0.0)
    } else {
        0.0
    };

    GuidanceResponse {
        trip_id: state.trip_id.clone(),
        itinerary_index: state.itinerary_index,
        leg_index: state.leg_index,
        step_index: state.step_index,
        phase: state.phase,
        tts,
        remaining_meters,
        arrived: result.arrived,
        arrival_confirmed: confirmed,
        next_instruction: result.next_instruction.clone(),
        current_station_index: result.current_station_index,
        stops_left: result.stops_left,
    }
}
