use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tracking::smoothing::SampleWindow;
use crate::types::plan::MetaData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Walking,
    Onboard,
    Transfer,
    Arrived,
    Cancelled,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Walking => "WALKING",
            Phase::Onboard => "ONBOARD",
            Phase::Transfer => "TRANSFER",
            Phase::Arrived => "ARRIVED",
            Phase::Cancelled => "CANCELLED",
        }
    }

    /// Terminal phases are never overwritten by implicit progress.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Arrived | Phase::Cancelled)
    }

    /// Phases the per-update mode derivation is allowed to replace.
    pub fn is_mode_derived(&self) -> bool {
        matches!(self, Phase::Walking | Phase::Onboard)
    }
}

/// Discrete traveler-confirmed events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripEvent {
    Board,
    Alight,
    TransferConfirmed,
    Arrived,
    Cancel,
}

impl TripEvent {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "BOARD" => Some(TripEvent::Board),
            "ALIGHT" => Some(TripEvent::Alight),
            "TRANSFER_CONFIRMED" => Some(TripEvent::TransferConfirmed),
            "ARRIVED" => Some(TripEvent::Arrived),
            "CANCEL" => Some(TripEvent::Cancel),
            _ => None,
        }
    }

    pub fn target_phase(&self) -> Phase {
        match self {
            TripEvent::Board => Phase::Onboard,
            TripEvent::Alight => Phase::Transfer,
            TripEvent::TransferConfirmed => Phase::Walking,
            TripEvent::Arrived => Phase::Arrived,
            TripEvent::Cancel => Phase::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripState {
    pub trip_id: String,
    pub itinerary_index: usize,
    pub leg_index: usize,
    pub step_index: Option<usize>,
    pub phase: Phase,
    #[serde(flatten)]
    pub window: SampleWindow,
    pub arrival_streak: u32,
    pub last_lat: Option<f64>,
    pub last_lon: Option<f64>,
    pub last_timestamp: Option<DateTime<Utc>>,
}

impl TripState {
    pub fn new(
        trip_id: impl Into<String>,
        itinerary_index: usize,
        leg_index: usize,
        step_index: Option<usize>,
        phase: Phase,
    ) -> Self {
        Self {
            trip_id: trip_id.into(),
            itinerary_index,
            leg_index,
            step_index,
            phase,
            window: SampleWindow::default(),
            arrival_streak: 0,
            last_lat: None,
            last_lon: None,
            last_timestamp: None,
        }
    }

    /// State of a trip seen for the first time.
    pub fn fresh(trip_id: impl Into<String>) -> Self {
        Self::new(trip_id, 0, 0, Some(0), Phase::Walking)
    }
}

/// One raw position report from the traveler's device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressSample {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub speed_mps: Option<f64>,
    #[serde(default)]
    pub timestamp_epoch_ms: Option<i64>,
    #[serde(default)]
    pub arrive_radius_m: Option<f64>,
    #[serde(default)]
    pub look_ahead_m: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub meta_data: MetaData,
    pub progress: ProgressSample,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidanceResponse {
    pub trip_id: String,
    pub itinerary_index: usize,
    pub leg_index: usize,
    pub step_index: Option<usize>,
    pub phase: Phase,
    pub tts: String,
    pub remaining_meters: f64,
    pub arrived: bool,
    pub arrival_confirmed: bool,
    pub next_instruction: Option<String>,
    pub current_station_index: Option<usize>,
    pub stops_left: Option<usize>,
}
