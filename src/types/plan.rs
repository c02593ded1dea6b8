//! Route plan as produced by the upstream transit planner.
//!
//! Field names follow the upstream camelCase wire format. Everything here is
//! read-only for the lifetime of a trip.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaData {
    #[serde(default)]
    pub plan: Plan,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(default)]
    pub itineraries: Vec<Itinerary>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    #[serde(default)]
    pub total_time: Option<i64>,
    #[serde(default)]
    pub total_distance: Option<i64>,
    #[serde(default)]
    pub transfer_count: Option<i64>,
    #[serde(default)]
    pub path_type: Option<i64>,
    #[serde(default)]
    pub legs: Vec<Leg>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub section_time: Option<i64>,
    #[serde(default)]
    pub distance: Option<i64>,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub start: Option<Place>,
    #[serde(default)]
    pub end: Option<Place>,
    #[serde(default)]
    pub steps: Option<Vec<WalkStep>>,
    #[serde(default)]
    pub pass_stop_list: Option<PassStopList>,
    #[serde(default)]
    pub pass_shape: Option<PassShape>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub lat: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkStep {
    #[serde(default)]
    pub street_name: Option<String>,
    #[serde(default)]
    pub distance: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub linestring: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassStopList {
    #[serde(default)]
    pub stations: Vec<Station>,
}

/// A boarding/alighting stop. Coordinates arrive as text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    #[serde(default)]
    pub index: Option<i64>,
    #[serde(default)]
    pub station_name: Option<String>,
    #[serde(default)]
    pub lon: Option<String>,
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default, rename = "stationID")]
    pub station_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassShape {
    #[serde(default)]
    pub linestring: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegMode {
    Walk,
    Bus,
    Subway,
    Other(String),
}

impl LegMode {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "WALK" | "" => LegMode::Walk,
            "BUS" => LegMode::Bus,
            "SUBWAY" => LegMode::Subway,
            other => LegMode::Other(other.to_string()),
        }
    }

    pub fn is_transit(&self) -> bool {
        matches!(self, LegMode::Bus | LegMode::Subway)
    }
}

impl Leg {
    /// Mode tag of the leg; an absent tag is treated as walking.
    pub fn mode(&self) -> LegMode {
        self.mode
            .as_deref()
            .map(LegMode::from_str)
            .unwrap_or(LegMode::Walk)
    }

    pub fn steps(&self) -> &[WalkStep] {
        self.steps.as_deref().unwrap_or(&[])
    }

    pub fn stations(&self) -> &[Station] {
        self.pass_stop_list
            .as_ref()
            .map(|list| list.stations.as_slice())
            .unwrap_or(&[])
    }

    pub fn shape(&self) -> Option<&str> {
        self.pass_shape.as_ref().and_then(|s| s.linestring.as_deref())
    }

    pub fn start_name(&self) -> &str {
        self.start
            .as_ref()
            .and_then(|p| p.name.as_deref())
            .unwrap_or("")
    }

    pub fn end_name(&self) -> &str {
        self.end
            .as_ref()
            .and_then(|p| p.name.as_deref())
            .unwrap_or("")
    }
}
