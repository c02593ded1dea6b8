mod transit;
mod walk;

pub use transit::TransitEvaluator;
pub use walk::WalkEvaluator;

use serde::{Deserialize, Serialize};

use super::geo::{parse_polyline, polyline_length, GeoPoint};
use super::phrases;
use super::snap::snap_to_polyline;
use crate::types::plan::{Itinerary, LegMode};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrivalRequest {
    pub curr_lat: f64,
    pub curr_lon: f64,
    pub leg_index: usize,
    #[serde(default)]
    pub step_index: Option<usize>,
    pub arrive_radius_m: f64,
    #[serde(default)]
    pub look_ahead_m: Option<f64>,
}

impl ArrivalRequest {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.curr_lat, self.curr_lon)
    }
}

/// Outcome of one arrival evaluation. `remaining_meters` is NaN when no
/// usable geometry was found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrivalResult {
    pub arrived: bool,
    pub remaining_meters: f64,
    pub current_instruction: String,
    pub next_instruction: Option<String>,
    pub next_leg_index: Option<usize>,
    pub next_step_index: Option<usize>,
    pub current_station_index: Option<usize>,
    pub stops_left: Option<usize>,
}

impl ArrivalResult {
    pub fn not_found() -> Self {
        Self {
            arrived: false,
            remaining_meters: f64::NAN,
            current_instruction: phrases::ROUTE_NOT_FOUND.to_string(),
            next_instruction: None,
            next_leg_index: None,
            next_step_index: None,
            current_station_index: None,
            stops_left: None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.remaining_meters.is_nan()
    }
}

pub trait ArrivalEvaluator {
    fn evaluate(&self, itinerary: &Itinerary, req: &ArrivalRequest) -> ArrivalResult;
}

/// Evaluates with the variant matching `mode`. Unrecognized modes fall back to walking.
pub fn evaluate(mode: &LegMode, itinerary: &Itinerary, req: &ArrivalRequest) -> ArrivalResult {
    match mode {
        LegMode::Walk => WalkEvaluator.evaluate(itinerary, req),
        LegMode::Bus | LegMode::Subway => TransitEvaluator.evaluate(itinerary, req),
        LegMode::Other(raw) => {
            tracing::warn!("Unrecognized leg mode {:?}, evaluating as walk", raw);
            WalkEvaluator.evaluate(itinerary, req)
        }
    }
}

struct Progress {
    remaining_meters: f64,
    arrived: bool,
}

/// Remaining along-path distance to the end of the polyline text, or `None`
/// when it holds no geometry.
fn measure(line: Option<&str>, req: &ArrivalRequest) -> Option<Progress> {
    let points = parse_polyline(line);
    let snap = snap_to_polyline(req.position(), &points)?;
    let total = polyline_length(&points);
    let remaining_meters = (total - snap.meters_from_start).max(0.0);
    Some(Progress {
        remaining_meters,
        arrived: remaining_meters <= req.arrive_radius_m,
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::types::plan::{Itinerary, Leg, PassShape, PassStopList, Place, Station, WalkStep};

    pub fn step(description: &str, linestring: Option<&str>) -> WalkStep {
        WalkStep {
            description: Some(description.to_string()),
            linestring: linestring.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn walk_leg(shape: Option<&str>, steps: Vec<WalkStep>) -> Leg {
        Leg {
            mode: Some("WALK".to_string()),
            steps: Some(steps),
            pass_shape: shape.map(|s| PassShape {
                linestring: Some(s.to_string()),
            }),
            ..Default::default()
        }
    }

    pub fn station(name: &str, lon: &str, lat: &str) -> Station {
        Station {
            station_name: Some(name.to_string()),
            lon: Some(lon.to_string()),
            lat: Some(lat.to_string()),
            ..Default::default()
        }
    }

    pub fn transit_leg(mode: &str, from: &str, to: &str, shape: &str, stations: Vec<Station>) -> Leg {
        Leg {
            mode: Some(mode.to_string()),
            start: Some(Place {
                name: Some(from.to_string()),
                ..Default::default()
            }),
            end: Some(Place {
                name: Some(to.to_string()),
                ..Default::default()
            }),
            pass_stop_list: Some(PassStopList { stations }),
            pass_shape: Some(PassShape {
                linestring: Some(shape.to_string()),
            }),
            ..Default::default()
        }
    }

    pub fn itinerary(legs: Vec<Leg>) -> Itinerary {
        Itinerary {
            legs,
            ..Default::default()
        }
    }
}
