use super::{measure, ArrivalEvaluator, ArrivalRequest, ArrivalResult};
use crate::tracking::geo::parse_polyline;
use crate::tracking::phrases;
use crate::types::plan::{Itinerary, Leg, WalkStep};

/// Walking legs: prefers the current step's own line, falling back to the
/// whole-leg shape.
pub struct WalkEvaluator;

impl ArrivalEvaluator for WalkEvaluator {
    fn evaluate(&self, itinerary: &Itinerary, req: &ArrivalRequest) -> ArrivalResult {
        let Some(leg) = itinerary.legs.get(req.leg_index) else {
            return ArrivalResult::not_found();
        };

        let step = req.step_index.and_then(|i| leg.steps().get(i));
        let (line, current) = match step {
            Some(step) if has_geometry(step) => (step.linestring.as_deref(), step.description.clone()),
            _ => (leg.shape(), None),
        };

        let Some(progress) = measure(line, req) else {
            return ArrivalResult::not_found();
        };

        let following = next_step(leg, req.step_index);

        let mut next_instruction = None;
        let mut next_leg_index = None;
        let mut next_step_index = None;

        if progress.arrived {
            match following {
                Some((index, step)) => {
                    next_step_index = Some(index);
                    next_instruction = step.description.clone();
                }
                None => next_leg_index = Some(req.leg_index + 1),
            }
        } else if let Some(look_ahead) = req.look_ahead_m {
            if progress.remaining_meters <= look_ahead {
                next_instruction = following.and_then(|(_, step)| step.description.clone());
            }
        }

        let current_instruction = current
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| phrases::GO_STRAIGHT.to_string());

        ArrivalResult {
            arrived: progress.arrived,
            remaining_meters: progress.remaining_meters,
            current_instruction,
            next_instruction,
            next_leg_index,
            next_step_index,
            current_station_index: None,
            stops_left: None,
        }
    }
}

fn has_geometry(step: &WalkStep) -> bool {
    !parse_polyline(step.linestring.as_deref()).is_empty()
}

fn next_step(leg: &Leg, step_index: Option<usize>) -> Option<(usize, &WalkStep)> {
    let next = step_index? + 1;
    leg.steps().get(next).map(|step| (next, step))
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::tracking::geo::{distance, GeoPoint};

    // Roughly 111 m along the equator.
    const SHAPE: &str = "0,0 0.001,0";

    fn req(lon: f64, step_index: Option<usize>, look_ahead_m: Option<f64>) -> ArrivalRequest {
        ArrivalRequest {
            curr_lat: 0.0,
            curr_lon: lon,
            leg_index: 0,
            step_index,
            arrive_radius_m: 10.0,
            look_ahead_m,
        }
    }

    fn two_step_leg() -> Itinerary {
        itinerary(vec![walk_leg(
            Some("0,0 0.002,0"),
            vec![
                step("Walk east on Main St", Some(SHAPE)),
                step("Turn left at the crossing", Some("0.001,0 0.002,0")),
            ],
        )])
    }

    #[test]
    fn uses_step_line_and_description() {
        let res = WalkEvaluator.evaluate(&two_step_leg(), &req(0.0005, Some(0), None));
        assert!(!res.arrived);
        assert_eq!(res.current_instruction, "Walk east on Main St");
        let half = distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.0005));
        assert!((res.remaining_meters - half).abs() < 0.01);
    }

    #[test]
    fn arrival_advances_to_next_step() {
        let res = WalkEvaluator.evaluate(&two_step_leg(), &req(0.00099, Some(0), None));
        assert!(res.arrived);
        assert_eq!(res.next_step_index, Some(1));
        assert_eq!(res.next_leg_index, None);
        assert_eq!(res.next_instruction.as_deref(), Some("Turn left at the crossing"));
    }

    #[test]
    fn arrival_on_last_step_advances_leg_without_clamping() {
        let res = WalkEvaluator.evaluate(&two_step_leg(), &req(0.002, Some(1), None));
        assert!(res.arrived);
        assert_eq!(res.next_step_index, None);
        assert_eq!(res.next_leg_index, Some(1));
    }

    #[test]
    fn look_ahead_previews_without_advancing() {
        // About 45 m short of the step end with a 50 m look-ahead.
        let lon = 0.001 - 45.0 / 111_194.93;
        let res = WalkEvaluator.evaluate(&two_step_leg(), &req(lon, Some(0), Some(50.0)));
        assert!(!res.arrived);
        assert!((res.remaining_meters - 45.0).abs() < 0.5);
        assert_eq!(res.next_instruction.as_deref(), Some("Turn left at the crossing"));
        assert_eq!(res.next_step_index, None);
        assert_eq!(res.next_leg_index, None);
    }

    #[test]
    fn beyond_look_ahead_has_no_preview() {
        let res = WalkEvaluator.evaluate(&two_step_leg(), &req(0.0001, Some(0), Some(50.0)));
        assert_eq!(res.next_instruction, None);
    }

    #[test]
    fn step_without_line_falls_back_to_shape() {
        let itin = itinerary(vec![walk_leg(Some(SHAPE), vec![step("Cross here", None)])]);
        let res = WalkEvaluator.evaluate(&itin, &req(0.0005, Some(0), None));
        assert!(!res.is_not_found());
        assert_eq!(res.current_instruction, phrases::GO_STRAIGHT);
    }

    #[test]
    fn missing_step_index_uses_shape_and_advances_leg() {
        let itin = itinerary(vec![walk_leg(Some(SHAPE), vec![])]);
        let res = WalkEvaluator.evaluate(&itin, &req(0.001, None, None));
        assert!(res.arrived);
        assert_eq!(res.next_leg_index, Some(1));
        assert_eq!(res.current_instruction, phrases::GO_STRAIGHT);
    }

    #[test]
    fn out_of_range_leg_is_not_found() {
        let itin = itinerary(vec![walk_leg(Some(SHAPE), vec![])]);
        let mut r = req(0.0, None, None);
        r.leg_index = 3;
        let res = WalkEvaluator.evaluate(&itin, &r);
        assert!(res.is_not_found());
        assert_eq!(res.current_instruction, phrases::ROUTE_NOT_FOUND);
        assert_eq!(res.next_leg_index, None);
    }

    #[test]
    fn no_geometry_is_not_found() {
        let itin = itinerary(vec![walk_leg(None, vec![step("Somewhere", None)])]);
        let res = WalkEvaluator.evaluate(&itin, &req(0.0, Some(0), None));
        assert!(res.is_not_found());
        assert!(!res.arrived);
    }
}
