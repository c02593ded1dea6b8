//! Spoken guidance for one progress update. Pure; nothing here touches state.

use super::arrival::ArrivalResult;
use super::phrases;
use crate::types::plan::{Itinerary, Leg, LegMode};
use crate::types::trip::{Phase, TripState};

pub fn guidance_text(
    arrival: &ArrivalResult,
    state: &TripState,
    _itinerary: &Itinerary,
    leg: &Leg,
) -> String {
    if arrival.is_not_found() {
        return arrival.current_instruction.clone();
    }

    if arrival.arrived {
        return match state.phase {
            Phase::Onboard => phrases::ARRIVED_ALIGHT,
            Phase::Transfer => phrases::ARRIVED_TRANSFER,
            Phase::Arrived => phrases::ARRIVED_FINAL,
            _ => phrases::ARRIVED_PROCEED,
        }
        .to_string();
    }

    let remaining = arrival.remaining_meters.max(0.0);
    match leg.mode() {
        LegMode::Walk => walk_band(remaining),
        LegMode::Bus => match state.phase {
            Phase::Onboard => phrases::BUS_ONBOARD,
            Phase::Transfer => phrases::BUS_TRANSFER,
            _ => phrases::BUS_WAIT,
        }
        .to_string(),
        LegMode::Subway => match state.phase {
            Phase::Onboard => phrases::SUBWAY_ONBOARD,
            Phase::Transfer => phrases::SUBWAY_TRANSFER,
            _ => phrases::SUBWAY_WAIT,
        }
        .to_string(),
        LegMode::Other(_) => phrases::CONTINUE_ROUTE.to_string(),
    }
}

fn walk_band(remaining: f64) -> String {
    let meters = remaining.round();
    if remaining <= 10.0 {
        phrases::WALK_ALMOST_THERE.to_string()
    } else if remaining <= 30.0 {
        phrases::walk_slow_down(meters)
    } else if remaining <= 80.0 {
        phrases::walk_then_wait(meters)
    } else {
        phrases::walk_until_next(meters)
    }
}

/// Text for updates that arrive after a trip reached a terminal phase.
pub fn terminal_text(phase: Phase) -> String {
    match phase {
        Phase::Arrived => phrases::ARRIVED_FINAL,
        _ => phrases::GUIDANCE_ENDED,
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(arrived: bool, remaining_meters: f64) -> ArrivalResult {
        ArrivalResult {
            arrived,
            remaining_meters,
            current_instruction: phrases::GO_STRAIGHT.to_string(),
            next_instruction: None,
            next_leg_index: None,
            next_step_index: None,
            current_station_index: None,
            stops_left: None,
        }
    }

    fn state(phase: Phase) -> TripState {
        let mut s = TripState::fresh("t");
        s.phase = phase;
        s
    }

    fn leg(mode: &str) -> Leg {
        Leg {
            mode: Some(mode.to_string()),
            ..Default::default()
        }
    }

    fn text(arrived: bool, remaining: f64, phase: Phase, mode: &str) -> String {
        guidance_text(&result(arrived, remaining), &state(phase), &Itinerary::default(), &leg(mode))
    }

    #[test]
    fn arrival_branches_on_phase() {
        assert_eq!(text(true, 0.0, Phase::Onboard, "BUS"), phrases::ARRIVED_ALIGHT);
        assert_eq!(text(true, 0.0, Phase::Transfer, "BUS"), phrases::ARRIVED_TRANSFER);
        assert_eq!(text(true, 0.0, Phase::Arrived, "WALK"), phrases::ARRIVED_FINAL);
        assert_eq!(text(true, 0.0, Phase::Walking, "WALK"), phrases::ARRIVED_PROCEED);
    }

    #[test]
    fn walk_guidance_is_banded_by_distance() {
        assert_eq!(text(false, 10.0, Phase::Walking, "WALK"), phrases::WALK_ALMOST_THERE);
        assert_eq!(
            text(false, 25.4, Phase::Walking, "WALK"),
            "About 25 meters left. Slow down and check your surroundings."
        );
        assert_eq!(
            text(false, 80.0, Phase::Walking, "WALK"),
            "Go straight about 80 meters, then wait for the next instruction."
        );
        assert_eq!(
            text(false, 120.6, Phase::Walking, "WALK"),
            "About 121 meters until the next instruction."
        );
    }

    #[test]
    fn transit_guidance_branches_on_phase() {
        assert_eq!(text(false, 500.0, Phase::Onboard, "BUS"), phrases::BUS_ONBOARD);
        assert_eq!(text(false, 500.0, Phase::Transfer, "BUS"), phrases::BUS_TRANSFER);
        assert_eq!(text(false, 500.0, Phase::Walking, "BUS"), phrases::BUS_WAIT);
        assert_eq!(text(false, 500.0, Phase::Onboard, "SUBWAY"), phrases::SUBWAY_ONBOARD);
        assert_eq!(text(false, 500.0, Phase::Transfer, "SUBWAY"), phrases::SUBWAY_TRANSFER);
        assert_eq!(text(false, 500.0, Phase::Walking, "SUBWAY"), phrases::SUBWAY_WAIT);
    }

    #[test]
    fn unknown_mode_continues_along_route() {
        assert_eq!(text(false, 500.0, Phase::Walking, "FERRY"), phrases::CONTINUE_ROUTE);
    }

    #[test]
    fn not_found_surfaces_diagnostic() {
        let text = guidance_text(
            &ArrivalResult::not_found(),
            &state(Phase::Walking),
            &Itinerary::default(),
            &leg("WALK"),
        );
        assert_eq!(text, phrases::ROUTE_NOT_FOUND);
    }

    #[test]
    fn terminal_phases_have_fixed_text() {
        assert_eq!(terminal_text(Phase::Arrived), phrases::ARRIVED_FINAL);
        assert_eq!(terminal_text(Phase::Cancelled), phrases::GUIDANCE_ENDED);
    }
}
