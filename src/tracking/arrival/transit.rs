use super::{measure, ArrivalEvaluator, ArrivalRequest, ArrivalResult};
use crate::tracking::geo::{distance, parse_point, GeoPoint};
use crate::tracking::phrases;
use crate::types::plan::{Itinerary, Leg, Station};

/// Bus and subway legs: measured against the whole-leg shape, with stop
/// progress derived from the nearest listed station.
pub struct TransitEvaluator;

impl ArrivalEvaluator for TransitEvaluator {
    fn evaluate(&self, itinerary: &Itinerary, req: &ArrivalRequest) -> ArrivalResult {
        let Some(leg) = itinerary.legs.get(req.leg_index) else {
            return ArrivalResult::not_found();
        };

        let Some(progress) = measure(leg.shape(), req) else {
            return ArrivalResult::not_found();
        };

        let stations = leg.stations();
        let current_station_index = nearest_station(stations, req.position());
        let stops_left = current_station_index.map(|i| (stations.len() - 1).saturating_sub(i));

        ArrivalResult {
            arrived: progress.arrived,
            remaining_meters: progress.remaining_meters,
            current_instruction: describe(leg),
            next_instruction: None,
            next_leg_index: progress.arrived.then_some(req.leg_index + 1),
            next_step_index: None,
            current_station_index,
            stops_left,
        }
    }
}

fn describe(leg: &Leg) -> String {
    let (from, to) = (leg.start_name().trim(), leg.end_name().trim());
    if from.is_empty() && to.is_empty() {
        return phrases::EN_ROUTE.to_string();
    }
    format!("{}{}{}", from, phrases::STATION_ARROW, to)
}

/// Index of the closest station whose coordinates parse.
fn nearest_station(stations: &[Station], position: GeoPoint) -> Option<usize> {
    stations
        .iter()
        .enumerate()
        .filter_map(|(i, station)| {
            let point = parse_point(station.lon.as_deref()?, station.lat.as_deref()?)?;
            Some((i, distance(position, point)))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    const SHAPE: &str = "0,0 0.005,0";

    fn stations(n: usize) -> Vec<Station> {
        (0..n)
            .map(|i| {
                let lon = format!("{}", i as f64 * 0.001);
                station(&format!("Stop {i}"), &lon, "0")
            })
            .collect()
    }

    fn req(lon: f64) -> ArrivalRequest {
        ArrivalRequest {
            curr_lat: 0.0,
            curr_lon: lon,
            leg_index: 0,
            step_index: Some(4),
            arrive_radius_m: 20.0,
            look_ahead_m: Some(100.0),
        }
    }

    #[test]
    fn counts_stops_left_from_nearest_station() {
        let itin = itinerary(vec![transit_leg("BUS", "City Hall", "Harbor", SHAPE, stations(6))]);
        let res = TransitEvaluator.evaluate(&itin, &req(0.0021));
        assert_eq!(res.current_station_index, Some(2));
        assert_eq!(res.stops_left, Some(3));
        assert!(!res.arrived);
        assert_eq!(res.next_leg_index, None);
        assert_eq!(res.current_instruction, "City Hall → Harbor");
    }

    #[test]
    fn arrival_advances_leg_and_ignores_steps() {
        let itin = itinerary(vec![transit_leg("SUBWAY", "A", "B", SHAPE, stations(6))]);
        let res = TransitEvaluator.evaluate(&itin, &req(0.005));
        assert!(res.arrived);
        assert_eq!(res.next_leg_index, Some(1));
        assert_eq!(res.next_step_index, None);
        assert_eq!(res.next_instruction, None);
        assert_eq!(res.stops_left, Some(0));
    }

    #[test]
    fn unparsable_stations_are_skipped() {
        let mut list = stations(3);
        list[0].lon = Some("east".to_string());
        list[1].lat = None;
        let itin = itinerary(vec![transit_leg("BUS", "A", "B", SHAPE, list)]);
        let res = TransitEvaluator.evaluate(&itin, &req(0.0));
        assert_eq!(res.current_station_index, Some(2));
        assert_eq!(res.stops_left, Some(0));
    }

    #[test]
    fn empty_station_list_has_no_station_progress() {
        let itin = itinerary(vec![transit_leg("BUS", "A", "B", SHAPE, vec![])]);
        let res = TransitEvaluator.evaluate(&itin, &req(0.001));
        assert_eq!(res.current_station_index, None);
        assert_eq!(res.stops_left, None);
    }

    #[test]
    fn blank_place_names_read_as_en_route() {
        let itin = itinerary(vec![transit_leg("BUS", " ", "", SHAPE, vec![])]);
        let res = TransitEvaluator.evaluate(&itin, &req(0.001));
        assert_eq!(res.current_instruction, phrases::EN_ROUTE);
    }

    #[test]
    fn missing_shape_is_not_found() {
        let mut leg = transit_leg("BUS", "A", "B", SHAPE, stations(2));
        leg.pass_shape = None;
        let res = TransitEvaluator.evaluate(&itinerary(vec![leg]), &req(0.0));
        assert!(res.is_not_found());
        assert_eq!(res.current_station_index, None);
    }
}
