//! Fixed spoken-guidance phrase table.

pub const ROUTE_NOT_FOUND: &str = "Route not found.";
pub const GO_STRAIGHT: &str = "Go straight.";
pub const EN_ROUTE: &str = "On the way.";
pub const STATION_ARROW: &str = " → ";

pub const ARRIVED_ALIGHT: &str =
    "You have reached your stop. Step off carefully and wait for the next instruction.";
pub const ARRIVED_TRANSFER: &str =
    "You have reached the transfer point. Please move to the next route.";
pub const ARRIVED_FINAL: &str = "You have arrived at your final destination.";
pub const ARRIVED_PROCEED: &str = "You have arrived. Please proceed to the next section.";

pub const WALK_ALMOST_THERE: &str =
    "Almost there. Move slowly and watch your footing.";

pub const BUS_ONBOARD: &str =
    "You are riding the bus. I will guide you again near your stop.";
pub const BUS_TRANSFER: &str =
    "Waiting for your connecting bus. Please wait near the bus stop.";
pub const BUS_WAIT: &str = "Bus section. Please wait for the bus at the stop.";

pub const SUBWAY_ONBOARD: &str =
    "You are riding the subway. I will guide you again near your station.";
pub const SUBWAY_TRANSFER: &str =
    "Transfer station. Follow the platform and transfer signs.";
pub const SUBWAY_WAIT: &str =
    "Subway section. Please go to the platform and wait for the train.";

pub const CONTINUE_ROUTE: &str = "Please continue along the route.";
pub const GUIDANCE_ENDED: &str = "Guidance for this trip has ended.";

pub const DESTINATION_REACHED: &str = "You have arrived at your destination.";

pub fn walk_slow_down(meters: f64) -> String {
    format!("About {:.0} meters left. Slow down and check your surroundings.", meters)
}

pub fn walk_then_wait(meters: f64) -> String {
    format!("Go straight about {:.0} meters, then wait for the next instruction.", meters)
}

pub fn walk_until_next(meters: f64) -> String {
    format!("About {:.0} meters until the next instruction.", meters)
}

pub fn destination_near(meters: f64) -> String {
    format!("About {:.0} meters to your destination.", meters)
}

pub fn destination_far(meters: f64) -> String {
    format!("{:.0} meters left. Keep going straight.", meters)
}
