pub mod arrival;
pub mod health;
pub mod location;
pub mod trips;
