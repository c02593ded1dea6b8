pub mod arrival;
pub mod coordinator;
pub mod geo;
pub mod guidance;
pub mod phrases;
pub mod smoothing;
pub mod snap;
