pub mod geo;
pub mod quake;

pub use geo::{distance_km, Coordinate};
pub use quake::{Earthquake, MagnitudeRange, Source};
