pub mod generator;

pub use generator::{generate_random_trip, TripConfig};
