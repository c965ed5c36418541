//! Value Objects - Immutable, identity-less domain primitives

mod coordinates;
mod weather_code;

pub use coordinates::{Coordinates, InvalidCoordinates};
pub use weather_code::{UNKNOWN_CONDITION, WeatherCode};
