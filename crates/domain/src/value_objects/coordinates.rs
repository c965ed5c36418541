//! Geographic coordinates value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees (-90 to 90)
    latitude: f64,
    /// Longitude in degrees (-180 to 180)
    longitude: f64,
}

/// Error type for out-of-range coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidCoordinates {
    /// Rejected latitude
    pub latitude: f64,
    /// Rejected longitude
    pub longitude: f64,
}

impl fmt::Display for InvalidCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid coordinates ({}, {}): latitude must be -90 to 90, longitude must be -180 to 180",
            self.latitude, self.longitude
        )
    }
}

impl std::error::Error for InvalidCoordinates {}

impl Coordinates {
    /// Create coordinates with range validation
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` if latitude is not in [-90, 90]
    /// or longitude is not in [-180, 180]. NaN is rejected as well.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinates> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_coordinates() {
        let coords = Coordinates::new(12.97, 77.59).expect("valid coordinates");
        assert!((coords.latitude() - 12.97).abs() < f64::EPSILON);
        assert!((coords.longitude() - 77.59).abs() < f64::EPSILON);
    }

    #[test]
    fn boundary_coordinates() {
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
        assert!(Coordinates::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn out_of_range_rejected() {
        assert!(Coordinates::new(90.5, 0.0).is_err());
        assert!(Coordinates::new(-91.0, 0.0).is_err());
        assert!(Coordinates::new(0.0, 180.1).is_err());
        assert!(Coordinates::new(0.0, -181.0).is_err());
    }

    #[test]
    fn nan_rejected() {
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
        assert!(Coordinates::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn error_carries_rejected_values() {
        let err = Coordinates::new(100.0, 5.0).unwrap_err();
        assert!((err.latitude - 100.0).abs() < f64::EPSILON);
        assert!(err.to_string().contains("latitude must be -90 to 90"));
    }

    #[test]
    fn display_uses_four_decimals() {
        let coords = Coordinates::new(12.971_599, 77.594_566).expect("valid");
        assert_eq!(coords.to_string(), "12.9716, 77.5946");
    }

    #[test]
    fn serialization_roundtrip() {
        let coords = Coordinates::new(52.52, 13.405).expect("valid");
        let json = serde_json::to_string(&coords).expect("serialize");
        assert!(json.contains("\"latitude\":52.52"));
        let back: Coordinates = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, coords);
    }
}
