//! Coordinate store
//!
//! Holds the last known location for the lifetime of one worker instance.
//! Values are overwritten whole, so a reader always sees either the previous
//! or the new pair.

use domain::{Coordinates, DomainError};
use parking_lot::RwLock;
use tracing::debug;

/// Most-recent-wins holder for the worker's coordinates
#[derive(Debug, Default)]
pub struct CoordinateStore {
    current: RwLock<Option<Coordinates>>,
}

impl CoordinateStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the held coordinates
    pub fn set(&self, coordinates: Coordinates) {
        *self.current.write() = Some(coordinates);
        debug!(lat = coordinates.latitude(), lon = coordinates.longitude(), "Coordinates stored");
    }

    /// Validate and overwrite the held coordinates
    pub fn set_coordinates(&self, latitude: f64, longitude: f64) -> Result<Coordinates, DomainError> {
        let coordinates = Coordinates::new(latitude, longitude)?;
        self.set(coordinates);
        Ok(coordinates)
    }

    /// The held coordinates, if any
    #[must_use]
    pub fn get(&self) -> Option<Coordinates> {
        *self.current.read()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn starts_empty() {
        assert!(CoordinateStore::new().get().is_none());
    }

    #[test]
    fn most_recent_value_wins() {
        let store = CoordinateStore::new();
        store.set_coordinates(10.0, 20.0).unwrap();
        store.set_coordinates(-33.9, 151.2).unwrap();

        let coords = store.get().unwrap();
        assert!((coords.latitude() + 33.9).abs() < f64::EPSILON);
        assert!((coords.longitude() - 151.2).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_values_leave_store_untouched() {
        let store = CoordinateStore::new();
        store.set_coordinates(1.0, 2.0).unwrap();

        assert!(store.set_coordinates(120.0, 2.0).is_err());
        assert_eq!(store.get(), Coordinates::new(1.0, 2.0).ok());
    }

    #[test]
    fn concurrent_readers_never_see_mixed_pairs() {
        let store = Arc::new(CoordinateStore::new());
        store.set_coordinates(1.0, 1.0).unwrap();

        let writer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for i in 0..1000 {
                    let v = f64::from(i % 2) + 1.0;
                    store.set_coordinates(v, v).unwrap();
                }
            })
        };

        for _ in 0..1000 {
            let coords = store.get().unwrap();
            assert!((coords.latitude() - coords.longitude()).abs() < f64::EPSILON);
        }
        writer.join().unwrap();
    }
}
