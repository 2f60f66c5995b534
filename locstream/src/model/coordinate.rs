//! Geographic coordinate value type.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Mean earth radius in meters, used for great-circle distance.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (positive north).
    pub latitude: f64,
    /// Longitude in degrees (positive east).
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate from latitude and longitude in degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to another coordinate in meters.
    ///
    /// Uses the haversine formula, which is accurate to well under 0.5% for
    /// the distances this library cares about (fix-to-fix deltas).
    pub fn distance_meters(&self, other: &Coordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }
}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.latitude.to_bits().hash(state);
        self.longitude.to_bits().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        let c = Coordinate::new(40.6501, -73.94958);
        assert!(c.distance_meters(&c) < 1e-9);
    }

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 1.0);
        let distance = a.distance_meters(&b);
        // One degree of arc on the mean-radius sphere is ~111.19 km
        assert!(
            (distance - 111_195.0).abs() < 100.0,
            "Expected ~111195m, got {}m",
            distance
        );
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Coordinate::new(40.6501, -73.94958);
        let b = Coordinate::new(40.7580, -73.98554);
        assert!((a.distance_meters(&b) - b.distance_meters(&a)).abs() < 1e-6);
    }
}
