//! Monitored region value type.

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// A circular geographic region registered for entry/exit monitoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Caller-chosen identifier, echoed back in region events.
    pub identifier: String,
    /// Center of the region.
    pub center: Coordinate,
    /// Radius of the region in meters.
    pub radius_meters: f64,
}

impl Region {
    /// Create a region with the given identifier, center, and radius.
    pub fn new(identifier: impl Into<String>, center: Coordinate, radius_meters: f64) -> Self {
        Self {
            identifier: identifier.into(),
            center,
            radius_meters,
        }
    }

    /// Whether a coordinate lies inside the region.
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        self.center.distance_meters(coordinate) <= self.radius_meters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_center_and_excludes_far_point() {
        let region = Region::new("home", Coordinate::new(40.6501, -73.94958), 200.0);
        assert!(region.contains(&Coordinate::new(40.6501, -73.94958)));
        assert!(!region.contains(&Coordinate::new(40.7580, -73.98554)));
    }
}
