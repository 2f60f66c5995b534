//! Location fix value type.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Coordinate;

/// One position report from the provider.
///
/// Immutable record produced only by provider callbacks. Equality covers all
/// fields so two fixes compare equal exactly when every reported quantity
/// matches; hashing is consistent with equality (float fields hash by bit
/// pattern).
///
/// Accuracy fields follow hardware conventions: a negative accuracy means the
/// corresponding value is invalid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    /// Geographic position of the fix.
    pub coordinate: Coordinate,
    /// Altitude above mean sea level in meters.
    pub altitude: f64,
    /// Radius of horizontal uncertainty in meters.
    pub horizontal_accuracy: f64,
    /// Vertical uncertainty in meters.
    pub vertical_accuracy: f64,
    /// Direction of travel in degrees relative to true north.
    pub course: f64,
    /// Uncertainty of `course` in degrees.
    pub course_accuracy: f64,
    /// Ground speed in meters per second.
    pub speed: f64,
    /// Uncertainty of `speed` in meters per second.
    pub speed_accuracy: f64,
    /// When the fix was determined.
    pub timestamp: DateTime<Utc>,
}

impl LocationFix {
    /// Create a fix at the given coordinate with all other fields zeroed and
    /// the timestamp taken from the wall clock.
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self::at_time(latitude, longitude, Utc::now())
    }

    /// Create a fix at the given coordinate with an explicit timestamp.
    ///
    /// Deterministic variant of [`LocationFix::at`], useful in tests where
    /// equality over the timestamp matters.
    pub fn at_time(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            coordinate: Coordinate::new(latitude, longitude),
            altitude: 0.0,
            horizontal_accuracy: 0.0,
            vertical_accuracy: 0.0,
            course: 0.0,
            course_accuracy: 0.0,
            speed: 0.0,
            speed_accuracy: 0.0,
            timestamp,
        }
    }

    /// Great-circle distance to another fix in meters.
    pub fn distance_meters(&self, other: &LocationFix) -> f64 {
        self.coordinate.distance_meters(&other.coordinate)
    }
}

impl Hash for LocationFix {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coordinate.hash(state);
        self.altitude.to_bits().hash(state);
        self.horizontal_accuracy.to_bits().hash(state);
        self.vertical_accuracy.to_bits().hash(state);
        self.course.to_bits().hash(state);
        self.course_accuracy.to_bits().hash(state);
        self.speed.to_bits().hash(state);
        self.speed_accuracy.to_bits().hash(state);
        self.timestamp.hash(state);
    }
}
