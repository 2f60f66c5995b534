//! Visit value type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Coordinate;

/// A recorded visit: a period the device spent at one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitEvent {
    /// Approximate center of the visited place.
    pub coordinate: Coordinate,
    /// Radius of horizontal uncertainty in meters.
    pub horizontal_accuracy: f64,
    /// When the device arrived.
    pub arrival: DateTime<Utc>,
    /// When the device departed.
    pub departure: DateTime<Utc>,
}

impl VisitEvent {
    /// Create a visit record.
    pub fn new(
        coordinate: Coordinate,
        horizontal_accuracy: f64,
        arrival: DateTime<Utc>,
        departure: DateTime<Utc>,
    ) -> Self {
        Self {
            coordinate,
            horizontal_accuracy,
            arrival,
            departure,
        }
    }
}
