//! Heading fix value type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One heading report from the provider.
///
/// A negative `accuracy` means the heading is invalid (hardware convention).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingFix {
    /// Heading relative to magnetic north, in degrees (0..360).
    pub magnetic_heading: f64,
    /// Heading relative to true north, in degrees (0..360).
    pub true_heading: f64,
    /// Maximum deviation between the reported and actual heading, in degrees.
    pub accuracy: f64,
    /// When the heading was determined.
    pub timestamp: DateTime<Utc>,
}

impl HeadingFix {
    /// Create a heading fix with the timestamp taken from the wall clock.
    pub fn new(magnetic_heading: f64, true_heading: f64, accuracy: f64) -> Self {
        Self {
            magnetic_heading,
            true_heading,
            accuracy,
            timestamp: Utc::now(),
        }
    }

    /// Whether the heading is usable.
    pub fn is_valid(&self) -> bool {
        self.accuracy >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_accuracy_is_invalid() {
        let heading = HeadingFix::new(120.0, 123.5, -1.0);
        assert!(!heading.is_valid());
        assert!(HeadingFix::new(120.0, 123.5, 5.0).is_valid());
    }
}
