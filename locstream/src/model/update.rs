//! Live-update value type.

use serde::{Deserialize, Serialize};

use super::LocationFix;

/// One element of the continuous live-updates sequence.
///
/// The fix is optional: the provider may report a stationary/moving transition
/// without a fresh position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    /// The position, if one accompanied this update.
    pub fix: Option<LocationFix>,
    /// Whether the device is currently stationary.
    pub is_stationary: bool,
}

impl LocationUpdate {
    /// An update carrying a fix.
    pub fn moving(fix: LocationFix) -> Self {
        Self {
            fix: Some(fix),
            is_stationary: false,
        }
    }

    /// A stationary marker, optionally carrying the resting fix.
    pub fn stationary(fix: Option<LocationFix>) -> Self {
        Self {
            fix,
            is_stationary: true,
        }
    }
}
