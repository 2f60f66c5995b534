//! The closed set of events a provider can emit.
//!
//! Each variant corresponds to exactly one delegate callback. Events enter
//! the stream in the order the provider invoked the callbacks and are never
//! reordered, batched across callbacks, or dropped.

use crate::error::ProviderError;
use crate::model::{AuthorizationStatus, HeadingFix, LocationFix, Region, VisitEvent};

/// One normalized occurrence derived from a provider delegate callback.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The user's authorization decision changed.
    AuthorizationChanged(AuthorizationStatus),
    /// The provider reported an asynchronous failure.
    Failed(ProviderError),
    /// One or more new position fixes, oldest first.
    LocationsUpdated(Vec<LocationFix>),
    /// A new heading fix.
    HeadingUpdated(HeadingFix),
    /// The device entered a monitored region.
    RegionEntered(Region),
    /// The device exited a monitored region.
    RegionExited(Region),
    /// Monitoring failed, either for one region or for the facility as a whole.
    MonitoringFailed {
        /// The affected region, if the failure is region-specific.
        region: Option<Region>,
        /// The underlying provider error.
        error: ProviderError,
    },
    /// A visit was recorded.
    VisitRecorded(VisitEvent),
}

impl Event {
    /// Short stable name of the variant, for structured logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::AuthorizationChanged(_) => "authorization_changed",
            Event::Failed(_) => "failed",
            Event::LocationsUpdated(_) => "locations_updated",
            Event::HeadingUpdated(_) => "heading_updated",
            Event::RegionEntered(_) => "region_entered",
            Event::RegionExited(_) => "region_exited",
            Event::MonitoringFailed { .. } => "monitoring_failed",
            Event::VisitRecorded(_) => "visit_recorded",
        }
    }
}
