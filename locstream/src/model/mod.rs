//! Value types for provider callbacks and hardware configuration.
//!
//! Every delegate callback carries one immutable record from this module.
//! Records are produced only by the provider and consumed read-only; equality
//! is defined over all fields so tests can assert on whole events.

mod authorization;
mod coordinate;
mod heading;
mod location;
mod properties;
mod region;
mod update;
mod visit;

pub use authorization::AuthorizationStatus;
pub use coordinate::Coordinate;
pub use heading::HeadingFix;
pub use location::LocationFix;
pub use properties::{
    ActivityType, Capabilities, DeviceOrientation, Properties, PropertyKey, PropertyValue,
};
pub use region::Region;
pub use update::LocationUpdate;
pub use visit::VisitEvent;
