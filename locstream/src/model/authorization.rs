//! Authorization status reported by the provider.

use serde::{Deserialize, Serialize};

/// The user's authorization decision for location access.
///
/// Transitions happen only via provider callbacks
/// ([`Event::AuthorizationChanged`](crate::Event::AuthorizationChanged));
/// consumers read this, never write it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthorizationStatus {
    /// The user has not yet been asked.
    NotDetermined,
    /// Access is blocked by device policy (e.g. parental controls).
    Restricted,
    /// The user explicitly denied access.
    Denied,
    /// Access is granted at all times.
    AuthorizedAlways,
    /// Access is granted while the app is in use.
    AuthorizedWhenInUse,
}

impl AuthorizationStatus {
    /// Whether location commands can be expected to produce results.
    pub fn is_authorized(&self) -> bool {
        matches!(
            self,
            AuthorizationStatus::AuthorizedAlways | AuthorizationStatus::AuthorizedWhenInUse
        )
    }
}
