//! Command façade over a location provider.
//!
//! [`LocationClient`] exposes the provider's operations as async commands and
//! couples result-bearing commands to event-stream attachment. The hardware
//! delivers results only through its delegate, so a `request_location` issued
//! with no delegate installed silently loses the fix forever. The façade
//! prevents that whole bug class: gated commands wait on the bridge's
//! readiness barrier and only then touch the provider.
//!
//! Command classes:
//!
//! - **Immediate** - status queries and property access; call straight
//!   through.
//! - **Fire-and-forget** - authorization prompts; the outcome arrives later as
//!   an [`Event::AuthorizationChanged`](crate::Event::AuthorizationChanged),
//!   so consumers typically attach first to observe it, but the prompt itself
//!   needs no callback to proceed.
//! - **Barrier-gated** - `request_location`, the `start_*` family, and live
//!   updates; suspended until a consumer attaches via [`events`](LocationClient::events).
//!
//! A consumer that never attaches will suspend gated commands indefinitely.
//! That is the documented contract, not a deadlock bug: the alternative is a
//! command whose result is silently lost.

use std::sync::Arc;

use tracing::warn;

use crate::bridge::{DelegateBridge, EventStream};
use crate::error::LocationError;
use crate::mock::{MockHandle, MockProvider};
use crate::model::{AuthorizationStatus, Capabilities, LocationFix, Properties, Region};
use crate::provider::{LiveUpdateConfig, LiveUpdates, LocationProvider};

/// Async command surface over one location provider.
pub struct LocationClient {
    provider: Arc<dyn LocationProvider>,
    bridge: Arc<DelegateBridge>,
}

impl LocationClient {
    /// Create a client over a provider service object.
    pub fn new(provider: Arc<dyn LocationProvider>) -> Self {
        let bridge = Arc::new(DelegateBridge::new(Arc::clone(&provider)));
        Self { provider, bridge }
    }

    /// Create a client over a default [`MockProvider`], returning the
    /// injection handle alongside. Convenience for tests and examples.
    pub fn mocked() -> (Self, MockHandle) {
        let provider = MockProvider::new();
        let handle = provider.handle();
        (Self::new(Arc::new(provider)), handle)
    }

    /// Attach to the provider's event stream.
    ///
    /// Installing the delegate arms the readiness barrier, releasing any
    /// gated commands currently waiting. Dropping the returned stream
    /// detaches and resets the barrier.
    ///
    /// At most one attachment is live at a time: attaching again while a
    /// stream exists replaces its registration (last writer wins, mirroring
    /// the hardware delegate slot). The replaced stream stops yielding events
    /// but its eventual drop does not disturb the newer attachment.
    pub fn events(&self) -> EventStream {
        self.bridge.attach()
    }

    // ------------------------------------------------------------------
    // Immediate commands
    // ------------------------------------------------------------------

    /// Current authorization status.
    pub fn authorization_status(&self) -> AuthorizationStatus {
        self.provider.authorization_status()
    }

    /// Whether location services are enabled device-wide.
    pub fn location_services_enabled(&self) -> bool {
        self.provider.location_services_enabled()
    }

    /// The most recently determined fix, if any.
    pub fn current_location(&self) -> Option<LocationFix> {
        self.provider.current_location()
    }

    /// The property keys this provider supports.
    pub fn capabilities(&self) -> Capabilities {
        self.provider.capabilities()
    }

    /// Current values of the supported properties that have been set.
    pub fn properties(&self) -> Properties {
        self.provider.properties()
    }

    /// Write the present keys of `properties`.
    ///
    /// # Errors
    ///
    /// [`LocationError::CapabilityUnavailable`] if any present key is outside
    /// the provider's capability set; nothing is written in that case.
    pub fn set_properties(&self, properties: Properties) -> Result<(), LocationError> {
        self.provider.set_properties(properties)
    }

    // ------------------------------------------------------------------
    // Fire-and-forget commands
    // ------------------------------------------------------------------

    /// Prompt the user for while-in-use authorization.
    pub fn request_when_in_use_authorization(&self) {
        self.provider.request_when_in_use_authorization();
    }

    /// Prompt the user for always authorization.
    pub fn request_always_authorization(&self) {
        self.provider.request_always_authorization();
    }

    // ------------------------------------------------------------------
    // Barrier-gated commands
    // ------------------------------------------------------------------

    /// Request a single location fix.
    ///
    /// The fix arrives as [`Event::LocationsUpdated`](crate::Event::LocationsUpdated)
    /// on the event stream. Waits until a consumer is attached before issuing
    /// the provider call; cancelling while waiting leaves the provider
    /// untouched.
    pub async fn request_location(&self) {
        self.gate("request_location").await;
        self.provider.request_location();
    }

    /// Start continuous location callbacks on the event stream.
    pub async fn start_updating_location(&self) {
        self.gate("start_updating_location").await;
        self.provider.start_updating_location();
    }

    /// Stop continuous location callbacks. Immediate: stopping needs no
    /// delegate-reported result.
    pub fn stop_updating_location(&self) {
        self.provider.stop_updating_location();
    }

    /// Start continuous heading callbacks on the event stream.
    pub async fn start_updating_heading(&self) {
        self.gate("start_updating_heading").await;
        self.provider.start_updating_heading();
    }

    /// Stop continuous heading callbacks.
    pub fn stop_updating_heading(&self) {
        self.provider.stop_updating_heading();
    }

    /// Begin monitoring entry/exit for a region.
    pub async fn start_monitoring_region(&self, region: Region) {
        self.gate("start_monitoring_region").await;
        self.provider.start_monitoring_region(region);
    }

    /// Stop monitoring a region.
    pub fn stop_monitoring_region(&self, region: Region) {
        self.provider.stop_monitoring_region(region);
    }

    /// Start visit callbacks on the event stream.
    pub async fn start_monitoring_visits(&self) {
        self.gate("start_monitoring_visits").await;
        self.provider.start_monitoring_visits();
    }

    /// Stop visit callbacks.
    pub fn stop_monitoring_visits(&self) {
        self.provider.stop_monitoring_visits();
    }

    /// Open an independent continuous-update subscription.
    ///
    /// Each call yields its own lazy sequence with its own provider-side
    /// subscription; dropping the returned [`LiveUpdates`] cancels it
    /// independently of the event stream and of other subscriptions.
    pub async fn live_updates(&self, config: LiveUpdateConfig) -> LiveUpdates {
        self.gate("live_updates").await;
        self.provider.start_live_updates(config)
    }

    /// Wait for the readiness barrier, surfacing the diagnostic for commands
    /// issued before any consumer attached.
    async fn gate(&self, command: &'static str) {
        // The check is advisory: an attach racing it may skip the warning
        // for a command that briefly waited. The wait itself is authoritative.
        if !self.bridge.barrier().is_armed() {
            warn!(
                command,
                "gated command issued before attaching to the event stream; \
                 holding it until a consumer attaches so its result is not lost"
            );
        }
        self.bridge.barrier().wait().await;
    }
}
