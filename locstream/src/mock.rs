//! Deterministic in-memory provider for tests.
//!
//! [`MockProvider`] implements the full [`LocationProvider`] contract,
//! including the two-phase attach/detach delegate slot, so tests exercise the
//! identical bridge state machine as a hardware-backed provider. The paired
//! [`MockHandle`] lets a test script delegate callbacks on demand:
//!
//! ```ignore
//! let provider = MockProvider::new();
//! let handle = provider.handle();
//! let client = LocationClient::new(Arc::new(provider));
//!
//! let mut events = client.events();
//! handle.inject(Event::AuthorizationChanged(AuthorizationStatus::Denied));
//! assert_eq!(
//!     events.next().await.unwrap(),
//!     Event::AuthorizationChanged(AuthorizationStatus::Denied),
//! );
//! ```
//!
//! Injection routes through the installed delegate, the same path real
//! callbacks take. Injecting with no delegate installed loses the event -
//! exactly the hardware hazard the readiness barrier exists to prevent - and
//! logs a warning.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::LocationError;
use crate::event::Event;
use crate::model::{
    AuthorizationStatus, Capabilities, LocationFix, LocationUpdate, Properties, Region,
};
use crate::provider::{LiveUpdateConfig, LiveUpdates, LocationProvider, ProviderDelegate};

/// A deterministic synthetic fix in Brooklyn, NY, with a fixed timestamp so
/// events built from it compare equal across calls.
pub fn brooklyn_fix() -> LocationFix {
    LocationFix::at_time(40.6501, -73.94958, DateTime::<Utc>::UNIX_EPOCH)
}

/// Behavior of a [`MockProvider`].
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Authorization status reported by queries.
    pub authorization: AuthorizationStatus,
    /// Whether `location_services_enabled` reports true.
    pub services_enabled: bool,
    /// The synthetic current location.
    pub location: Option<LocationFix>,
    /// Emit `AuthorizationChanged(authorization)` to a freshly installed
    /// delegate, mirroring hardware that reports status on registration.
    pub announce_authorization_on_attach: bool,
    /// Answer `request_location` by emitting `LocationsUpdated([location])`.
    pub respond_to_request_location: bool,
    /// Supported property keys.
    pub capabilities: Capabilities,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            authorization: AuthorizationStatus::AuthorizedWhenInUse,
            services_enabled: true,
            location: Some(brooklyn_fix()),
            announce_authorization_on_attach: true,
            respond_to_request_location: true,
            capabilities: Capabilities::full(),
        }
    }
}

/// Counters for provider calls, for asserting command gating.
#[derive(Debug, Default)]
struct CallCounters {
    request_location: AtomicUsize,
    when_in_use_requests: AtomicUsize,
    always_requests: AtomicUsize,
    start_updating_location: AtomicUsize,
    stop_updating_location: AtomicUsize,
    start_updating_heading: AtomicUsize,
    stop_updating_heading: AtomicUsize,
    start_monitoring_visits: AtomicUsize,
    stop_monitoring_visits: AtomicUsize,
}

struct MockState {
    config: MockConfig,
    authorization: Mutex<AuthorizationStatus>,
    services_enabled: AtomicBool,
    location: Mutex<Option<LocationFix>>,
    properties: Mutex<Properties>,
    monitored_regions: Mutex<Vec<Region>>,
    delegate: Mutex<Option<Arc<dyn ProviderDelegate>>>,
    live_subscribers: Mutex<Vec<mpsc::UnboundedSender<LocationUpdate>>>,
    calls: CallCounters,
}

impl MockState {
    /// Route an event through the installed delegate, the same path hardware
    /// callbacks take. Lost (with a warning) if no delegate is installed.
    fn dispatch(&self, event: Event) {
        let delegate = self.delegate.lock().clone();
        match delegate {
            Some(delegate) => deliver(&delegate, event),
            None => warn!(
                kind = event.kind(),
                "injected event lost: no delegate installed"
            ),
        }
    }
}

fn deliver(delegate: &Arc<dyn ProviderDelegate>, event: Event) {
    match event {
        Event::AuthorizationChanged(status) => delegate.on_authorization_changed(status),
        Event::Failed(error) => delegate.on_failed(error),
        Event::LocationsUpdated(fixes) => delegate.on_locations_updated(fixes),
        Event::HeadingUpdated(heading) => delegate.on_heading_updated(heading),
        Event::RegionEntered(region) => delegate.on_region_entered(region),
        Event::RegionExited(region) => delegate.on_region_exited(region),
        Event::MonitoringFailed { region, error } => delegate.on_monitoring_failed(region, error),
        Event::VisitRecorded(visit) => delegate.on_visit(visit),
    }
}

/// In-memory [`LocationProvider`] substitute.
///
/// Clones share state, so a clone can be handed to the client while the test
/// keeps another for its [`MockHandle`].
#[derive(Clone)]
pub struct MockProvider {
    state: Arc<MockState>,
}

impl MockProvider {
    /// A mock with [`MockConfig::default`] behavior: authorized when in use,
    /// services enabled, Brooklyn fix, announces authorization on attach and
    /// responds to `request_location`.
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    /// A mock with explicit behavior.
    pub fn with_config(config: MockConfig) -> Self {
        let state = MockState {
            authorization: Mutex::new(config.authorization),
            services_enabled: AtomicBool::new(config.services_enabled),
            location: Mutex::new(config.location.clone()),
            properties: Mutex::new(Properties::new()),
            monitored_regions: Mutex::new(Vec::new()),
            delegate: Mutex::new(None),
            live_subscribers: Mutex::new(Vec::new()),
            calls: CallCounters::default(),
            config,
        };
        Self {
            state: Arc::new(state),
        }
    }

    /// The injection and inspection handle for this mock.
    pub fn handle(&self) -> MockHandle {
        MockHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationProvider for MockProvider {
    fn authorization_status(&self) -> AuthorizationStatus {
        *self.state.authorization.lock()
    }

    fn location_services_enabled(&self) -> bool {
        self.state.services_enabled.load(Ordering::Acquire)
    }

    fn current_location(&self) -> Option<LocationFix> {
        self.state.location.lock().clone()
    }

    fn set_delegate(&self, delegate: Option<Arc<dyn ProviderDelegate>>) {
        let installing = delegate.is_some();
        let announce = {
            let mut slot = self.state.delegate.lock();
            *slot = delegate;
            installing && self.state.config.announce_authorization_on_attach
        };
        debug!(installed = installing, "mock delegate slot updated");
        if announce {
            let status = *self.state.authorization.lock();
            self.state.dispatch(Event::AuthorizationChanged(status));
        }
    }

    fn request_location(&self) {
        self.state
            .calls
            .request_location
            .fetch_add(1, Ordering::SeqCst);
        if self.state.config.respond_to_request_location {
            if let Some(fix) = self.state.location.lock().clone() {
                self.state.dispatch(Event::LocationsUpdated(vec![fix]));
            }
        }
    }

    fn request_when_in_use_authorization(&self) {
        self.state
            .calls
            .when_in_use_requests
            .fetch_add(1, Ordering::SeqCst);
    }

    fn request_always_authorization(&self) {
        self.state
            .calls
            .always_requests
            .fetch_add(1, Ordering::SeqCst);
    }

    fn start_updating_location(&self) {
        self.state
            .calls
            .start_updating_location
            .fetch_add(1, Ordering::SeqCst);
    }

    fn stop_updating_location(&self) {
        self.state
            .calls
            .stop_updating_location
            .fetch_add(1, Ordering::SeqCst);
    }

    fn start_updating_heading(&self) {
        self.state
            .calls
            .start_updating_heading
            .fetch_add(1, Ordering::SeqCst);
    }

    fn stop_updating_heading(&self) {
        self.state
            .calls
            .stop_updating_heading
            .fetch_add(1, Ordering::SeqCst);
    }

    fn start_monitoring_region(&self, region: Region) {
        self.state.monitored_regions.lock().push(region);
    }

    fn stop_monitoring_region(&self, region: Region) {
        self.state
            .monitored_regions
            .lock()
            .retain(|monitored| monitored.identifier != region.identifier);
    }

    fn start_monitoring_visits(&self) {
        self.state
            .calls
            .start_monitoring_visits
            .fetch_add(1, Ordering::SeqCst);
    }

    fn stop_monitoring_visits(&self) {
        self.state
            .calls
            .stop_monitoring_visits
            .fetch_add(1, Ordering::SeqCst);
    }

    fn capabilities(&self) -> Capabilities {
        self.state.config.capabilities.clone()
    }

    fn properties(&self) -> Properties {
        self.state.properties.lock().clone()
    }

    fn set_properties(&self, properties: Properties) -> Result<(), LocationError> {
        for key in properties.keys() {
            if !self.state.config.capabilities.supports(key) {
                return Err(LocationError::CapabilityUnavailable(key));
            }
        }
        self.state.properties.lock().merge(&properties);
        Ok(())
    }

    fn start_live_updates(&self, config: LiveUpdateConfig) -> LiveUpdates {
        let (tx, updates) = LiveUpdates::channel();
        debug!(?config, "mock live-updates subscription opened");
        self.state.live_subscribers.lock().push(tx);
        updates
    }
}

/// Test-side control surface for a [`MockProvider`].
pub struct MockHandle {
    state: Arc<MockState>,
}

impl MockHandle {
    /// Inject a delegate callback, exactly as hardware would deliver it.
    ///
    /// Lost (with a warning) if no delegate is installed - the same hazard
    /// real hardware has for events fired before registration.
    pub fn inject(&self, event: Event) {
        self.state.dispatch(event);
    }

    /// Set the reported authorization without notifying the delegate.
    pub fn set_authorization(&self, status: AuthorizationStatus) {
        *self.state.authorization.lock() = status;
    }

    /// Set the reported authorization and deliver the change as an event.
    pub fn change_authorization(&self, status: AuthorizationStatus) {
        self.set_authorization(status);
        self.inject(Event::AuthorizationChanged(status));
    }

    /// Replace the synthetic current location.
    pub fn set_location(&self, fix: Option<LocationFix>) {
        *self.state.location.lock() = fix;
    }

    /// Toggle the device-wide services flag.
    pub fn set_services_enabled(&self, enabled: bool) {
        self.state
            .services_enabled
            .store(enabled, Ordering::Release);
    }

    /// Push an update to every open live-updates subscription.
    pub fn push_live_update(&self, update: LocationUpdate) {
        self.state
            .live_subscribers
            .lock()
            .retain(|tx| tx.send(update.clone()).is_ok());
    }

    /// Whether a delegate is currently installed.
    pub fn delegate_installed(&self) -> bool {
        self.state.delegate.lock().is_some()
    }

    /// Regions currently registered for monitoring.
    pub fn monitored_regions(&self) -> Vec<Region> {
        self.state.monitored_regions.lock().clone()
    }

    /// Open live-updates subscriptions, pruned of cancelled ones.
    pub fn live_update_subscribers(&self) -> usize {
        let mut subscribers = self.state.live_subscribers.lock();
        subscribers.retain(|tx| !tx.is_closed());
        subscribers.len()
    }

    pub fn request_location_calls(&self) -> usize {
        self.state.calls.request_location.load(Ordering::SeqCst)
    }

    pub fn when_in_use_requests(&self) -> usize {
        self.state.calls.when_in_use_requests.load(Ordering::SeqCst)
    }

    pub fn always_requests(&self) -> usize {
        self.state.calls.always_requests.load(Ordering::SeqCst)
    }

    pub fn start_updating_location_calls(&self) -> usize {
        self.state
            .calls
            .start_updating_location
            .load(Ordering::SeqCst)
    }

    pub fn start_updating_heading_calls(&self) -> usize {
        self.state
            .calls
            .start_updating_heading
            .load(Ordering::SeqCst)
    }

    pub fn start_monitoring_visits_calls(&self) -> usize {
        self.state
            .calls
            .start_monitoring_visits
            .load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LocationClient;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_injection_is_deterministic() {
        // Injecting a single event yields exactly that event, in that
        // order, with nothing extraneous.
        let provider = MockProvider::with_config(MockConfig {
            announce_authorization_on_attach: false,
            ..MockConfig::default()
        });
        let handle = provider.handle();
        let client = LocationClient::new(Arc::new(provider));

        let mut events = client.events();
        handle.inject(Event::AuthorizationChanged(AuthorizationStatus::Denied));

        let got = timeout(Duration::from_millis(200), events.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got, Event::AuthorizationChanged(AuthorizationStatus::Denied));
        assert!(events.try_next().is_none(), "no extraneous events");
    }

    #[tokio::test]
    async fn test_injection_without_delegate_is_lost() {
        let provider = MockProvider::with_config(MockConfig {
            announce_authorization_on_attach: false,
            ..MockConfig::default()
        });
        let handle = provider.handle();
        let client = LocationClient::new(Arc::new(provider));

        // Fired before any attachment: the hardware hazard, faithfully
        // reproduced.
        handle.inject(Event::AuthorizationChanged(AuthorizationStatus::Denied));

        let mut events = client.events();
        assert!(
            events.try_next().is_none(),
            "pre-attach injection must not be buffered"
        );
    }

    #[tokio::test]
    async fn test_denial_then_grant_flow() {
        let provider = MockProvider::with_config(MockConfig {
            authorization: AuthorizationStatus::NotDetermined,
            announce_authorization_on_attach: false,
            respond_to_request_location: false,
            ..MockConfig::default()
        });
        let handle = provider.handle();
        let client = LocationClient::new(Arc::new(provider));

        let mut events = client.events();
        client.request_when_in_use_authorization();

        handle.change_authorization(AuthorizationStatus::Denied);
        assert_eq!(
            events.next().await.unwrap(),
            Event::AuthorizationChanged(AuthorizationStatus::Denied)
        );
        assert_eq!(client.authorization_status(), AuthorizationStatus::Denied);

        handle.change_authorization(AuthorizationStatus::AuthorizedWhenInUse);
        assert_eq!(
            events.next().await.unwrap(),
            Event::AuthorizationChanged(AuthorizationStatus::AuthorizedWhenInUse)
        );
        handle.inject(Event::LocationsUpdated(vec![brooklyn_fix()]));
        assert_eq!(
            events.next().await.unwrap(),
            Event::LocationsUpdated(vec![brooklyn_fix()])
        );
    }

    #[tokio::test]
    async fn test_default_mock_mirrors_hardware_policy() {
        let provider = MockProvider::new();
        assert_eq!(
            provider.authorization_status(),
            AuthorizationStatus::AuthorizedWhenInUse
        );
        assert!(provider.location_services_enabled());
        assert_eq!(provider.current_location(), Some(brooklyn_fix()));
    }

    #[tokio::test]
    async fn test_request_location_without_synthetic_fix_stays_silent() {
        let provider = MockProvider::with_config(MockConfig {
            location: None,
            announce_authorization_on_attach: false,
            ..MockConfig::default()
        });
        let handle = provider.handle();
        let client = LocationClient::new(Arc::new(provider));

        let mut events = client.events();
        client.request_location().await;

        assert_eq!(handle.request_location_calls(), 1);
        assert!(events.try_next().is_none());
    }
}
