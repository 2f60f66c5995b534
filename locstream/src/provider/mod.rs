//! Location provider abstraction.
//!
//! A [`LocationProvider`] is the external service object wrapping the actual
//! hardware: imperative calls in, delegate callbacks out. It holds exactly
//! one delegate slot; whoever installed the delegate receives every callback.
//! This crate installs the delegate bridge into that slot (see
//! [`bridge`](crate::bridge)) and never exposes the slot to consumers.
//!
//! Provider calls are deliberately synchronous: the underlying hardware API
//! is fire-and-forget, and every result that matters arrives later as a
//! delegate callback. The async surface lives one layer up, in
//! [`LocationClient`](crate::LocationClient).

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use crate::error::{LocationError, ProviderError};
use crate::model::{
    AuthorizationStatus, Capabilities, HeadingFix, LocationFix, LocationUpdate, Properties, Region,
    VisitEvent,
};

/// The callback surface a provider invokes on state changes.
///
/// Implemented by the delegate bridge; invoked by providers from an arbitrary
/// execution context, hence `Send + Sync`. Each method corresponds 1:1 to an
/// [`Event`](crate::Event) variant.
pub trait ProviderDelegate: Send + Sync {
    fn on_authorization_changed(&self, status: AuthorizationStatus);
    fn on_failed(&self, error: ProviderError);
    fn on_locations_updated(&self, fixes: Vec<LocationFix>);
    fn on_heading_updated(&self, heading: HeadingFix);
    fn on_region_entered(&self, region: Region);
    fn on_region_exited(&self, region: Region);
    fn on_monitoring_failed(&self, region: Option<Region>, error: ProviderError);
    fn on_visit(&self, visit: VisitEvent);
}

/// The capability set of a location provider.
///
/// At most one delegate may be installed at a time; installing a new one
/// replaces the previous registration (last writer wins, mirroring the
/// hardware). Commands like [`request_location`](Self::request_location) are
/// fire-and-forget: their results arrive only through the installed delegate,
/// which is why the command façade gates them on stream attachment.
pub trait LocationProvider: Send + Sync + 'static {
    /// Current authorization status.
    fn authorization_status(&self) -> AuthorizationStatus;

    /// Whether location services are enabled device-wide.
    fn location_services_enabled(&self) -> bool;

    /// The most recently determined fix, if any.
    fn current_location(&self) -> Option<LocationFix>;

    /// Install or clear the delegate. `None` uninstalls.
    fn set_delegate(&self, delegate: Option<Arc<dyn ProviderDelegate>>);

    /// Request a single fix, delivered later via
    /// [`ProviderDelegate::on_locations_updated`].
    fn request_location(&self);

    /// Prompt for while-in-use authorization. The outcome arrives later via
    /// [`ProviderDelegate::on_authorization_changed`].
    fn request_when_in_use_authorization(&self);

    /// Prompt for always authorization.
    fn request_always_authorization(&self);

    /// Start continuous location callbacks.
    fn start_updating_location(&self);

    /// Stop continuous location callbacks.
    fn stop_updating_location(&self);

    /// Start continuous heading callbacks.
    fn start_updating_heading(&self);

    /// Stop continuous heading callbacks.
    fn stop_updating_heading(&self);

    /// Begin monitoring entry/exit for a region.
    fn start_monitoring_region(&self, region: Region);

    /// Stop monitoring a region.
    fn stop_monitoring_region(&self, region: Region);

    /// Start visit callbacks.
    fn start_monitoring_visits(&self);

    /// Stop visit callbacks.
    fn stop_monitoring_visits(&self);

    /// The property keys this provider supports.
    fn capabilities(&self) -> Capabilities;

    /// Current values of all supported properties that have been set.
    fn properties(&self) -> Properties;

    /// Write the present keys of `properties`. Fails with
    /// [`LocationError::CapabilityUnavailable`] if any present key is outside
    /// the capability set; nothing is written in that case.
    fn set_properties(&self, properties: Properties) -> Result<(), LocationError>;

    /// Open an independent continuous-update subscription.
    ///
    /// Distinct from the delegate event stream: each call yields its own
    /// sequence and is cancelled independently by dropping the returned
    /// [`LiveUpdates`].
    fn start_live_updates(&self, config: LiveUpdateConfig) -> LiveUpdates;
}

/// Motion profile for a live-updates subscription.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LiveUpdateConfig {
    /// Provider-chosen defaults.
    #[default]
    Default,
    /// Optimize for road navigation.
    AutomotiveNavigation,
    /// Optimize for pedestrian fitness activity.
    Fitness,
    /// Optimize for airborne movement.
    Airborne,
    /// Optimize for other vehicular navigation.
    OtherNavigation,
}

/// One live-updates subscription.
///
/// Lazily yields [`LocationUpdate`] items; dropping it cancels the
/// subscription. No ordering is guaranteed across independent subscriptions.
#[derive(Debug)]
pub struct LiveUpdates {
    rx: mpsc::UnboundedReceiver<LocationUpdate>,
}

impl LiveUpdates {
    /// Create a subscription and the sending half a provider feeds it from.
    pub fn channel() -> (mpsc::UnboundedSender<LocationUpdate>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }

    /// The next update, or `None` once the provider ends the subscription.
    pub async fn next(&mut self) -> Option<LocationUpdate> {
        self.rx.recv().await
    }
}

impl Stream for LiveUpdates {
    type Item = LocationUpdate;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}
