//! Delegate-to-stream bridge.
//!
//! The bridge owns the provider's single delegate slot and turns its
//! callback-driven interface into a pull-based [`EventStream`]:
//!
//! ```text
//! Provider callback ──► ChannelDelegate ──► unbounded channel ──► EventStream
//!                         (per epoch)                              (consumer)
//! ```
//!
//! # State machine
//!
//! Detached ── attach() ──► Attached ── stream dropped ──► Detached
//!
//! - Attach: fresh channel, delegate installed (replacing any previous
//!   registration, last writer wins), readiness barrier armed.
//! - Attached: every callback becomes exactly one [`Event`], pushed
//!   non-blocking; the channel is unbounded so nothing is ever dropped.
//! - Detach: the stream's `Drop` closes its delegate so a stale provider
//!   reference can emit nothing further, and - if this stream still owns the
//!   slot - uninstalls the delegate and resets the barrier.
//!
//! Attachments carry an epoch so that dropping a stream that was already
//! replaced by a newer `attach()` does not disturb the newer registration.

use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use crate::barrier::ReadinessBarrier;
use crate::error::ProviderError;
use crate::event::Event;
use crate::model::{AuthorizationStatus, HeadingFix, LocationFix, Region, VisitEvent};
use crate::provider::{LocationProvider, ProviderDelegate};

/// Bridge between one provider's delegate slot and attached event streams.
pub(crate) struct DelegateBridge {
    provider: Arc<dyn LocationProvider>,
    barrier: ReadinessBarrier,
    /// Current attachment epoch; the live stream is the one whose epoch
    /// matches. The lock must span an epoch change together with its
    /// matching delegate install/uninstall: streams drop on arbitrary
    /// threads, and a stale drop observing the epoch between an attach's
    /// bump and its install could otherwise uninstall the newer
    /// registration.
    epoch: Mutex<u64>,
}

impl DelegateBridge {
    pub(crate) fn new(provider: Arc<dyn LocationProvider>) -> Self {
        Self {
            provider,
            barrier: ReadinessBarrier::new(),
            epoch: Mutex::new(0),
        }
    }

    pub(crate) fn barrier(&self) -> &ReadinessBarrier {
        &self.barrier
    }

    /// Attach a consumer: install a fresh channel delegate and arm the
    /// barrier. An existing attachment is silently replaced.
    pub(crate) fn attach(self: &Arc<Self>) -> EventStream {
        let (tx, rx) = mpsc::unbounded_channel();
        let delegate = Arc::new(ChannelDelegate {
            tx,
            closed: AtomicBool::new(false),
        });

        let epoch = {
            let mut epoch = self.epoch.lock();
            *epoch += 1;
            self.provider
                .set_delegate(Some(delegate.clone() as Arc<dyn ProviderDelegate>));
            self.barrier.arm();
            *epoch
        };
        info!(epoch, "event stream attached, delegate installed");

        EventStream {
            rx,
            bridge: Arc::clone(self),
            delegate,
            epoch,
        }
    }

    fn detach(&self, delegate: &ChannelDelegate, epoch: u64) {
        delegate.close();
        let current = self.epoch.lock();
        if *current == epoch {
            self.provider.set_delegate(None);
            self.barrier.reset();
            info!(epoch, "event stream detached, delegate uninstalled");
        } else {
            debug!(
                epoch,
                "stale event stream dropped; newer attachment keeps the delegate slot"
            );
        }
    }
}

/// Delegate installed on the provider for one attachment epoch.
///
/// Forwards each callback into the stream's channel. Once closed it forwards
/// nothing, even if the provider incorrectly retains a stale reference.
struct ChannelDelegate {
    tx: mpsc::UnboundedSender<Event>,
    closed: AtomicBool,
}

impl ChannelDelegate {
    fn forward(&self, event: Event) {
        if self.closed.load(Ordering::Acquire) {
            return;
        }
        trace!(kind = event.kind(), "forwarding provider event");
        // A send error means the receiver is mid-drop; detach will follow.
        let _ = self.tx.send(event);
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

impl ProviderDelegate for ChannelDelegate {
    fn on_authorization_changed(&self, status: AuthorizationStatus) {
        self.forward(Event::AuthorizationChanged(status));
    }

    fn on_failed(&self, error: ProviderError) {
        self.forward(Event::Failed(error));
    }

    fn on_locations_updated(&self, fixes: Vec<LocationFix>) {
        self.forward(Event::LocationsUpdated(fixes));
    }

    fn on_heading_updated(&self, heading: HeadingFix) {
        self.forward(Event::HeadingUpdated(heading));
    }

    fn on_region_entered(&self, region: Region) {
        self.forward(Event::RegionEntered(region));
    }

    fn on_region_exited(&self, region: Region) {
        self.forward(Event::RegionExited(region));
    }

    fn on_monitoring_failed(&self, region: Option<Region>, error: ProviderError) {
        self.forward(Event::MonitoringFailed { region, error });
    }

    fn on_visit(&self, visit: VisitEvent) {
        self.forward(Event::VisitRecorded(visit));
    }
}

/// Ordered stream of provider events for one attachment.
///
/// Yields events in exactly the order the provider invoked its callbacks.
/// The stream never ends on its own while attached; dropping it detaches the
/// delegate and resets the readiness barrier, after which no further events
/// are delivered.
pub struct EventStream {
    rx: mpsc::UnboundedReceiver<Event>,
    bridge: Arc<DelegateBridge>,
    delegate: Arc<ChannelDelegate>,
    epoch: u64,
}

impl EventStream {
    /// The next event, in provider callback order.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// A non-suspending probe for an already-buffered event, for tests and
    /// polling consumers.
    pub fn try_next(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }
}

impl Stream for EventStream {
    type Item = Event;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        self.bridge.detach(&self.delegate, self.epoch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockConfig, MockProvider};
    use crate::model::Coordinate;
    use chrono::{DateTime, Utc};
    use std::time::Duration;
    use tokio::time::timeout;

    fn quiet_provider() -> MockProvider {
        MockProvider::with_config(MockConfig {
            announce_authorization_on_attach: false,
            respond_to_request_location: false,
            ..MockConfig::default()
        })
    }

    fn bridge_over(provider: &MockProvider) -> Arc<DelegateBridge> {
        Arc::new(DelegateBridge::new(Arc::new(provider.clone())))
    }

    #[tokio::test]
    async fn test_events_preserve_callback_order() {
        let provider = quiet_provider();
        let handle = provider.handle();
        let bridge = bridge_over(&provider);

        let mut stream = bridge.attach();
        let injected = vec![
            Event::AuthorizationChanged(AuthorizationStatus::AuthorizedWhenInUse),
            Event::LocationsUpdated(vec![LocationFix::at(40.0, -73.0)]),
            Event::HeadingUpdated(HeadingFix::new(10.0, 12.0, 1.0)),
            Event::Failed(ProviderError::new(1, "location unknown")),
        ];
        for event in &injected {
            handle.inject(event.clone());
        }

        for expected in &injected {
            let got = timeout(Duration::from_millis(200), stream.next())
                .await
                .expect("event should be buffered")
                .expect("stream is attached");
            assert_eq!(&got, expected);
        }
        assert!(stream.try_next().is_none(), "no duplicated events");
    }

    #[tokio::test]
    async fn test_attach_arms_and_detach_resets_barrier() {
        let provider = quiet_provider();
        let handle = provider.handle();
        let bridge = bridge_over(&provider);

        assert!(!bridge.barrier().is_armed());
        let stream = bridge.attach();
        assert!(bridge.barrier().is_armed());
        assert!(handle.delegate_installed());

        drop(stream);
        assert!(!bridge.barrier().is_armed());
        assert!(!handle.delegate_installed());
    }

    #[tokio::test]
    async fn test_single_registration_across_cycles() {
        let provider = quiet_provider();
        let handle = provider.handle();
        let bridge = bridge_over(&provider);

        for _ in 0..2 {
            let stream = bridge.attach();
            assert!(handle.delegate_installed());
            drop(stream);
        }
        assert!(!handle.delegate_installed());
    }

    #[tokio::test]
    async fn test_second_attach_replaces_first() {
        let provider = quiet_provider();
        let handle = provider.handle();
        let bridge = bridge_over(&provider);

        let mut first = bridge.attach();
        let mut second = bridge.attach();

        handle.inject(Event::AuthorizationChanged(AuthorizationStatus::Denied));

        // Only the newer attachment receives events.
        let got = timeout(Duration::from_millis(200), second.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got, Event::AuthorizationChanged(AuthorizationStatus::Denied));
        assert!(first.try_next().is_none());

        // Dropping the stale stream must not disturb the live registration.
        drop(first);
        assert!(handle.delegate_installed());
        assert!(bridge.barrier().is_armed());

        handle.inject(Event::AuthorizationChanged(AuthorizationStatus::Restricted));
        let got = timeout(Duration::from_millis(200), second.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            got,
            Event::AuthorizationChanged(AuthorizationStatus::Restricted)
        );

        drop(second);
        assert!(!handle.delegate_installed());
        assert!(!bridge.barrier().is_armed());
    }

    #[tokio::test]
    async fn test_drop_racing_attach_keeps_newer_registration() {
        // Streams drop on arbitrary threads. However the drop of the current
        // stream interleaves with a concurrent re-attach, the replacement
        // must end up installed and armed; only dropping the replacement
        // clears the slot.
        let provider = quiet_provider();
        let handle = provider.handle();
        let bridge = bridge_over(&provider);

        for _ in 0..200 {
            let first = bridge.attach();
            let dropper = std::thread::spawn(move || drop(first));
            let second = bridge.attach();
            dropper.join().unwrap();

            assert!(handle.delegate_installed());
            assert!(bridge.barrier().is_armed());

            drop(second);
            assert!(!handle.delegate_installed());
            assert!(!bridge.barrier().is_armed());
        }
    }

    #[tokio::test]
    async fn test_monitoring_and_visit_callbacks_reach_the_stream() {
        let provider = quiet_provider();
        let handle = provider.handle();
        let bridge = bridge_over(&provider);
        let mut stream = bridge.attach();

        let region = Region::new("pier", Coordinate::new(40.70, -74.00), 100.0);
        let visit = VisitEvent::new(
            Coordinate::new(40.6501, -73.94958),
            10.0,
            DateTime::<Utc>::UNIX_EPOCH,
            DateTime::<Utc>::UNIX_EPOCH,
        );

        handle.inject(Event::MonitoringFailed {
            region: Some(region.clone()),
            error: ProviderError::new(5, "region monitoring unavailable"),
        });
        handle.inject(Event::VisitRecorded(visit.clone()));

        let got = timeout(Duration::from_millis(200), stream.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            got,
            Event::MonitoringFailed {
                region: Some(region),
                error: ProviderError::new(5, "region monitoring unavailable"),
            }
        );
        let got = timeout(Duration::from_millis(200), stream.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got, Event::VisitRecorded(visit));
    }

    #[tokio::test]
    async fn test_closed_delegate_is_silent_even_with_stale_reference() {
        let provider = quiet_provider();
        let bridge = bridge_over(&provider);

        let stream = bridge.attach();
        // Simulate a provider that incorrectly retains the delegate past
        // uninstallation.
        let stale = Arc::clone(&stream.delegate);
        drop(stream);

        assert!(stale.closed.load(Ordering::Acquire));
        // Callbacks on the stale reference are swallowed, not panics.
        stale.on_authorization_changed(AuthorizationStatus::Denied);

        let mut replacement = bridge.attach();
        assert!(
            replacement.try_next().is_none(),
            "closed delegate must not emit into any channel"
        );
    }
}
