//! Locstream - pull-based event streaming over a single-delegate location provider
//!
//! Location hardware exposes an imperative, callback-driven interface: one
//! delegate slot, commands whose results arrive later as delegate callbacks,
//! and lost events for anything issued before a delegate is installed. This
//! library bridges that interface into ordinary async Rust:
//!
//! - [`LocationClient::events`] attaches a consumer and yields provider
//!   callbacks as an ordered, cancellable [`EventStream`].
//! - Commands whose results surface only on that stream (`request_location`,
//!   the `start_*` family, live updates) wait on a [`ReadinessBarrier`] until
//!   a consumer is attached, so a request can never lose its result.
//! - [`MockProvider`] swaps in behind the same [`LocationProvider`] trait and
//!   lets tests inject delegate callbacks deterministically.
//!
//! # Example
//!
//! ```ignore
//! use locstream::{Event, LocationClient, MockProvider};
//!
//! let provider = MockProvider::new();
//! let handle = provider.handle();
//! let client = LocationClient::new(std::sync::Arc::new(provider));
//!
//! let mut events = client.events();
//! client.request_location().await;
//!
//! while let Some(event) = events.next().await {
//!     match event {
//!         Event::LocationsUpdated(fixes) => println!("fix: {:?}", fixes[0]),
//!         Event::AuthorizationChanged(status) => println!("auth: {:?}", status),
//!         _ => {}
//!     }
//! }
//! ```

pub mod barrier;
pub mod bridge;
pub mod client;
pub mod error;
pub mod event;
pub mod mock;
pub mod model;
pub mod provider;

pub use barrier::ReadinessBarrier;
pub use bridge::EventStream;
pub use client::LocationClient;
pub use error::{LocationError, ProviderError};
pub use event::Event;
pub use mock::{MockConfig, MockHandle, MockProvider};
pub use model::{
    ActivityType, AuthorizationStatus, Capabilities, Coordinate, DeviceOrientation, HeadingFix,
    LocationFix, LocationUpdate, Properties, PropertyKey, PropertyValue, Region, VisitEvent,
};
pub use provider::{LiveUpdateConfig, LiveUpdates, LocationProvider, ProviderDelegate};
