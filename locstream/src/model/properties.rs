//! Capability-keyed hardware configuration.
//!
//! Different device classes expose different subsets of the configuration
//! surface (a desktop has no heading hardware, a watch no background
//! indicator). Instead of conditional struct fields, configuration is a map
//! from [`PropertyKey`] to [`PropertyValue`], and each provider publishes an
//! explicit [`Capabilities`] set. A key absent from the capability set is
//! never read or written; attempting to write one is a typed error, not a
//! silent no-op.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Hint about the kind of motion the hardware should optimize for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityType {
    /// No particular activity.
    Other,
    /// Road navigation: snapping to roads, tunnel coasting.
    AutomotiveNavigation,
    /// Pedestrian fitness activity.
    Fitness,
    /// Non-automotive vehicular navigation (boats, trains).
    OtherNavigation,
    /// Airborne activity.
    Airborne,
}

/// Physical device orientation used as the heading reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceOrientation {
    Unknown,
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
    FaceUp,
    FaceDown,
}

/// The closed set of configurable hardware properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PropertyKey {
    /// Motion hint ([`ActivityType`]).
    ActivityType,
    /// Desired horizontal accuracy in meters.
    DesiredAccuracy,
    /// Minimum movement in meters before a new fix is reported.
    DistanceFilter,
    /// Minimum heading change in degrees before a new heading is reported.
    HeadingFilter,
    /// Orientation used as the heading reference ([`DeviceOrientation`]).
    HeadingOrientation,
    /// Whether the hardware may pause updates automatically.
    PausesAutomatically,
    /// Whether the system shows a background-usage indicator.
    ShowsBackgroundIndicator,
}

/// A typed property value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Activity(ActivityType),
    Meters(f64),
    Degrees(f64),
    Orientation(DeviceOrientation),
    Flag(bool),
}

/// A partial configuration: only the keys present are read or written.
///
/// Mirrors the "last writer wins per key" semantics of the underlying
/// hardware setters. Equality compares only present keys, so two
/// configurations touching disjoint keys are never equal unless both are
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    entries: BTreeMap<PropertyKey, PropertyValue>,
}

impl Properties {
    /// An empty configuration touching no keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no keys are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The value for a key, if present.
    pub fn get(&self, key: PropertyKey) -> Option<PropertyValue> {
        self.entries.get(&key).copied()
    }

    /// Set a raw key/value pair.
    pub fn insert(&mut self, key: PropertyKey, value: PropertyValue) {
        self.entries.insert(key, value);
    }

    /// Iterate over present keys and values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (PropertyKey, PropertyValue)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }

    /// Present keys in key order.
    pub fn keys(&self) -> impl Iterator<Item = PropertyKey> + '_ {
        self.entries.keys().copied()
    }

    /// Merge another configuration into this one, overwriting present keys.
    pub fn merge(&mut self, other: &Properties) {
        for (key, value) in other.iter() {
            self.entries.insert(key, value);
        }
    }

    // Builder-style setters for the common keys.

    pub fn with_activity_type(mut self, activity: ActivityType) -> Self {
        self.insert(PropertyKey::ActivityType, PropertyValue::Activity(activity));
        self
    }

    pub fn with_desired_accuracy(mut self, meters: f64) -> Self {
        self.insert(PropertyKey::DesiredAccuracy, PropertyValue::Meters(meters));
        self
    }

    pub fn with_distance_filter(mut self, meters: f64) -> Self {
        self.insert(PropertyKey::DistanceFilter, PropertyValue::Meters(meters));
        self
    }

    pub fn with_heading_filter(mut self, degrees: f64) -> Self {
        self.insert(PropertyKey::HeadingFilter, PropertyValue::Degrees(degrees));
        self
    }

    pub fn with_heading_orientation(mut self, orientation: DeviceOrientation) -> Self {
        self.insert(
            PropertyKey::HeadingOrientation,
            PropertyValue::Orientation(orientation),
        );
        self
    }

    pub fn with_pauses_automatically(mut self, pauses: bool) -> Self {
        self.insert(PropertyKey::PausesAutomatically, PropertyValue::Flag(pauses));
        self
    }

    pub fn with_shows_background_indicator(mut self, shows: bool) -> Self {
        self.insert(
            PropertyKey::ShowsBackgroundIndicator,
            PropertyValue::Flag(shows),
        );
        self
    }

    // Typed accessors.

    pub fn activity_type(&self) -> Option<ActivityType> {
        match self.get(PropertyKey::ActivityType) {
            Some(PropertyValue::Activity(a)) => Some(a),
            _ => None,
        }
    }

    pub fn desired_accuracy(&self) -> Option<f64> {
        match self.get(PropertyKey::DesiredAccuracy) {
            Some(PropertyValue::Meters(m)) => Some(m),
            _ => None,
        }
    }

    pub fn distance_filter(&self) -> Option<f64> {
        match self.get(PropertyKey::DistanceFilter) {
            Some(PropertyValue::Meters(m)) => Some(m),
            _ => None,
        }
    }

    pub fn heading_filter(&self) -> Option<f64> {
        match self.get(PropertyKey::HeadingFilter) {
            Some(PropertyValue::Degrees(d)) => Some(d),
            _ => None,
        }
    }

    pub fn heading_orientation(&self) -> Option<DeviceOrientation> {
        match self.get(PropertyKey::HeadingOrientation) {
            Some(PropertyValue::Orientation(o)) => Some(o),
            _ => None,
        }
    }

    pub fn pauses_automatically(&self) -> Option<bool> {
        match self.get(PropertyKey::PausesAutomatically) {
            Some(PropertyValue::Flag(f)) => Some(f),
            _ => None,
        }
    }

    pub fn shows_background_indicator(&self) -> Option<bool> {
        match self.get(PropertyKey::ShowsBackgroundIndicator) {
            Some(PropertyValue::Flag(f)) => Some(f),
            _ => None,
        }
    }
}

/// The set of property keys a provider supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    keys: BTreeSet<PropertyKey>,
}

impl Capabilities {
    /// A capability set from an explicit list of keys.
    pub fn of(keys: impl IntoIterator<Item = PropertyKey>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Every property key (handheld device class).
    pub fn full() -> Self {
        Self::of([
            PropertyKey::ActivityType,
            PropertyKey::DesiredAccuracy,
            PropertyKey::DistanceFilter,
            PropertyKey::HeadingFilter,
            PropertyKey::HeadingOrientation,
            PropertyKey::PausesAutomatically,
            PropertyKey::ShowsBackgroundIndicator,
        ])
    }

    /// Accuracy and distance filter only (desktop device class, no heading
    /// hardware or background indicator).
    pub fn basic() -> Self {
        Self::of([PropertyKey::DesiredAccuracy, PropertyKey::DistanceFilter])
    }

    /// Whether a key is supported.
    pub fn supports(&self, key: PropertyKey) -> bool {
        self.keys.contains(&key)
    }

    /// Supported keys in key order.
    pub fn keys(&self) -> impl Iterator<Item = PropertyKey> + '_ {
        self.keys.iter().copied()
    }
}
