//! Error types.
//!
//! Provider-originated failures are reported asynchronously via delegate
//! callbacks, so they surface as [`Event::Failed`](crate::Event::Failed) on
//! the event stream, never as command results. Command-level failures (a
//! capability missing on this device class) return synchronously as
//! [`LocationError`].

use thiserror::Error;

use crate::model::PropertyKey;

/// An opaque error reported by the underlying platform provider.
///
/// Equality is defined by the underlying platform code only; the message is
/// informational and may differ between OS releases for the same failure.
#[derive(Debug, Clone, Error)]
#[error("provider error {code}: {message}")]
pub struct ProviderError {
    /// Platform error code.
    pub code: i32,
    /// Human-readable description from the platform.
    pub message: String,
}

impl ProviderError {
    /// Wrap a platform error code and message.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl PartialEq for ProviderError {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for ProviderError {}

/// Errors returned synchronously from command calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The provider rejected the command outright.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A single-result command produced no result.
    #[error("expected a single result, found none")]
    NoResultFound,

    /// The property is not in this provider's capability set.
    #[error("property {0:?} is not supported by this provider")]
    CapabilityUnavailable(PropertyKey),
}
