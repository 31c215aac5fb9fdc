use std::time::Duration;

use thiserror::Error;

/// Reasons a provider could not produce a position.
///
/// Every variant is a "position unavailable" condition: the caller shows the
/// message to the user and keeps running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    /// The user or host refused location access.
    #[error("permission to access location was denied")]
    PermissionDenied,

    /// The host has no location API at all.
    #[error("geolocation not supported")]
    NotSupported,

    /// The host tried but could not determine a position.
    #[error("position unavailable: {0}")]
    Unavailable(String),

    /// No fix arrived within the configured timeout.
    #[error("timed out after {}ms waiting for a position", .0.as_millis())]
    Timeout(Duration),
}
