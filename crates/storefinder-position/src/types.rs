use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use storefinder_core::{AppConfig, Coordinate};

use crate::PositionError;

/// Provider policy for a read or a watch.
///
/// The resolver never looks at these; they only shape how a provider
/// decides a reading is good enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    /// Oldest cached reading that may be answered without waiting for a new one.
    /// Zero means never use a cached reading.
    pub maximum_age: Duration,
    /// How long to wait for a reading before failing. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl PositionOptions {
    /// Defaults for a single read: no cache, no timeout.
    #[must_use]
    pub fn one_shot() -> Self {
        Self {
            enable_high_accuracy: false,
            maximum_age: Duration::ZERO,
            timeout: None,
        }
    }

    /// Defaults for continuous tracking: high accuracy, 10 s cache, 5 s timeout.
    #[must_use]
    pub fn live() -> Self {
        Self {
            enable_high_accuracy: true,
            maximum_age: Duration::from_secs(10),
            timeout: Some(Duration::from_secs(5)),
        }
    }

    /// Derive options from application config.
    ///
    /// Live tracking always asks for high accuracy; a one-shot read only does
    /// when configured to.
    #[must_use]
    pub fn from_app_config(config: &AppConfig, live: bool) -> Self {
        Self {
            enable_high_accuracy: live || config.high_accuracy,
            maximum_age: Duration::from_millis(config.max_age_ms),
            timeout: Some(Duration::from_millis(config.position_timeout_ms)),
        }
    }
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self::one_shot()
    }
}

/// One position reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionFix {
    pub coordinate: Coordinate,
    pub timestamp: DateTime<Utc>,
    /// Estimated horizontal accuracy in meters, when the host reports it.
    pub accuracy_m: Option<f64>,
}

impl PositionFix {
    /// A fix taken now.
    #[must_use]
    pub fn new(coordinate: Coordinate) -> Self {
        Self::at(coordinate, Utc::now())
    }

    #[must_use]
    pub fn at(coordinate: Coordinate, timestamp: DateTime<Utc>) -> Self {
        Self {
            coordinate,
            timestamp,
            accuracy_m: None,
        }
    }

    #[must_use]
    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = Some(accuracy_m);
        self
    }

    /// Age of this fix at `now`; a timestamp in the future counts as zero.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.timestamp).to_std().unwrap_or(Duration::ZERO)
    }

    /// Whether this fix may be served from cache under `maximum_age`.
    #[must_use]
    pub fn is_fresh(&self, maximum_age: Duration, now: DateTime<Utc>) -> bool {
        !maximum_age.is_zero() && self.age(now) <= maximum_age
    }
}

/// One item from a continuous position source.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionEvent {
    Fix(PositionFix),
    Failure(PositionError),
}
