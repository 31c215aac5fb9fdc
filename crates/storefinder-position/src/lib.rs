//! Position acquisition for storefinder.
//!
//! A [`PositionProvider`] wraps whatever the host offers for location: a
//! one-shot read or a continuous stream of fixes. The [`tracker`] module
//! turns that stream into [`LocationState`] values, re-running the
//! nearest-store resolver from scratch on every fix.

pub mod error;
pub mod provider;
pub mod providers;
pub mod subscription;
pub mod tracker;
pub mod types;

pub use error::PositionError;
pub use provider::PositionProvider;
pub use providers::{FeedProvider, FixedProvider, PositionFeed, UnsupportedProvider};
pub use subscription::Subscription;
pub use tracker::{locate_once, track, LocationState, Snapshot};
pub use types::{PositionEvent, PositionFix, PositionOptions};
