//! Location view state driven by a position source.
//!
//! The state is never patched field by field. Each fix produces a brand new
//! [`Snapshot`] from one full resolver run, so the origin and the nearest
//! store shown together always belong to the same reading.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use storefinder_core::{resolve, Catalog, Coordinate, CoreError, RankedStore};

use crate::{
    PositionError, PositionEvent, PositionFix, PositionOptions, PositionProvider, Subscription,
};

/// The nearest-store answer for one position fix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub origin: Coordinate,
    pub fix_time: DateTime<Utc>,
    pub accuracy_m: Option<f64>,
    /// `None` only when the catalog is empty.
    pub nearest: Option<RankedStore>,
}

impl Snapshot {
    /// Resolve the nearest store for `fix`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] if the fix or the catalog
    /// holds an invalid coordinate.
    pub fn resolve(fix: &PositionFix, catalog: &Catalog) -> Result<Self, CoreError> {
        let nearest = resolve(fix.coordinate, catalog.stores())?;
        Ok(Self {
            origin: fix.coordinate,
            fix_time: fix.timestamp,
            accuracy_m: fix.accuracy_m,
            nearest,
        })
    }
}

/// What the location view currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LocationState {
    /// No reading yet.
    Fetching,
    Located(Snapshot),
    /// The last event was a failure; `last` keeps the previous good snapshot.
    Failed {
        message: String,
        last: Option<Snapshot>,
    },
}

impl LocationState {
    /// Fold one provider event into a new state.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] when a fix cannot be resolved.
    pub fn apply(self, event: &PositionEvent, catalog: &Catalog) -> Result<Self, CoreError> {
        match event {
            PositionEvent::Fix(fix) => Ok(LocationState::Located(Snapshot::resolve(fix, catalog)?)),
            PositionEvent::Failure(err) => Ok(LocationState::Failed {
                message: err.to_string(),
                last: self.into_snapshot(),
            }),
        }
    }

    /// The most recent good snapshot, whether or not an error followed it.
    #[must_use]
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            LocationState::Fetching => None,
            LocationState::Located(snapshot) => Some(snapshot),
            LocationState::Failed { last, .. } => last.as_ref(),
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            LocationState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    fn into_snapshot(self) -> Option<Snapshot> {
        match self {
            LocationState::Fetching => None,
            LocationState::Located(snapshot) => Some(snapshot),
            LocationState::Failed { last, .. } => last,
        }
    }

    /// Like [`LocationState::apply`], but a resolver error becomes a
    /// `Failed` state. Invalid coordinates are data defects, so they are
    /// logged loudly rather than retried.
    fn advance(self, event: &PositionEvent, catalog: &Catalog) -> Self {
        let previous = self.snapshot().cloned();
        match self.apply(event, catalog) {
            Ok(next) => next,
            Err(err) => {
                tracing::error!(error = %err, "cannot resolve nearest store for position");
                LocationState::Failed {
                    message: err.to_string(),
                    last: previous,
                }
            }
        }
    }
}

struct TrackerState<F> {
    state: LocationState,
    on_state: F,
}

impl<F: FnMut(&LocationState)> TrackerState<F> {
    fn handle(&mut self, event: &PositionEvent, catalog: &Catalog) {
        let current = std::mem::replace(&mut self.state, LocationState::Fetching);
        self.state = current.advance(event, catalog);
        (self.on_state)(&self.state);
    }
}

/// Watch `provider` and report a fresh [`LocationState`] after every event.
///
/// `on_state` is called once with [`LocationState::Fetching`] before this
/// returns, then once per provider event until the subscription is cancelled.
pub fn track<P, F>(
    provider: &P,
    catalog: Arc<Catalog>,
    options: &PositionOptions,
    mut on_state: F,
) -> Subscription
where
    P: PositionProvider,
    F: FnMut(&LocationState) + Send + 'static,
{
    on_state(&LocationState::Fetching);

    let shared = Arc::new(Mutex::new(TrackerState {
        state: LocationState::Fetching,
        on_state,
    }));

    let on_update = {
        let shared = Arc::clone(&shared);
        let catalog = Arc::clone(&catalog);
        move |fix: PositionFix| {
            shared
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .handle(&PositionEvent::Fix(fix), &catalog);
        }
    };

    let on_error = move |err: PositionError| {
        tracing::warn!(error = %err, "position provider reported a failure");
        shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .handle(&PositionEvent::Failure(err), &catalog);
    };

    provider.subscribe(options, on_update, on_error)
}

/// Read the position once and resolve the nearest store.
pub async fn locate_once<P>(
    provider: &P,
    catalog: &Catalog,
    options: &PositionOptions,
) -> LocationState
where
    P: PositionProvider,
{
    let event = match provider.get_once(options).await {
        Ok(fix) => PositionEvent::Fix(fix),
        Err(err) => {
            tracing::warn!(error = %err, "could not read position");
            PositionEvent::Failure(err)
        }
    };
    LocationState::Fetching.advance(&event, catalog)
}
