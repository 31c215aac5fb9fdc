//! Handle for a live position watch.
//!
//! A subscription owns the callbacks and the task feeding them. Callbacks run
//! while holding the sink lock and cancellation takes the same lock, so once
//! [`Subscription::cancel`] returns no callback is running and none will run
//! again.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;

use crate::{PositionError, PositionEvent, PositionFix};

type UpdateFn = Box<dyn FnMut(PositionFix) + Send>;
type ErrorFn = Box<dyn FnMut(PositionError) + Send>;

struct Callbacks {
    on_update: UpdateFn,
    on_error: ErrorFn,
}

/// Provider-side end of a subscription: delivers events until cancelled.
#[derive(Clone)]
pub struct Sink {
    inner: Arc<Mutex<Option<Callbacks>>>,
}

impl Sink {
    pub fn new<U, E>(on_update: U, on_error: E) -> Self
    where
        U: FnMut(PositionFix) + Send + 'static,
        E: FnMut(PositionError) + Send + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(Some(Callbacks {
                on_update: Box::new(on_update),
                on_error: Box::new(on_error),
            }))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Callbacks>> {
        // A panicking callback must not wedge cancellation.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deliver one event. Returns `false` once the subscription is cancelled,
    /// which tells the feeding task to stop.
    pub fn deliver(&self, event: PositionEvent) -> bool {
        let mut guard = self.lock();
        let Some(callbacks) = guard.as_mut() else {
            return false;
        };
        match event {
            PositionEvent::Fix(fix) => (callbacks.on_update)(fix),
            PositionEvent::Failure(err) => (callbacks.on_error)(err),
        }
        true
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.lock().is_some()
    }

    fn close(&self) {
        self.lock().take();
    }
}

/// A live watch on a position provider.
///
/// Dropping the subscription cancels it.
#[must_use = "dropping a Subscription cancels it immediately"]
pub struct Subscription {
    sink: Sink,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Tie a sink to the task feeding it. `task` is aborted on cancel.
    pub fn new(sink: Sink, task: Option<JoinHandle<()>>) -> Self {
        Self { sink, task }
    }

    /// Whether callbacks may still fire.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.sink.is_open()
    }

    /// Release the watch. No callback fires after this returns.
    pub fn cancel(mut self) {
        self.release();
    }

    /// Wait for a finite source to run out, then release the watch.
    ///
    /// Returns once the feeding task has delivered its last event. Without a
    /// task this is the same as [`Subscription::cancel`].
    pub async fn wait(mut self) {
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                if err.is_panic() {
                    tracing::error!("position subscription task panicked");
                }
            }
        }
        self.sink.close();
    }

    fn release(&mut self) {
        self.sink.close();
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("position subscription cancelled");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}
