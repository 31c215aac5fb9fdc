use std::future::Future;

use crate::{PositionError, PositionFix, PositionOptions, Subscription};

/// A source of user positions.
///
/// Implementations must be used from within a tokio runtime: subscriptions
/// deliver their callbacks from a spawned task, never from inside
/// [`PositionProvider::subscribe`] itself.
pub trait PositionProvider {
    /// Read the current position once.
    fn get_once(
        &self,
        options: &PositionOptions,
    ) -> impl Future<Output = Result<PositionFix, PositionError>> + Send;

    /// Watch the position continuously.
    ///
    /// `on_update` runs for every fix, `on_error` for every failure. A
    /// failure does not end the watch; only cancelling the returned
    /// [`Subscription`] (or dropping it) does.
    fn subscribe<U, E>(&self, options: &PositionOptions, on_update: U, on_error: E) -> Subscription
    where
        U: FnMut(PositionFix) + Send + 'static,
        E: FnMut(PositionError) + Send + 'static;
}
