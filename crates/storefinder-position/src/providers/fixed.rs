use std::future::Future;

use storefinder_core::Coordinate;

use crate::subscription::Sink;
use crate::{
    PositionError, PositionEvent, PositionFix, PositionOptions, PositionProvider, Subscription,
};

/// A provider that always reports the same outcome.
///
/// Used for positions supplied up front (command-line arguments, tests). A
/// subscription delivers the outcome once and then stays quiet.
#[derive(Debug, Clone)]
pub struct FixedProvider {
    outcome: Result<Coordinate, PositionError>,
    accuracy_m: Option<f64>,
}

impl FixedProvider {
    #[must_use]
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            outcome: Ok(coordinate),
            accuracy_m: None,
        }
    }

    /// A provider whose every read fails with `error`.
    #[must_use]
    pub fn failing(error: PositionError) -> Self {
        Self {
            outcome: Err(error),
            accuracy_m: None,
        }
    }

    #[must_use]
    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = Some(accuracy_m);
        self
    }

    fn event(&self) -> PositionEvent {
        match &self.outcome {
            Ok(coordinate) => {
                let fix = PositionFix::new(*coordinate);
                PositionEvent::Fix(match self.accuracy_m {
                    Some(accuracy) => fix.with_accuracy(accuracy),
                    None => fix,
                })
            }
            Err(err) => PositionEvent::Failure(err.clone()),
        }
    }
}

impl PositionProvider for FixedProvider {
    fn get_once(
        &self,
        _options: &PositionOptions,
    ) -> impl Future<Output = Result<PositionFix, PositionError>> + Send {
        let event = self.event();
        async move {
            match event {
                PositionEvent::Fix(fix) => Ok(fix),
                PositionEvent::Failure(err) => Err(err),
            }
        }
    }

    fn subscribe<U, E>(&self, _options: &PositionOptions, on_update: U, on_error: E) -> Subscription
    where
        U: FnMut(PositionFix) + Send + 'static,
        E: FnMut(PositionError) + Send + 'static,
    {
        let sink = Sink::new(on_update, on_error);
        let event = self.event();
        let task = tokio::spawn({
            let sink = sink.clone();
            async move {
                sink.deliver(event);
            }
        });
        Subscription::new(sink, Some(task))
    }
}
