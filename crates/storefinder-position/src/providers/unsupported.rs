use std::future::Future;

use crate::subscription::Sink;
use crate::{
    PositionError, PositionEvent, PositionFix, PositionOptions, PositionProvider, Subscription,
};

/// Stand-in for a host without any location API.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedProvider;

impl PositionProvider for UnsupportedProvider {
    fn get_once(
        &self,
        _options: &PositionOptions,
    ) -> impl Future<Output = Result<PositionFix, PositionError>> + Send {
        std::future::ready(Err(PositionError::NotSupported))
    }

    fn subscribe<U, E>(&self, _options: &PositionOptions, on_update: U, on_error: E) -> Subscription
    where
        U: FnMut(PositionFix) + Send + 'static,
        E: FnMut(PositionError) + Send + 'static,
    {
        let sink = Sink::new(on_update, on_error);
        let task = tokio::spawn({
            let sink = sink.clone();
            async move {
                sink.deliver(PositionEvent::Failure(PositionError::NotSupported));
            }
        });
        Subscription::new(sink, Some(task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_read_is_not_supported() {
        let err = UnsupportedProvider
            .get_once(&PositionOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err, PositionError::NotSupported);
    }

    #[tokio::test]
    async fn subscription_reports_not_supported() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let _subscription = UnsupportedProvider.subscribe(
            &PositionOptions::live(),
            |_| panic!("no fixes expected"),
            move |err| tx.send(err).unwrap(),
        );
        assert_eq!(rx.recv().await, Some(PositionError::NotSupported));
    }
}
