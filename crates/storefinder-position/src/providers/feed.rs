//! Host-driven position source.
//!
//! The host (a GPS reader, a replayed track, stdin) pushes fixes and failures
//! into a [`PositionFeed`]; every [`FeedProvider`] subscriber receives all of
//! them in delivery order. Each subscriber has its own unbounded queue, so a
//! slow consumer never loses events. The feed remembers the last good fix so
//! one-shot reads can be answered from cache under `maximum_age`.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use chrono::Utc;
use tokio::sync::mpsc;

use crate::subscription::Sink;
use crate::{
    PositionError, PositionEvent, PositionFix, PositionOptions, PositionProvider, Subscription,
};

#[derive(Debug, Default)]
struct FeedState {
    subscribers: Vec<mpsc::UnboundedSender<PositionEvent>>,
    last_fix: Option<PositionFix>,
}

impl FeedState {
    /// Send `event` to every live subscriber, forgetting the ones that are gone.
    fn publish(&mut self, event: &PositionEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

fn lock(state: &Mutex<FeedState>) -> MutexGuard<'_, FeedState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Write side of a host-driven position source.
///
/// Dropping every `PositionFeed` clone closes the stream: live subscriptions
/// end once they have drained their queue, and pending one-shot reads fail
/// with [`PositionError::Unavailable`].
#[derive(Debug, Clone, Default)]
pub struct PositionFeed {
    state: Arc<Mutex<FeedState>>,
}

impl PositionFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider reading from this feed. It does not keep the feed open.
    #[must_use]
    pub fn provider(&self) -> FeedProvider {
        FeedProvider {
            state: Arc::downgrade(&self.state),
        }
    }

    /// Publish a new fix.
    pub fn push(&self, fix: PositionFix) {
        let mut state = lock(&self.state);
        state.last_fix = Some(fix.clone());
        state.publish(&PositionEvent::Fix(fix));
    }

    /// Publish a failure. The cached fix is kept.
    pub fn fail(&self, error: PositionError) {
        lock(&self.state).publish(&PositionEvent::Failure(error));
    }

    /// The most recent fix pushed, if any.
    #[must_use]
    pub fn last_fix(&self) -> Option<PositionFix> {
        lock(&self.state).last_fix.clone()
    }
}

/// Read side of a [`PositionFeed`].
#[derive(Debug, Clone)]
pub struct FeedProvider {
    state: Weak<Mutex<FeedState>>,
}

impl FeedProvider {
    /// Register a new queue and read the cache in one step.
    ///
    /// Both happen under the feed lock, so a fix is either returned as the
    /// cached fix or queued, never both. A closed feed yields a queue that is
    /// already closed.
    fn register(
        &self,
        options: &PositionOptions,
    ) -> (Option<PositionFix>, mpsc::UnboundedReceiver<PositionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let Some(state) = self.state.upgrade() else {
            return (None, rx);
        };

        let mut state = lock(&state);
        let now = Utc::now();
        let cached = state
            .last_fix
            .as_ref()
            .filter(|fix| fix.is_fresh(options.maximum_age, now))
            .cloned();
        state.subscribers.push(tx);
        (cached, rx)
    }
}

impl PositionProvider for FeedProvider {
    fn get_once(
        &self,
        options: &PositionOptions,
    ) -> impl Future<Output = Result<PositionFix, PositionError>> + Send {
        let (cached, mut rx) = self.register(options);
        let timeout = options.timeout;

        async move {
            if let Some(fix) = cached {
                tracing::debug!(
                    age_ms = ?fix.age(Utc::now()).as_millis(),
                    "serving cached position"
                );
                return Ok(fix);
            }

            let wait = async {
                match rx.recv().await {
                    Some(PositionEvent::Fix(fix)) => Ok(fix),
                    Some(PositionEvent::Failure(err)) => Err(err),
                    None => Err(PositionError::Unavailable(
                        "position feed closed".to_string(),
                    )),
                }
            };

            match timeout {
                Some(limit) => tokio::time::timeout(limit, wait)
                    .await
                    .unwrap_or(Err(PositionError::Timeout(limit))),
                None => wait.await,
            }
        }
    }

    fn subscribe<U, E>(&self, options: &PositionOptions, on_update: U, on_error: E) -> Subscription
    where
        U: FnMut(PositionFix) + Send + 'static,
        E: FnMut(PositionError) + Send + 'static,
    {
        let sink = Sink::new(on_update, on_error);
        let (cached, mut rx) = self.register(options);

        let task = tokio::spawn({
            let sink = sink.clone();
            async move {
                if let Some(fix) = cached {
                    if !sink.deliver(PositionEvent::Fix(fix)) {
                        return;
                    }
                }
                while let Some(event) = rx.recv().await {
                    if !sink.deliver(event) {
                        return;
                    }
                }
                tracing::debug!("position feed closed; watch ended");
            }
        });

        Subscription::new(sink, Some(task))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::TimeDelta;
    use storefinder_core::Coordinate;
    use tokio::sync::mpsc;

    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate { lat, lng }
    }

    fn quick_options(maximum_age: Duration) -> PositionOptions {
        PositionOptions {
            enable_high_accuracy: true,
            maximum_age,
            timeout: Some(Duration::from_millis(200)),
        }
    }

    #[tokio::test]
    async fn get_once_waits_for_next_fix() {
        let feed = PositionFeed::new();
        let provider = feed.provider();
        let options = PositionOptions::one_shot();
        let read = provider.get_once(&options);
        let pusher = feed.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            pusher.push(PositionFix::new(coord(1.0, 2.0)));
        });
        let fix = read.await.unwrap();
        assert_eq!(fix.coordinate, coord(1.0, 2.0));
    }

    #[tokio::test]
    async fn get_once_serves_fresh_cache() {
        let feed = PositionFeed::new();
        feed.push(PositionFix::new(coord(3.0, 4.0)));
        let fix = feed
            .provider()
            .get_once(&quick_options(Duration::from_secs(10)))
            .await
            .unwrap();
        assert_eq!(fix.coordinate, coord(3.0, 4.0));
    }

    #[tokio::test]
    async fn stale_cache_is_ignored_and_read_times_out() {
        let feed = PositionFeed::new();
        let old = Utc::now() - TimeDelta::seconds(60);
        feed.push(PositionFix::at(coord(3.0, 4.0), old));
        let err = feed
            .provider()
            .get_once(&quick_options(Duration::from_secs(10)))
            .await
            .unwrap_err();
        assert_eq!(err, PositionError::Timeout(Duration::from_millis(200)));
    }

    #[tokio::test]
    async fn get_once_surfaces_pushed_failure() {
        let feed = PositionFeed::new();
        let provider = feed.provider();
        let options = PositionOptions::one_shot();
        let read = provider.get_once(&options);
        let pusher = feed.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            pusher.fail(PositionError::PermissionDenied);
        });
        assert_eq!(read.await.unwrap_err(), PositionError::PermissionDenied);
    }

    #[tokio::test]
    async fn dropping_feed_fails_pending_read() {
        let feed = PositionFeed::new();
        let provider = feed.provider();
        let options = PositionOptions::one_shot();
        let read = provider.get_once(&options);
        drop(feed);
        assert!(matches!(
            read.await.unwrap_err(),
            PositionError::Unavailable(_)
        ));
    }

    #[tokio::test]
    async fn subscription_sees_fixes_in_order_and_survives_failures() {
        let feed = PositionFeed::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let err_tx = tx.clone();
        let subscription = feed.provider().subscribe(
            &quick_options(Duration::ZERO),
            move |fix: PositionFix| tx.send(Ok(fix.coordinate)).unwrap(),
            move |err| err_tx.send(Err(err)).unwrap(),
        );

        tokio::task::yield_now().await;
        feed.push(PositionFix::new(coord(1.0, 1.0)));
        feed.fail(PositionError::Unavailable("tunnel".into()));
        feed.push(PositionFix::new(coord(2.0, 2.0)));

        assert_eq!(rx.recv().await.unwrap(), Ok(coord(1.0, 1.0)));
        assert_eq!(
            rx.recv().await.unwrap(),
            Err(PositionError::Unavailable("tunnel".into()))
        );
        assert_eq!(rx.recv().await.unwrap(), Ok(coord(2.0, 2.0)));
        subscription.cancel();
    }

    #[tokio::test]
    async fn subscription_starts_with_fresh_cached_fix() {
        let feed = PositionFeed::new();
        feed.push(PositionFix::new(coord(5.0, 5.0)));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _subscription = feed.provider().subscribe(
            &quick_options(Duration::from_secs(10)),
            move |fix: PositionFix| tx.send(fix.coordinate).unwrap(),
            |_| {},
        );
        assert_eq!(rx.recv().await.unwrap(), coord(5.0, 5.0));
    }

    #[tokio::test]
    async fn no_callbacks_after_cancel() {
        let feed = PositionFeed::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let subscription = feed.provider().subscribe(
            &quick_options(Duration::ZERO),
            move |fix: PositionFix| {
                let _ = tx.send(fix.coordinate);
            },
            |_| {},
        );

        tokio::task::yield_now().await;
        feed.push(PositionFix::new(coord(1.0, 1.0)));
        assert_eq!(rx.recv().await.unwrap(), coord(1.0, 1.0));

        subscription.cancel();
        feed.push(PositionFix::new(coord(2.0, 2.0)));
        tokio::time::sleep(Duration::from_millis(20)).await;
        // The sender lived inside the callback; cancelling dropped it.
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn wait_returns_after_feed_closes_and_drains() {
        let feed = PositionFeed::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let subscription = feed.provider().subscribe(
            &quick_options(Duration::ZERO),
            {
                let seen = Arc::clone(&seen);
                move |fix: PositionFix| seen.lock().unwrap().push(fix.coordinate)
            },
            |_| {},
        );

        feed.push(PositionFix::new(coord(1.0, 1.0)));
        feed.push(PositionFix::new(coord(2.0, 2.0)));
        drop(feed);
        subscription.wait().await;

        assert_eq!(*seen.lock().unwrap(), [coord(1.0, 1.0), coord(2.0, 2.0)]);
    }

    #[tokio::test]
    async fn slow_subscriber_receives_every_event() {
        let feed = PositionFeed::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let subscription = feed.provider().subscribe(
            &quick_options(Duration::ZERO),
            {
                let seen = Arc::clone(&seen);
                move |fix: PositionFix| seen.lock().unwrap().push(Ok(fix.coordinate.lat))
            },
            {
                let seen = Arc::clone(&seen);
                move |err: PositionError| seen.lock().unwrap().push(Err(err))
            },
        );

        // The subscriber task does not run until the test awaits.
        for i in 0..200 {
            feed.push(PositionFix::new(coord(f64::from(i) / 10.0, 0.0)));
            if i % 50 == 0 {
                feed.fail(PositionError::Unavailable(format!("gap {i}")));
            }
        }
        drop(feed);
        subscription.wait().await;

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 204);
        let lats: Vec<f64> = seen.iter().filter_map(|e| e.as_ref().ok().copied()).collect();
        let expected: Vec<f64> = (0..200).map(|i| f64::from(i) / 10.0).collect();
        assert_eq!(lats, expected);
        assert_eq!(seen[1], Err(PositionError::Unavailable("gap 0".into())));
    }

    #[tokio::test]
    async fn cached_fix_is_delivered_once() {
        let feed = PositionFeed::new();
        feed.push(PositionFix::new(coord(5.0, 5.0)));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let subscription = feed.provider().subscribe(
            &quick_options(Duration::from_secs(10)),
            {
                let seen = Arc::clone(&seen);
                move |fix: PositionFix| seen.lock().unwrap().push(fix.coordinate)
            },
            |_| {},
        );
        feed.push(PositionFix::new(coord(6.0, 6.0)));
        drop(feed);
        subscription.wait().await;

        assert_eq!(*seen.lock().unwrap(), [coord(5.0, 5.0), coord(6.0, 6.0)]);
    }

    #[tokio::test]
    async fn provider_outliving_feed_is_closed() {
        let provider = PositionFeed::new().provider();
        let options = PositionOptions::one_shot();
        assert!(matches!(
            provider.get_once(&options).await,
            Err(PositionError::Unavailable(_))
        ));

        let subscription = provider.subscribe(&options, |_| {}, |_| {});
        subscription.wait().await;
    }

    #[tokio::test]
    async fn dropped_subscribers_are_forgotten() {
        let feed = PositionFeed::new();
        let subscription = feed
            .provider()
            .subscribe(&quick_options(Duration::ZERO), |_| {}, |_| {});
        assert_eq!(lock(&feed.state).subscribers.len(), 1);
        subscription.cancel();
        tokio::time::sleep(Duration::from_millis(20)).await;
        feed.push(PositionFix::new(coord(1.0, 1.0)));
        assert!(lock(&feed.state).subscribers.is_empty());
    }

    #[test]
    fn last_fix_tracks_latest_push() {
        let feed = PositionFeed::new();
        assert!(feed.last_fix().is_none());
        feed.push(PositionFix::new(coord(1.0, 1.0)));
        feed.push(PositionFix::new(coord(2.0, 2.0)));
        assert_eq!(feed.last_fix().unwrap().coordinate, coord(2.0, 2.0));
    }
}
