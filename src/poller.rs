//! Cancellable periodic page fetcher.
//!
//! Owns at most one background task at a time. `restart` aborts the
//! previous task before spawning the next, so a stale interval never
//! outlives its (topic, limit, offset) inputs. The first fetch happens
//! immediately; each subsequent tick awaits its fetch before the next, so
//! the poller cannot race itself. Responses from other fetchers (the
//! post-action refetch) still interleave freely on the shared channel.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::api::client::WebhookApi;
use crate::events::AppEvent;

pub struct EventPoller {
    api: Arc<dyn WebhookApi>,
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl EventPoller {
    pub fn new(api: Arc<dyn WebhookApi>, interval: Duration) -> Self {
        Self {
            api,
            interval,
            task: None,
        }
    }

    /// Start polling `(topic, limit, offset)`, cancelling any previous poll.
    pub fn restart(
        &mut self,
        topic: &str,
        limit: u64,
        offset: u64,
        tx: UnboundedSender<AppEvent>,
    ) {
        self.stop();

        let api = Arc::clone(&self.api);
        let topic = topic.to_string();
        let interval = self.interval;

        tracing::debug!(%topic, limit, offset, "Starting event poll");

        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let result = api
                    .events(&topic, limit, offset)
                    .await
                    .map_err(|e| format!("{e:#}"));

                if let Err(e) = &result {
                    tracing::warn!(%topic, error = %e, "Event page fetch failed");
                }

                let delivered = tx.send(AppEvent::PageLoaded {
                    topic: topic.clone(),
                    limit,
                    offset,
                    result,
                });
                // Receiver gone means the UI loop exited.
                if delivered.is_err() {
                    break;
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for EventPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeApi;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn fetches_immediately_and_then_on_interval() {
        let api = Arc::new(FakeApi::default());
        api.set_page(crate::api::models::EventsResponse {
            events: vec![crate::api::models::Event {
                resource: Some("/items/MLA1".to_string()),
                ..Default::default()
            }],
            pagination: None,
        });
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut poller = EventPoller::new(api.clone(), Duration::from_secs(5));
        poller.restart("orders", 100, 0, tx);

        // First fetch is immediate, the second arrives after one interval.
        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        match (first, second) {
            (
                AppEvent::PageLoaded { topic: t1, .. },
                AppEvent::PageLoaded {
                    topic: t2,
                    limit,
                    offset,
                    result,
                },
            ) => {
                assert_eq!(t1, "orders");
                assert_eq!(t2, "orders");
                assert_eq!((limit, offset), (100, 0));
                let page = result.unwrap();
                assert_eq!(page.events.len(), 1);
            }
            other => panic!("unexpected events: {other:?}"),
        }
        assert!(api.events_calls() >= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_switches_inputs() {
        let api = Arc::new(FakeApi::default());
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut poller = EventPoller::new(api.clone(), Duration::from_secs(5));
        poller.restart("orders", 100, 0, tx.clone());
        rx.recv().await.unwrap();

        poller.restart("items", 100, 200, tx);
        // Drain until the new inputs show up; the old task is aborted so
        // only finitely many stale events can precede them.
        loop {
            match rx.recv().await.unwrap() {
                AppEvent::PageLoaded { topic, offset, .. } if topic == "items" => {
                    assert_eq!(offset, 200);
                    break;
                }
                AppEvent::PageLoaded { topic, .. } => assert_eq!(topic, "orders"),
                other => panic!("unexpected event: {other:?}"),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_reported_and_polling_continues() {
        let api = Arc::new(FakeApi::default());
        api.fail_events(true);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut poller = EventPoller::new(api.clone(), Duration::from_secs(5));
        poller.restart("orders", 100, 0, tx);

        match rx.recv().await.unwrap() {
            AppEvent::PageLoaded { result, .. } => assert!(result.is_err()),
            other => panic!("unexpected event: {other:?}"),
        }

        // The interval keeps ticking after a failure.
        api.fail_events(false);
        loop {
            match rx.recv().await.unwrap() {
                AppEvent::PageLoaded { result: Ok(_), .. } => break,
                AppEvent::PageLoaded { result: Err(_), .. } => continue,
                other => panic!("unexpected event: {other:?}"),
            }
        }
    }
}
