//! Keyed tracker for per-row preview requests.
//!
//! One in-flight request per resource, held as a map from resource to task
//! handle. Each task sends `PreviewDone` on every exit path (trigger
//! failed, refetch failed, success), so the loading flag the UI keeps for
//! that resource is always released. On success the refetched page is
//! delivered first, then the completion event.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::api::client::WebhookApi;
use crate::events::AppEvent;

pub struct PreviewTracker {
    api: Arc<dyn WebhookApi>,
    tasks: HashMap<String, JoinHandle<()>>,
}

impl PreviewTracker {
    pub fn new(api: Arc<dyn WebhookApi>) -> Self {
        Self {
            api,
            tasks: HashMap::new(),
        }
    }

    /// Trigger preview generation for `resource`, then refetch the current
    /// page. Returns false when a request for that resource is already in
    /// flight; the duplicate trigger is ignored.
    pub fn trigger(
        &mut self,
        resource: &str,
        topic: &str,
        limit: u64,
        offset: u64,
        tx: UnboundedSender<AppEvent>,
    ) -> bool {
        self.reap_finished();

        if self.tasks.contains_key(resource) {
            tracing::debug!(%resource, "Preview request already in flight; ignoring");
            return false;
        }

        let api = Arc::clone(&self.api);
        let resource = resource.to_string();
        let topic = topic.to_string();

        let task = tokio::spawn({
            let resource = resource.clone();
            async move {
                let error = match api.trigger_preview(&resource).await {
                    Err(e) => Some(format!("preview trigger failed: {e:#}")),
                    Ok(()) => match api.events(&topic, limit, offset).await {
                        Err(e) => Some(format!("page refetch failed: {e:#}")),
                        Ok(page) => {
                            tx.send(AppEvent::PageLoaded {
                                topic,
                                limit,
                                offset,
                                result: Ok(page),
                            })
                            .ok();
                            None
                        }
                    },
                };

                if let Some(e) = &error {
                    tracing::warn!(%resource, error = %e, "Preview action failed");
                }

                // Always sent, so the loading flag is always released.
                tx.send(AppEvent::PreviewDone { resource, error }).ok();
            }
        });

        self.tasks.insert(resource, task);
        true
    }

    /// Forget the task for `resource` after its completion event arrived.
    pub fn complete(&mut self, resource: &str) {
        self.tasks.remove(resource);
    }

    fn reap_finished(&mut self) {
        self.tasks.retain(|_, task| !task.is_finished());
    }
}

impl Drop for PreviewTracker {
    fn drop(&mut self) {
        for task in self.tasks.values() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeApi;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn success_delivers_page_then_completion() {
        let api = Arc::new(FakeApi::default());
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut tracker = PreviewTracker::new(api.clone());
        assert!(tracker.trigger("/items/MLA1", "orders", 100, 0, tx));

        match rx.recv().await.unwrap() {
            AppEvent::PageLoaded { result, .. } => assert!(result.is_ok()),
            other => panic!("unexpected event: {other:?}"),
        }
        match rx.recv().await.unwrap() {
            AppEvent::PreviewDone { resource, error } => {
                assert_eq!(resource, "/items/MLA1");
                assert!(error.is_none());
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(api.preview_calls(), 1);
    }

    #[tokio::test]
    async fn failed_trigger_still_completes() {
        let api = Arc::new(FakeApi::default());
        api.fail_preview(true);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut tracker = PreviewTracker::new(api.clone());
        assert!(tracker.trigger("/items/MLA1", "orders", 100, 0, tx));

        // No page event on the failure path, but completion always arrives.
        match rx.recv().await.unwrap() {
            AppEvent::PreviewDone { resource, error } => {
                assert_eq!(resource, "/items/MLA1");
                assert!(error.unwrap().contains("preview trigger failed"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_refetch_still_completes() {
        let api = Arc::new(FakeApi::default());
        api.fail_events(true);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut tracker = PreviewTracker::new(api.clone());
        assert!(tracker.trigger("/items/MLA1", "orders", 100, 0, tx));

        match rx.recv().await.unwrap() {
            AppEvent::PreviewDone { error, .. } => {
                assert!(error.unwrap().contains("page refetch failed"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn duplicate_trigger_is_refused_until_completed() {
        let api = Arc::new(FakeApi::default());
        api.block_preview(true);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut tracker = PreviewTracker::new(api.clone());
        assert!(tracker.trigger("/items/MLA1", "orders", 100, 0, tx.clone()));
        assert!(!tracker.trigger("/items/MLA1", "orders", 100, 0, tx.clone()));
        // A different resource is independent.
        assert!(tracker.trigger("/items/MLB2", "orders", 100, 0, tx.clone()));

        api.block_preview(false);
        // Drain until MLA1 completes, then it may be triggered again.
        loop {
            if let AppEvent::PreviewDone { resource, .. } = rx.recv().await.unwrap() {
                if resource == "/items/MLA1" {
                    break;
                }
            }
        }
        tracker.complete("/items/MLA1");
        assert!(tracker.trigger("/items/MLA1", "orders", 100, 0, tx));
    }
}
