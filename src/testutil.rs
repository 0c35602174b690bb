//! Shared test double for the API seam.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::api::client::WebhookApi;
use crate::api::models::{EventsResponse, Topic};
use crate::prefs::{Prefs, PrefsStore};

/// In-memory `PrefsStore`.
#[derive(Default)]
pub struct MemPrefsStore {
    prefs: Mutex<Prefs>,
}

impl PrefsStore for MemPrefsStore {
    fn load(&self) -> Prefs {
        self.prefs.lock().unwrap().clone()
    }

    fn save(&self, prefs: &Prefs) {
        *self.prefs.lock().unwrap() = prefs.clone();
    }
}

/// In-memory `WebhookApi` with switchable failure modes and call counters.
#[derive(Default)]
pub struct FakeApi {
    topics: Mutex<Vec<Topic>>,
    page: Mutex<EventsResponse>,
    fail_events: AtomicBool,
    fail_preview: AtomicBool,
    block_preview: AtomicBool,
    events_calls: AtomicUsize,
    preview_calls: AtomicUsize,
}

impl FakeApi {
    pub fn set_page(&self, page: EventsResponse) {
        *self.page.lock().unwrap() = page;
    }

    pub fn fail_events(&self, fail: bool) {
        self.fail_events.store(fail, Ordering::SeqCst);
    }

    pub fn fail_preview(&self, fail: bool) {
        self.fail_preview.store(fail, Ordering::SeqCst);
    }

    /// While set, `trigger_preview` parks until unset, keeping the request
    /// in flight for duplicate-trigger tests.
    pub fn block_preview(&self, block: bool) {
        self.block_preview.store(block, Ordering::SeqCst);
    }

    pub fn events_calls(&self) -> usize {
        self.events_calls.load(Ordering::SeqCst)
    }

    pub fn preview_calls(&self) -> usize {
        self.preview_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WebhookApi for FakeApi {
    async fn topics(&self) -> Result<Vec<Topic>> {
        Ok(self.topics.lock().unwrap().clone())
    }

    async fn events(&self, _topic: &str, _limit: u64, _offset: u64) -> Result<EventsResponse> {
        self.events_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_events.load(Ordering::SeqCst) {
            bail!("events unavailable");
        }
        Ok(self.page.lock().unwrap().clone())
    }

    async fn trigger_preview(&self, _resource: &str) -> Result<()> {
        self.preview_calls.fetch_add(1, Ordering::SeqCst);
        while self.block_preview.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        if self.fail_preview.load(Ordering::SeqCst) {
            bail!("preview rejected");
        }
        Ok(())
    }
}
