//! Pure view-state for the dashboard. No I/O: the app loop feeds fetched
//! pages and completion events in, key handlers call the mutation ops, and
//! rendering reads the result.

use std::collections::HashSet;

use crate::api::models::{Event, Pagination, Topic};
use crate::filter;

/// Page sizes the limit key cycles through, matching the backend's
/// supported page sizes.
pub const LIMIT_STEPS: [u64; 4] = [100, 500, 1000, 5000];

pub const DEFAULT_LIMIT: u64 = 500;

/// Outcome of applying a fetched page, telling the app loop whether the
/// poll inputs changed underneath the running poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageApplied {
    /// Page applied as-is.
    Unchanged,
    /// The server's total shrank below the current offset; offset was
    /// snapped back in range and the poll must restart.
    OffsetSnapped,
}

pub struct DashboardState {
    pub topics: Vec<Topic>,
    pub selected_topic: Option<String>,
    pub limit: u64,
    pub offset: u64,
    pub filter_text: String,
    pub events: Vec<Event>,
    pub pagination: Pagination,
    /// Indices into `events` matching the current filter, in page order.
    pub filtered: Vec<usize>,
    /// Selected row as an index into `filtered`.
    pub selected_row: Option<usize>,
    /// Resources with a preview request currently in flight.
    loading: HashSet<String>,
}

impl DashboardState {
    pub fn new(remembered_topic: Option<String>) -> Self {
        Self {
            topics: Vec::new(),
            selected_topic: remembered_topic,
            limit: DEFAULT_LIMIT,
            offset: 0,
            filter_text: String::new(),
            events: Vec::new(),
            pagination: Pagination::default(),
            filtered: Vec::new(),
            selected_row: None,
            loading: HashSet::new(),
        }
    }

    /// Install the fetched topic list, resolving the remembered selection:
    /// a selection absent from the list falls back to the first entry.
    pub fn set_topics(&mut self, topics: Vec<Topic>) {
        self.topics = topics;

        let known = self
            .selected_topic
            .as_ref()
            .map(|sel| self.topics.iter().any(|t| &t.topic == sel))
            .unwrap_or(false);

        if !known {
            self.selected_topic = self.topics.first().map(|t| t.topic.clone());
            self.offset = 0;
        }
    }

    pub fn selected_topic_index(&self) -> Option<usize> {
        let selected = self.selected_topic.as_ref()?;
        self.topics.iter().position(|t| &t.topic == selected)
    }

    /// Move the topic selection by `step` (wrapping), resetting the offset.
    /// Returns true when the selection actually changed.
    pub fn cycle_topic(&mut self, step: isize) -> bool {
        if self.topics.is_empty() {
            return false;
        }
        let current = self.selected_topic_index().unwrap_or(0) as isize;
        let len = self.topics.len() as isize;
        let next = (current + step).rem_euclid(len) as usize;

        let topic = self.topics[next].topic.clone();
        if self.selected_topic.as_deref() == Some(topic.as_str()) {
            return false;
        }
        self.selected_topic = Some(topic);
        self.offset = 0;
        self.selected_row = None;
        true
    }

    /// Advance to the next page size, resetting the offset.
    pub fn cycle_limit(&mut self) {
        let pos = LIMIT_STEPS.iter().position(|&l| l == self.limit);
        let next = match pos {
            Some(i) => LIMIT_STEPS[(i + 1) % LIMIT_STEPS.len()],
            None => LIMIT_STEPS[0],
        };
        self.set_limit(next);
    }

    pub fn set_limit(&mut self, limit: u64) {
        self.limit = limit;
        self.offset = 0;
    }

    pub fn can_prev(&self) -> bool {
        self.offset > 0
    }

    pub fn can_next(&self) -> bool {
        self.offset + self.limit < self.pagination.total
    }

    /// Returns true when the offset moved.
    pub fn prev_page(&mut self) -> bool {
        if !self.can_prev() {
            return false;
        }
        self.offset = self.offset.saturating_sub(self.limit);
        true
    }

    /// Returns true when the offset moved.
    pub fn next_page(&mut self) -> bool {
        if !self.can_next() {
            return false;
        }
        self.offset += self.limit;
        true
    }

    pub fn set_filter(&mut self, text: String) {
        self.filter_text = text;
        self.recompute_filtered();
    }

    /// Apply a fetched page. Responses are applied in arrival order with no
    /// out-of-order protection: the last one to land wins. The one
    /// write-back is offset reconciliation when the total shrank below the
    /// current offset.
    pub fn apply_page(&mut self, events: Vec<Event>, pagination: Pagination) -> PageApplied {
        self.events = events;
        self.pagination = pagination;
        self.recompute_filtered();

        if self.pagination.total > 0 && self.offset >= self.pagination.total {
            // Largest in-range multiple of limit.
            self.offset = ((self.pagination.total - 1) / self.limit) * self.limit;
            return PageApplied::OffsetSnapped;
        }
        PageApplied::Unchanged
    }

    fn recompute_filtered(&mut self) {
        self.filtered = filter::apply_filter(&self.events, &self.filter_text);
        // Clamp the selection to the new view.
        self.selected_row = match self.selected_row {
            _ if self.filtered.is_empty() => None,
            Some(row) => Some(row.min(self.filtered.len() - 1)),
            None => None,
        };
    }

    pub fn select_next(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        self.selected_row = Some(match self.selected_row {
            Some(row) => (row + 1).min(self.filtered.len() - 1),
            None => 0,
        });
    }

    pub fn select_prev(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        self.selected_row = Some(match self.selected_row {
            Some(row) => row.saturating_sub(1),
            None => 0,
        });
    }

    pub fn selected_event(&self) -> Option<&Event> {
        let row = self.selected_row?;
        let idx = *self.filtered.get(row)?;
        self.events.get(idx)
    }

    /// Mark `resource` as having a preview request in flight. Returns false
    /// when one is already pending, in which case no new request may start.
    pub fn begin_preview(&mut self, resource: &str) -> bool {
        self.loading.insert(resource.to_string())
    }

    pub fn finish_preview(&mut self, resource: &str) {
        self.loading.remove(resource);
    }

    pub fn is_preview_loading(&self, resource: &str) -> bool {
        self.loading.contains(resource)
    }

    /// 1-based absolute position of the first and last visible row, for the
    /// "Showing X - Y of Z" summary.
    pub fn page_summary(&self) -> (u64, u64, u64) {
        let total = self.pagination.total;
        if total == 0 {
            return (0, 0, 0);
        }
        let first = self.pagination.offset + 1;
        let last = (self.pagination.offset + self.limit).min(total);
        (first, last, total)
    }
}
