use crate::api::models::{EventsResponse, Topic};

/// Results delivered from background fetch tasks to the UI loop.
///
/// Errors cross the channel as strings: the loop only logs and displays
/// them, it never inspects the cause chain.
#[derive(Debug)]
pub enum AppEvent {
    /// The one-shot startup topics fetch finished.
    TopicsLoaded(Result<Vec<Topic>, String>),

    /// An event-page fetch finished (periodic poll or post-action refetch).
    /// Carries the inputs the request was made with so pagination can fall
    /// back to them when the server omits the echo.
    PageLoaded {
        topic: String,
        limit: u64,
        offset: u64,
        result: Result<EventsResponse, String>,
    },

    /// A preview trigger for `resource` ran to completion, on any path.
    /// `error` is None on success.
    PreviewDone {
        resource: String,
        error: Option<String>,
    },
}
