pub mod client;
pub mod models;

pub use client::{ApiClient, WebhookApi};
pub use models::{Event, EventsResponse, Pagination, Preview, Topic};
