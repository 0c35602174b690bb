use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;

use super::models::{EventsResponse, Topic};

/// The three operations the webhook backend exposes to clients.
///
/// The dashboard's poller and preview tracker run against this trait so
/// tests can drive them with a fake instead of a live server.
#[async_trait]
pub trait WebhookApi: Send + Sync + 'static {
    /// `GET /api/webhooks/topics`
    async fn topics(&self) -> Result<Vec<Topic>>;

    /// `GET /api/webhooks?topic=&limit=&offset=`
    async fn events(&self, topic: &str, limit: u64, offset: u64) -> Result<EventsResponse>;

    /// `POST /api/ml/preview?resource=` — response body unused.
    async fn trigger_preview(&self, resource: &str) -> Result<()>;
}

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    /// URL of the server-rendered detail page for `resource`, suitable for
    /// handing to the system browser.
    pub fn render_url(&self, resource: &str) -> Result<String> {
        let mut url = Url::parse(&format!("{}/api/ml/render", self.base_url))
            .context("Invalid API base URL")?;
        url.query_pairs_mut().append_pair("resource", resource);
        Ok(url.into())
    }
}

#[async_trait]
impl WebhookApi for ApiClient {
    async fn topics(&self) -> Result<Vec<Topic>> {
        let url = format!("{}/api/webhooks/topics", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send topics request")?;

        let topics = response
            .json::<Vec<Topic>>()
            .await
            .context("Failed to parse topics response")?;

        Ok(topics)
    }

    async fn events(&self, topic: &str, limit: u64, offset: u64) -> Result<EventsResponse> {
        let url = format!("{}/api/webhooks", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("topic", topic.to_string()),
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
            ])
            .send()
            .await
            .context("Failed to send events request")?;

        let page = response
            .json::<EventsResponse>()
            .await
            .context("Failed to parse events response")?;

        Ok(page)
    }

    async fn trigger_preview(&self, resource: &str) -> Result<()> {
        let url = format!("{}/api/ml/preview", self.base_url);
        let response = self
            .client
            .post(&url)
            .query(&[("resource", resource)])
            .send()
            .await
            .context("Failed to send preview request")?;

        response
            .error_for_status()
            .context("Preview request rejected")?;

        Ok(())
    }
}
