//! Source fetchers: one per external job board. Each returns the raw, unparsed body.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::USER_AGENT, Client};
use thiserror::Error;
use tracing::info;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {source_id} failed: {error}")]
    Http {
        source_id: String,
        #[source]
        error: reqwest::Error,
    },

    #[error("{source_id} returned HTTP {status}")]
    Status { source_id: String, status: u16 },
}

/// How the raw body of a source is turned into listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    /// RSS/XML feed, parsed structurally.
    Rss,
    /// HTML search page, handed to the completion service.
    Html,
}

#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Fixed identifier of the board, used as `JobListing::source`.
    fn source_id(&self) -> &str;

    fn format(&self) -> ContentFormat;

    async fn fetch(&self, query: &str) -> Result<String, FetchError>;
}

/// Builds the HTTP client shared by all fetchers. Every outbound call is bounded by `timeout`.
pub fn build_http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder().timeout(timeout).build()
}

/// remote.io publishes a single RSS feed; the query is applied during extraction.
pub struct RemoteIoFetcher {
    client: Client,
    feed_url: String,
}

impl RemoteIoFetcher {
    pub const SOURCE_ID: &'static str = "remote.io";

    pub fn new(client: Client, feed_url: String) -> Self {
        Self { client, feed_url }
    }
}

#[async_trait]
impl SourceFetcher for RemoteIoFetcher {
    fn source_id(&self) -> &str {
        Self::SOURCE_ID
    }

    fn format(&self) -> ContentFormat {
        ContentFormat::Rss
    }

    async fn fetch(&self, _query: &str) -> Result<String, FetchError> {
        info!("Fetching {} feed: {}", Self::SOURCE_ID, self.feed_url);
        let request = self.client.get(&self.feed_url);
        read_body(Self::SOURCE_ID, request).await
    }
}

/// Workable's public search page, filtered to remote roles posted in the last week.
pub struct WorkableFetcher {
    client: Client,
    search_url: String,
}

impl WorkableFetcher {
    pub const SOURCE_ID: &'static str = "workable";

    pub fn new(client: Client, search_url: String) -> Self {
        Self { client, search_url }
    }
}

#[async_trait]
impl SourceFetcher for WorkableFetcher {
    fn source_id(&self) -> &str {
        Self::SOURCE_ID
    }

    fn format(&self) -> ContentFormat {
        ContentFormat::Html
    }

    async fn fetch(&self, query: &str) -> Result<String, FetchError> {
        info!("Fetching {} search page for {:?}", Self::SOURCE_ID, query);
        let request = self
            .client
            .get(&self.search_url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .query(&[("query", query), ("workplace", "remote"), ("day_range", "7")]);
        read_body(Self::SOURCE_ID, request).await
    }
}

async fn read_body(source_id: &str, request: reqwest::RequestBuilder) -> Result<String, FetchError> {
    let http_error = |error| FetchError::Http {
        source_id: source_id.to_string(),
        error,
    };

    let response = request.send().await.map_err(http_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            source_id: source_id.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(http_error)
}
