//! Test doubles shared by unit tests across modules.

use std::sync::Arc;

use async_trait::async_trait;

use crate::llm_client::{CompletionService, LlmError};
use crate::search::sources::{ContentFormat, FetchError, SourceFetcher};

/// Completion service that always returns the same answer.
pub struct CannedCompletion(pub String);

impl CannedCompletion {
    pub fn answering(answer: &str) -> Arc<Self> {
        Arc::new(Self(answer.to_string()))
    }

    pub fn empty() -> Arc<Self> {
        Self::answering("[]")
    }
}

#[async_trait]
impl CompletionService for CannedCompletion {
    async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
        Ok(self.0.clone())
    }
}

/// Returns a fixed body regardless of the query.
pub struct StaticFetcher {
    source_id: &'static str,
    format: ContentFormat,
    body: String,
}

impl StaticFetcher {
    pub fn rss(source_id: &'static str, body: String) -> Arc<dyn SourceFetcher> {
        Arc::new(Self {
            source_id,
            format: ContentFormat::Rss,
            body,
        })
    }
}

#[async_trait]
impl SourceFetcher for StaticFetcher {
    fn source_id(&self) -> &str {
        self.source_id
    }

    fn format(&self) -> ContentFormat {
        self.format
    }

    async fn fetch(&self, _query: &str) -> Result<String, FetchError> {
        Ok(self.body.clone())
    }
}

pub struct FailingFetcher(pub &'static str);

#[async_trait]
impl SourceFetcher for FailingFetcher {
    fn source_id(&self) -> &str {
        self.0
    }

    fn format(&self) -> ContentFormat {
        ContentFormat::Rss
    }

    async fn fetch(&self, _query: &str) -> Result<String, FetchError> {
        Err(FetchError::Status {
            source_id: self.0.to_string(),
            status: 503,
        })
    }
}

pub struct PanickingFetcher(pub &'static str);

#[async_trait]
impl SourceFetcher for PanickingFetcher {
    fn source_id(&self) -> &str {
        self.0
    }

    fn format(&self) -> ContentFormat {
        ContentFormat::Rss
    }

    async fn fetch(&self, _query: &str) -> Result<String, FetchError> {
        panic!("{} exploded", self.0)
    }
}

/// Builds a minimal RSS document from `(title, link)` pairs.
pub fn rss_feed(items: &[(&str, &str)]) -> String {
    let items: String = items
        .iter()
        .map(|(title, link)| {
            format!(
                "<item><title>{title}</title><link>{link}</link>\
                 <description>Remote role</description>\
                 <pubDate>Mon, 01 Jan 2024 00:00:00 GMT</pubDate></item>"
            )
        })
        .collect();
    format!("<?xml version=\"1.0\"?><rss version=\"2.0\"><channel><title>Feed</title>{items}</channel></rss>")
}
