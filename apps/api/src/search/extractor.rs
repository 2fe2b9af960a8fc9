//! Listing Extractor: turns raw source content into `JobListing`s.
//!
//! Two strategies:
//! - RSS feeds are parsed structurally and filtered by a case-insensitive substring match
//!   on title or raw description.
//! - HTML pages go to the completion service, one call per chunk when the page is larger
//!   than the configured chunk size. The first well-formed JSON array in each answer is used.
//!
//! Extraction never fails outward: errors are logged and the affected source or chunk
//! contributes no listings.

use std::sync::Arc;

use futures::future::join_all;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm_client::prompts::JSON_ARRAY_SYSTEM;
use crate::llm_client::{CompletionService, LlmError};
use crate::models::listing::JobListing;
use crate::search::chunker::{self, ChunkError};
use crate::search::prompts::LISTING_EXTRACTION_PROMPT;
use crate::search::sources::ContentFormat;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("completion service failed: {0}")]
    Completion(#[from] LlmError),

    #[error("no parseable JSON array in model response")]
    NoJsonArray,

    #[error("malformed feed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Chunk(#[from] ChunkError),
}

pub struct ListingExtractor {
    llm: Arc<dyn CompletionService>,
    chunk_size: usize,
}

impl ListingExtractor {
    pub fn new(llm: Arc<dyn CompletionService>, chunk_size: usize) -> Result<Self, ChunkError> {
        if chunk_size == 0 {
            return Err(ChunkError::InvalidSize(chunk_size));
        }
        Ok(Self { llm, chunk_size })
    }

    /// Extracts the listings matching `query` from `content`, tagged with `source_id`.
    pub async fn extract(
        &self,
        source_id: &str,
        format: ContentFormat,
        content: &str,
        query: &str,
    ) -> Vec<JobListing> {
        let result = match format {
            ContentFormat::Rss => parse_rss(content, query, source_id),
            ContentFormat::Html => self.extract_with_model(source_id, content, query).await,
        };

        match result {
            Ok(listings) => {
                info!("Extracted {} listings from {}", listings.len(), source_id);
                listings
            }
            Err(e) => {
                warn!("Extraction failed for {}: {}", source_id, e);
                Vec::new()
            }
        }
    }

    async fn extract_with_model(
        &self,
        source_id: &str,
        content: &str,
        query: &str,
    ) -> Result<Vec<JobListing>, ExtractionError> {
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let chunks = if content.chars().count() > self.chunk_size {
            chunker::split(content, self.chunk_size)?
        } else {
            vec![content]
        };

        if chunks.len() > 1 {
            info!(
                "Content from {} split into {} chunks of up to {} chars",
                source_id,
                chunks.len(),
                self.chunk_size
            );
        }

        // Every chunk runs to completion; a failed chunk only loses its own listings.
        let results = join_all(
            chunks
                .iter()
                .map(|chunk| self.extract_chunk(source_id, chunk, query)),
        )
        .await;

        let mut listings = Vec::new();
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(mut found) => listings.append(&mut found),
                Err(e) => warn!("Chunk {} of {} failed: {}", index, source_id, e),
            }
        }
        Ok(listings)
    }

    async fn extract_chunk(
        &self,
        source_id: &str,
        html: &str,
        query: &str,
    ) -> Result<Vec<JobListing>, ExtractionError> {
        let prompt = listing_prompt(query, html);
        let answer = self.llm.complete(&prompt, JSON_ARRAY_SYSTEM).await?;
        parse_model_answer(&answer, source_id)
    }
}

/// Fills the extraction template in one pass. Placeholder-like text inside the query or
/// the page is left as is.
fn listing_prompt(query: &str, html: &str) -> String {
    match LISTING_EXTRACTION_PROMPT.split_once("{html}") {
        Some((head, tail)) => format!(
            "{}{}{}",
            head.replace("{query}", query),
            html,
            tail.replace("{query}", query)
        ),
        None => LISTING_EXTRACTION_PROMPT.replace("{query}", query),
    }
}

/// Fields the model is asked for. Every field is optional in practice.
#[derive(Debug, Deserialize)]
struct ExtractedJob {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    #[serde(rename = "pubDate", alias = "pub_date", alias = "publicationDate")]
    publication_date: Option<String>,
    company: Option<String>,
    location: Option<String>,
    salary: Option<String>,
}

impl ExtractedJob {
    fn into_listing(self, source_id: &str) -> Option<JobListing> {
        let link = self.link.map(|l| l.trim().to_string()).unwrap_or_default();
        if link.is_empty() {
            return None;
        }
        Some(JobListing {
            title: self.title.unwrap_or_default(),
            link,
            description: self.description.unwrap_or_default(),
            publication_date: self.publication_date.unwrap_or_default(),
            source: source_id.to_string(),
            company: non_empty(self.company),
            location: non_empty(self.location),
            salary: non_empty(self.salary),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parses the first well-formed JSON array found in `answer` into listings.
/// Elements that are not job objects, or that lack a link, are skipped.
fn parse_model_answer(answer: &str, source_id: &str) -> Result<Vec<JobListing>, ExtractionError> {
    let items = first_json_array(answer).ok_or(ExtractionError::NoJsonArray)?;

    let listings = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<ExtractedJob>(item) {
            Ok(job) => job.into_listing(source_id),
            Err(e) => {
                debug!("Skipping malformed job object from {}: {}", source_id, e);
                None
            }
        })
        .collect();

    Ok(listings)
}

fn first_json_array(text: &str) -> Option<Vec<serde_json::Value>> {
    text.match_indices('[').find_map(|(start, _)| {
        serde_json::Deserializer::from_str(&text[start..])
            .into_iter::<Vec<serde_json::Value>>()
            .next()
            .and_then(Result::ok)
    })
}

#[derive(Debug, Clone, Copy)]
enum RssField {
    Title,
    Link,
    Description,
    PubDate,
}

impl RssField {
    fn from_tag(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Self::Title),
            b"link" => Some(Self::Link),
            b"description" => Some(Self::Description),
            b"pubDate" => Some(Self::PubDate),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct RssItem {
    title: String,
    link: String,
    description: String,
    pub_date: String,
}

impl RssItem {
    fn push(&mut self, field: RssField, text: &str) {
        let target = match field {
            RssField::Title => &mut self.title,
            RssField::Link => &mut self.link,
            RssField::Description => &mut self.description,
            RssField::PubDate => &mut self.pub_date,
        };
        target.push_str(text);
    }

    fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }

    fn into_listing(self, source_id: &str) -> JobListing {
        JobListing {
            title: self.title.trim().to_string(),
            link: self.link.trim().to_string(),
            description: self.description.trim().to_string(),
            publication_date: self.pub_date.trim().to_string(),
            source: source_id.to_string(),
            company: None,
            location: None,
            salary: None,
        }
    }
}

/// Parses an RSS document and keeps the `<item>`s whose title or description
/// contains `query`, case-insensitively. Feed order is preserved.
pub fn parse_rss(
    xml: &str,
    query: &str,
    source_id: &str,
) -> Result<Vec<JobListing>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let needle = query.trim().to_lowercase();
    let mut listings = Vec::new();
    let mut current: Option<RssItem> = None;
    let mut field: Option<RssField> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"item" => current = Some(RssItem::default()),
                name if current.is_some() => field = RssField::from_tag(name),
                _ => {}
            },
            Event::Text(t) => {
                if let (Some(item), Some(f)) = (current.as_mut(), field) {
                    item.push(f, &t.unescape()?);
                }
            }
            Event::CData(c) => {
                if let (Some(item), Some(f)) = (current.as_mut(), field) {
                    item.push(f, &String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(e) => {
                field = None;
                if e.name().as_ref() == b"item" {
                    if let Some(item) = current.take() {
                        if !item.link.trim().is_empty() && item.matches(&needle) {
                            listings.push(item.into_listing(source_id));
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(listings)
}
