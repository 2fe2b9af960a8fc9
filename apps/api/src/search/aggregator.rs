//! Aggregator: fans a query out to every configured source and merges what comes back.
//!
//! Flow per source: fetch → extract (chunking first when oversized). Each source runs as
//! its own task; all tasks are awaited regardless of how the others end. Fetch errors,
//! extraction errors and panics only cost that source its listings.
//!
//! Listings are concatenated in source declaration order. Deduplication by link is left
//! to the presentation layer.

use std::sync::Arc;

use futures::future::join_all;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::models::listing::JobListing;
use crate::search::extractor::ListingExtractor;
use crate::search::sources::SourceFetcher;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search task for {source_id} was cancelled")]
    Cancelled { source_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub listings: Vec<JobListing>,
    /// Set only when no source produced anything.
    pub message: Option<String>,
}

pub struct Aggregator {
    sources: Vec<Arc<dyn SourceFetcher>>,
    extractor: Arc<ListingExtractor>,
}

impl Aggregator {
    pub fn new(sources: Vec<Arc<dyn SourceFetcher>>, extractor: Arc<ListingExtractor>) -> Self {
        Self { sources, extractor }
    }

    /// Ids of the configured sources, in query order.
    pub fn source_ids(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.source_id()).collect()
    }

    pub async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        let handles = self.sources.iter().map(|source| {
            let source = Arc::clone(source);
            let extractor = Arc::clone(&self.extractor);
            let query = query.to_string();
            tokio::spawn(async move { search_source(source.as_ref(), &extractor, &query).await })
        });

        let settled = join_all(handles).await;

        let mut listings = Vec::new();
        for (source, result) in self.sources.iter().zip(settled) {
            match result {
                Ok(found) => listings.extend(found),
                Err(e) if e.is_panic() => {
                    error!("Search task for {} panicked: {}", source.source_id(), e);
                }
                Err(_) => {
                    return Err(SearchError::Cancelled {
                        source_id: source.source_id().to_string(),
                    })
                }
            }
        }

        info!(
            "Search for {:?} produced {} listings from {} sources",
            query,
            listings.len(),
            self.sources.len()
        );

        let message = listings
            .is_empty()
            .then(|| format!("No jobs found for \"{query}\"."));

        Ok(SearchOutcome { listings, message })
    }
}

async fn search_source(
    source: &dyn SourceFetcher,
    extractor: &ListingExtractor,
    query: &str,
) -> Vec<JobListing> {
    match source.fetch(query).await {
        Ok(content) => {
            extractor
                .extract(source.source_id(), source.format(), &content, query)
                .await
        }
        Err(e) => {
            warn!("Fetch failed for {}: {}", source.source_id(), e);
            Vec::new()
        }
    }
}
