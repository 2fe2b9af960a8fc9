// Search pipeline: source fetchers → listing extraction (chunked when oversized)
// → aggregation → presentation (dedupe, pagination).
// All completion-service calls go through llm_client.

pub mod aggregator;
pub mod chunker;
pub mod cv_query;
pub mod extractor;
pub mod handlers;
pub mod presentation;
pub mod prompts;
pub mod sources;
