//! Axum route handlers for the Search API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::errors::AppError;
use crate::models::listing::JobListing;
use crate::search::cv_query::extract_query_from_cv;
use crate::search::presentation::{dedupe_by_link, paginate, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<JobListing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

/// Search failures keep the search response shape: an empty result list plus a message.
#[derive(Debug)]
pub struct SearchFailure {
    status: StatusCode,
    message: String,
}

impl SearchFailure {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Error fetching jobs. Please try again later.".to_string(),
        }
    }
}

impl IntoResponse for SearchFailure {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "results": [],
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct CvQueryRequest {
    #[serde(alias = "cvText")]
    pub cv_text: String,
}

#[derive(Debug, Serialize)]
pub struct CvQueryResponse {
    pub query: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/search
///
/// Aggregates listings from every configured board, deduplicated by link.
/// Pagination applies only when `page` is supplied.
pub async fn handle_search(
    State(state): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, SearchFailure> {
    let Json(request) = body.map_err(|e| SearchFailure::bad_request(e.body_text()))?;

    let query = request.query.trim();
    if query.is_empty() {
        return Err(SearchFailure::bad_request("query cannot be empty"));
    }

    let page_size = request.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(SearchFailure::bad_request(format!(
            "page_size must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }
    if request.page == Some(0) {
        return Err(SearchFailure::bad_request("page starts at 1"));
    }

    let outcome = state.aggregator.search(query).await.map_err(|e| {
        error!("Search for {:?} failed: {}", query, e);
        SearchFailure::internal()
    })?;

    let listings = dedupe_by_link(outcome.listings);

    let response = match request.page {
        Some(page) => {
            let page = paginate(listings, page, page_size);
            SearchResponse {
                results: page.items,
                message: outcome.message,
                page: Some(page.page),
                total_pages: Some(page.total_pages),
                total: Some(page.total),
            }
        }
        None => SearchResponse {
            results: listings,
            message: outcome.message,
            page: None,
            total_pages: None,
            total: None,
        },
    };

    Ok(Json(response))
}

/// POST /api/v1/cv-query
///
/// Suggests a search query for the supplied CV text.
pub async fn handle_cv_query(
    State(state): State<AppState>,
    body: Result<Json<CvQueryRequest>, JsonRejection>,
) -> Result<Json<CvQueryResponse>, AppError> {
    let Json(request) = body?;
    if request.cv_text.trim().is_empty() {
        return Err(AppError::Validation("cv_text cannot be empty".to_string()));
    }

    let query = extract_query_from_cv(&request.cv_text, state.llm.as_ref()).await?;

    Ok(Json(CvQueryResponse { query }))
}
