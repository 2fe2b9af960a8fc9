//! Axum route handlers for the History API. Both routes require a bearer token.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::listing::JobListing;
use crate::models::search::SearchRecord;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecordHistoryRequest {
    pub query: String,
    #[serde(default)]
    pub results: Vec<JobListing>,
}

#[derive(Debug, Serialize)]
pub struct RecordHistoryResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<SearchRecord>,
}

/// POST /api/v1/history
pub async fn handle_record_history(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<RecordHistoryRequest>, JsonRejection>,
) -> Result<Json<RecordHistoryResponse>, AppError> {
    let Json(request) = body?;
    let query = request.query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }
    if request.results.iter().any(|l| l.link.trim().is_empty()) {
        return Err(AppError::Validation(
            "every result must have a link".to_string(),
        ));
    }

    state
        .history
        .record(user.user_id, query, &request.results)
        .await?;

    Ok(Json(RecordHistoryResponse { success: true }))
}

/// GET /api/v1/history
///
/// Newest first, each record expanded with its listings.
pub async fn handle_list_history(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<HistoryResponse>, AppError> {
    debug!("Listing search history for {}", user.email);
    let history = state.history.list(user.user_id).await?;
    Ok(Json(HistoryResponse { history }))
}
