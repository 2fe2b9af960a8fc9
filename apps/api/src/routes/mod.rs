pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::history::handlers as history;
use crate::search::handlers as search;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Search API
        .route("/api/v1/search", post(search::handle_search))
        .route("/api/v1/cv-query", post(search::handle_cv_query))
        // History API (bearer token required)
        .route(
            "/api/v1/history",
            get(history::handle_list_history).post(history::handle_record_history),
        )
        // Auth API
        .route("/api/v1/auth/signup", post(auth::handle_signup))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .with_state(state)
}
