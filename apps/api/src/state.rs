use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::JwtService;
use crate::history::store::HistoryStore;
use crate::llm_client::CompletionService;
use crate::search::aggregator::Aggregator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is built once in `main` and lives for the whole process.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: Arc<dyn CompletionService>,
    pub aggregator: Arc<Aggregator>,
    /// Pluggable history backend. PostgreSQL in production.
    pub history: Arc<dyn HistoryStore>,
    pub jwt: JwtService,
}

impl FromRef<AppState> for JwtService {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}
