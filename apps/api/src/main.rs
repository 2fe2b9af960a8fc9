mod auth;
mod config;
mod db;
mod errors;
mod history;
mod llm_client;
mod models;
mod routes;
mod search;
mod state;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::JwtService;
use crate::config::Config;
use crate::db::create_pool;
use crate::history::store::PgHistoryStore;
use crate::llm_client::{CompletionService, LlmClient};
use crate::routes::build_router;
use crate::search::aggregator::Aggregator;
use crate::search::extractor::ListingExtractor;
use crate::search::sources::{build_http_client, RemoteIoFetcher, SourceFetcher, WorkableFetcher};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobScout API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client
    let llm: Arc<dyn CompletionService> = Arc::new(LlmClient::new(config.anthropic_api_key.clone())?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Job boards, queried in this order
    let http = build_http_client(Duration::from_secs(config.fetch_timeout_secs))?;
    let sources: Vec<Arc<dyn SourceFetcher>> = vec![
        Arc::new(RemoteIoFetcher::new(http.clone(), config.remote_io_feed_url.clone())),
        Arc::new(WorkableFetcher::new(http, config.workable_search_url.clone())),
    ];
    info!(
        "Configured {} job sources (fetch timeout {}s, chunk size {})",
        sources.len(),
        config.fetch_timeout_secs,
        config.chunk_size
    );

    let extractor = Arc::new(ListingExtractor::new(llm.clone(), config.chunk_size)?);

    // Build app state
    let state = AppState {
        history: Arc::new(PgHistoryStore::new(db.clone())),
        db,
        llm,
        aggregator: Arc::new(Aggregator::new(sources, extractor)),
        jwt: JwtService::new(&config.jwt_secret),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
