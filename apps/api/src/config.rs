use anyhow::{bail, Context, Result};

const DEFAULT_REMOTE_IO_FEED_URL: &str = "https://s3.remote.io/feed/rss.xml";
const DEFAULT_WORKABLE_SEARCH_URL: &str = "https://jobs.workable.com/search";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub jwt_secret: String,
    pub port: u16,
    pub rust_log: String,
    /// Pages longer than this (in characters) are split before model-assisted extraction.
    pub chunk_size: usize,
    pub fetch_timeout_secs: u64,
    pub remote_io_feed_url: String,
    pub workable_search_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let chunk_size = parse_env("CHUNK_SIZE", 12_000usize)?;
        if chunk_size == 0 {
            bail!("CHUNK_SIZE must be greater than zero");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            jwt_secret: require_env("JWT_SECRET")?,
            port: parse_env("PORT", 8080u16)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            chunk_size,
            fetch_timeout_secs: parse_env("FETCH_TIMEOUT_SECS", 30u64)?,
            remote_io_feed_url: std::env::var("REMOTE_IO_FEED_URL")
                .unwrap_or_else(|_| DEFAULT_REMOTE_IO_FEED_URL.to_string()),
            workable_search_url: std::env::var("WORKABLE_SEARCH_URL")
                .unwrap_or_else(|_| DEFAULT_WORKABLE_SEARCH_URL.to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number")),
        Err(_) => Ok(default),
    }
}
