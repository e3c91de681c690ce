use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::analysis::{DEFAULT_ML_API_URL, RetryPolicy};
use crate::llm::GeminiConfig;

pub const DEFAULT_PORT: u16 = 8080;

/// Service configuration, read from the environment
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Port to listen on (PORT)
    pub port: u16,
    /// SQLite URL of the record store (DATABASE_URL)
    pub database_url: String,
    /// Base URL of the risk/sentiment service (ML_API_URL)
    pub ml_api_url: String,
    /// Retry policy for the risk/sentiment calls
    pub retry: RetryPolicy,
    /// Structured-generation settings
    pub gemini: GeminiConfig,
}

impl ServiceConfig {
    /// Build the configuration from a variable lookup (normally the
    /// process environment after [`load_dotenv`])
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url =
            var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let port = match var("PORT") {
            Some(p) => p.parse().with_context(|| format!("Invalid PORT: {}", p))?,
            None => DEFAULT_PORT,
        };

        let max_attempts = match var("ANALYSIS_MAX_ATTEMPTS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("Invalid ANALYSIS_MAX_ATTEMPTS: {}", v))?,
            None => RetryPolicy::default().max_attempts,
        };
        let delay = match var("ANALYSIS_RETRY_DELAY_MS") {
            Some(v) => Duration::from_millis(
                v.parse()
                    .with_context(|| format!("Invalid ANALYSIS_RETRY_DELAY_MS: {}", v))?,
            ),
            None => RetryPolicy::default().delay,
        };

        let gemini = GeminiConfig::from_lookup(&lookup)?;

        Ok(Self {
            port,
            database_url,
            ml_api_url: var("ML_API_URL").unwrap_or_else(|| DEFAULT_ML_API_URL.to_string()),
            retry: RetryPolicy::new(max_attempts, delay),
            gemini,
        })
    }
}

/// Load a local `.env` file unless ENVIRONMENT=production
pub fn load_dotenv() {
    if std::env::var("ENVIRONMENT").as_deref() == Ok("production") {
        return;
    }
    if dotenvy::dotenv().is_err() {
        info!("No .env file found, using environment variables");
    }
}
