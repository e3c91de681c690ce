use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{RetryPolicy, TextAnalyzer};
use crate::error::AnalysisError;

pub const RISK_PATH: &str = "/suicide-risk";
pub const SENTIMENT_PATH: &str = "/sentiment";

/// Default base URL of the ML scoring service
pub const DEFAULT_ML_API_URL: &str = "https://anymo-ml.onrender.com";

#[derive(Debug, Serialize)]
struct TextRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct RiskResponse {
    score: i32,
}

#[derive(Debug, Deserialize)]
struct SentimentResponse {
    sentiment: String,
}

/// Shared HTTP plumbing for the ML scoring service
#[derive(Debug, Clone)]
pub struct MlServiceClient {
    client: Client,
    base_url: String,
}

impl MlServiceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `{"text": ...}` to `path` once and decode a 200 response body
    async fn post_text<T: DeserializeOwned>(&self, path: &str, text: &str) -> Result<T, AnalysisError> {
        let endpoint = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&endpoint)
            .json(&TextRequest { text })
            .send()
            .await
            .map_err(|source| AnalysisError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Status {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AnalysisError::Decode {
                endpoint,
                message: e.to_string(),
            })
    }
}

/// Risk scoring: transcript → integer score, retried under a [`RetryPolicy`]
#[derive(Debug, Clone)]
pub struct RiskAnalyzer {
    service: MlServiceClient,
    retry: RetryPolicy,
}

impl RiskAnalyzer {
    pub fn new(service: MlServiceClient, retry: RetryPolicy) -> Self {
        Self { service, retry }
    }
}

#[async_trait]
impl TextAnalyzer for RiskAnalyzer {
    type Output = i32;

    async fn analyze(&self, text: &str) -> Result<i32, AnalysisError> {
        let response: RiskResponse = self
            .retry
            .run("risk analysis", || self.service.post_text(RISK_PATH, text))
            .await?;
        debug!("risk analysis returned score {}", response.score);
        Ok(response.score)
    }
}

/// Sentiment tagging: transcript → label, retried under a [`RetryPolicy`]
#[derive(Debug, Clone)]
pub struct SentimentAnalyzer {
    service: MlServiceClient,
    retry: RetryPolicy,
}

impl SentimentAnalyzer {
    pub fn new(service: MlServiceClient, retry: RetryPolicy) -> Self {
        Self { service, retry }
    }
}

#[async_trait]
impl TextAnalyzer for SentimentAnalyzer {
    type Output = String;

    async fn analyze(&self, text: &str) -> Result<String, AnalysisError> {
        let response: SentimentResponse = self
            .retry
            .run("sentiment analysis", || {
                self.service.post_text(SENTIMENT_PATH, text)
            })
            .await?;
        debug!("sentiment analysis returned {:?}", response.sentiment);
        Ok(response.sentiment)
    }
}
