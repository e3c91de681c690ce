use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::TextAnalyzer;
use crate::error::AnalysisError;
use crate::llm::{build_reformat_prompt, reformat_response_schema};
use crate::models::ReformattedTranscript;

pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-lite-001";

/// Configuration for the Gemini structured-generation client
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key (from GEMINI_API_KEY env var)
    pub api_key: String,
    /// Model to use (e.g., "gemini-2.0-flash-lite-001")
    pub model: String,
    /// Base URL of the Generative Language API
    pub base_url: String,
    /// Upper bound on the whole request, connect to decoded body
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_API_URL.to_string(),
            timeout: Duration::from_secs(15),
        }
    }

    /// Create config from environment variables; GEMINI_API_KEY is required
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        if config.api_key.is_empty() {
            anyhow::bail!("GEMINI_API_KEY environment variable not set");
        }
        Ok(config)
    }

    /// Read GEMINI_API_KEY, GEMINI_MODEL, GEMINI_API_URL and
    /// REFORMAT_TIMEOUT_SECS, defaulting whatever is unset
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::new(var("GEMINI_API_KEY").unwrap_or_default());

        let timeout = match var("REFORMAT_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(
                v.parse()
                    .with_context(|| format!("Invalid REFORMAT_TIMEOUT_SECS: {}", v))?,
            ),
            None => defaults.timeout,
        };

        Ok(Self {
            model: var("GEMINI_MODEL").unwrap_or(defaults.model.clone()),
            base_url: var("GEMINI_API_URL").unwrap_or(defaults.base_url.clone()),
            timeout,
            ..defaults
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// Single-attempt, timeout-bounded transcript reformatter
pub struct GeminiReformatter {
    client: Client,
    config: GeminiConfig,
}

impl GeminiReformatter {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn generate(&self, endpoint: &str, conversation: &str) -> Result<ReformattedTranscript, AnalysisError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(build_reformat_prompt(conversation)),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: reformat_response_schema(),
            },
        };

        let response = self
            .client
            .post(endpoint)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|source| AnalysisError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Status {
                endpoint: endpoint.to_string(),
                status,
                body,
            });
        }

        let response: GenerateContentResponse =
            response.json().await.map_err(|e| AnalysisError::Decode {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })?;

        let candidate = response
            .candidates
            .first()
            .ok_or_else(|| AnalysisError::NoCandidates {
                endpoint: endpoint.to_string(),
            })?;

        // Extract text from the first part that carries any
        let json_text = candidate
            .content
            .as_ref()
            .and_then(|c| c.parts.iter().find_map(|p| p.text.as_deref()))
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AnalysisError::MissingContent {
                endpoint: endpoint.to_string(),
            })?;

        serde_json::from_str(json_text).map_err(|e| AnalysisError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl TextAnalyzer for GeminiReformatter {
    type Output = ReformattedTranscript;

    async fn analyze(&self, text: &str) -> Result<ReformattedTranscript, AnalysisError> {
        let endpoint = self.config.endpoint();
        debug!("reformatting {} chars via {}", text.len(), self.config.model);

        match tokio::time::timeout(self.config.timeout, self.generate(&endpoint, text)).await {
            Ok(result) => result,
            Err(_) => Err(AnalysisError::Timeout {
                endpoint,
                timeout: self.config.timeout,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}
