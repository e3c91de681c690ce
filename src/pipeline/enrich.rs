use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use tracing::{info, warn};

use crate::analysis::TextAnalyzer;
use crate::error::PipelineError;
use crate::models::{ConversationRecord, CreateRecordRequest, NewConversation};
use crate::pipeline::{CallerOverrides, merge_enrichment};
use crate::store::RecordStore;

pub type RiskScorer = Arc<dyn TextAnalyzer<Output = i32>>;
pub type SentimentTagger = Arc<dyn TextAnalyzer<Output = String>>;

/// Create-record path: validate, analyze, merge, persist
///
/// Analysis failures never fail creation; they fall back to the caller's
/// values. Validation and store failures are returned.
#[derive(Clone)]
pub struct EnrichmentPipeline {
    risk: RiskScorer,
    sentiment: SentimentTagger,
    store: Arc<dyn RecordStore>,
}

impl EnrichmentPipeline {
    pub fn new(risk: RiskScorer, sentiment: SentimentTagger, store: Arc<dyn RecordStore>) -> Self {
        Self {
            risk,
            sentiment,
            store,
        }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Resolve every field of a new record without persisting it
    pub async fn enrich(&self, request: CreateRecordRequest) -> Result<NewConversation, PipelineError> {
        let transcript = match request.transcript {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(PipelineError::Validation("text field is required".to_string())),
        };

        let (risk, sentiment) = tokio::join!(
            self.risk.analyze(&transcript),
            self.sentiment.analyze(&transcript)
        );

        let risk = risk
            .inspect_err(|e| warn!("Error analyzing suicide risk: {}", e))
            .ok();
        let sentiment = sentiment
            .inspect_err(|e| warn!("Error analyzing sentiment: {}", e))
            .ok();

        let overrides = CallerOverrides {
            risk_score: request.risk_score,
            annotation: request.annotation,
        };
        let merged = merge_enrichment(risk, sentiment.as_deref(), &overrides);

        Ok(NewConversation {
            starts_with_doctor: request.starts_with_doctor.unwrap_or(false),
            transcript,
            risk_score: merged.risk_score,
            annotation: merged.annotation,
            created_at: Utc::now().trunc_subsecs(6),
        })
    }

    /// Enrich and persist a new record
    pub async fn create(&self, request: CreateRecordRequest) -> Result<ConversationRecord, PipelineError> {
        let new = self.enrich(request).await?;
        let id = self.store.insert(&new).await?;

        info!(
            "Created chat {} (risk score {}, {} chars)",
            id,
            new.risk_score,
            new.transcript.len()
        );
        Ok(new.into_record(id))
    }
}
