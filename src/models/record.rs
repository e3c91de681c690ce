use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored consultation transcript with its enrichment fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRecord {
    /// Store-assigned identity
    pub id: i64,
    /// Whether the doctor speaks first (drives alternating attribution)
    #[serde(rename = "startWithDoctor")]
    pub starts_with_doctor: bool,
    /// Utterances joined by the `@@` delimiter
    #[serde(rename = "text")]
    pub transcript: String,
    /// Risk score, 1-100 when scored, 0 when not
    pub risk_score: i32,
    /// User note and/or sentiment label
    #[serde(rename = "memo")]
    pub annotation: String,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
}

/// A fully resolved record ready to be inserted; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConversation {
    pub starts_with_doctor: bool,
    pub transcript: String,
    pub risk_score: i32,
    pub annotation: String,
    pub created_at: DateTime<Utc>,
}

impl NewConversation {
    pub fn into_record(self, id: i64) -> ConversationRecord {
        ConversationRecord {
            id,
            starts_with_doctor: self.starts_with_doctor,
            transcript: self.transcript,
            risk_score: self.risk_score,
            annotation: self.annotation,
            created_at: self.created_at,
        }
    }
}

/// Body of `POST /chats`
///
/// Everything except the transcript is optional. `risk_score` and
/// `annotation` only survive when the matching analysis call fails (or, for
/// the annotation, get appended after the sentiment label).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordRequest {
    #[serde(default, rename = "startWithDoctor")]
    pub starts_with_doctor: Option<bool>,
    #[serde(default, rename = "text")]
    pub transcript: Option<String>,
    #[serde(default)]
    pub risk_score: Option<i32>,
    #[serde(default, rename = "memo")]
    pub annotation: Option<String>,
}

impl CreateRecordRequest {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: Some(transcript.into()),
            ..Default::default()
        }
    }

    pub fn with_risk_score(mut self, score: i32) -> Self {
        self.risk_score = Some(score);
        self
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    pub fn with_starts_with_doctor(mut self, starts_with_doctor: bool) -> Self {
        self.starts_with_doctor = Some(starts_with_doctor);
        self
    }
}

/// Body of `PUT /chats/{id}`: only present fields overwrite stored values
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUpdate {
    #[serde(default, rename = "startWithDoctor")]
    pub starts_with_doctor: Option<bool>,
    #[serde(default, rename = "text")]
    pub transcript: Option<String>,
    #[serde(default)]
    pub risk_score: Option<i32>,
    #[serde(default, rename = "memo")]
    pub annotation: Option<String>,
}
