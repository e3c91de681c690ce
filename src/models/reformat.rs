use serde::{Deserialize, Serialize};

/// Output of the structured-generation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReformattedTranscript {
    /// Transcript with `@@` markers inserted at speaker changes
    pub updated_text: String,
    /// Whether the first utterance is the doctor's
    pub start_with_doctor: bool,
}

/// Body of `POST /processChat`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReformatRequest {
    /// Passed through untouched
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub text: String,
    /// Passed through untouched
    #[serde(default)]
    pub memo: String,
}

/// Response of `POST /processChat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReformatResponse {
    pub created_at: String,
    pub text: String,
    pub memo: String,
    pub start_with_doctor: bool,
}

impl ReformatResponse {
    pub fn new(request: ReformatRequest, reformatted: ReformattedTranscript) -> Self {
        Self {
            created_at: request.created_at,
            text: reformatted.updated_text,
            memo: request.memo,
            start_with_doctor: reformatted.start_with_doctor,
        }
    }
}
