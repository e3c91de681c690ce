pub mod ml_service;
pub mod retry;

pub use ml_service::*;
pub use retry::*;

use async_trait::async_trait;

use crate::error::AnalysisError;

/// A remote service that turns transcript text into some derived value
///
/// The risk scorer, the sentiment tagger and the structured reformatter all
/// sit behind this trait so the pipeline can be exercised with fakes.
#[async_trait]
pub trait TextAnalyzer: Send + Sync {
    type Output: Send;

    async fn analyze(&self, text: &str) -> Result<Self::Output, AnalysisError>;
}
