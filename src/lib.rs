pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod io;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod store;

pub use analysis::{MlServiceClient, RetryPolicy, RiskAnalyzer, SentimentAnalyzer, TextAnalyzer};
pub use api::{AppState, build_router};
pub use config::ServiceConfig;
pub use error::{AnalysisError, ApiError, PipelineError, StoreError};
pub use io::{read_conversation_file, render_dialogue, write_reformatted};
pub use llm::{GeminiConfig, GeminiReformatter};
pub use models::{
    ConversationRecord, CreateRecordRequest, NewConversation, RecordUpdate, ReformattedTranscript,
};
pub use pipeline::{CallerOverrides, EnrichmentPipeline, MergedFields, merge_enrichment};
pub use store::{RecordStore, SqliteRecordStore};
