//! HTTP surface of the record service

pub mod chats;
pub mod health;
pub mod reformat;

use std::sync::Arc;

use axum::Router;
use axum::http::{Method, header};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::analysis::TextAnalyzer;
use crate::models::ReformattedTranscript;
use crate::pipeline::EnrichmentPipeline;
use crate::store::RecordStore;

pub type Reformatter = Arc<dyn TextAnalyzer<Output = ReformattedTranscript>>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: EnrichmentPipeline,
    pub reformatter: Reformatter,
}

impl AppState {
    pub fn new(pipeline: EnrichmentPipeline, reformatter: Reformatter) -> Self {
        Self {
            pipeline,
            reformatter,
        }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        self.pipeline.store()
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/chats", get(chats::list_chats).post(chats::create_chat))
        .route(
            "/chats/:id",
            get(chats::get_chat)
                .put(chats::update_chat)
                .delete(chats::delete_chat),
        )
        .route("/processChat", post(reformat::process_chat))
        .route("/analyze", post(reformat::process_chat))
        .route("/health", get(health::health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
