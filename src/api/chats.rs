use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};
use tracing::info;

use crate::api::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::{ConversationRecord, CreateRecordRequest, RecordUpdate};

fn chat_id(path: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    path.map(|Path(id)| id)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    body.map(|Json(value)| value)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

/// GET /chats
pub async fn list_chats(State(state): State<AppState>) -> ApiResult<Json<Vec<ConversationRecord>>> {
    Ok(Json(state.store().list().await?))
}

/// GET /chats/{id}
pub async fn get_chat(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<ConversationRecord>> {
    let id = chat_id(path)?;
    state
        .store()
        .get(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// POST /chats
///
/// Runs the enrichment pipeline; analysis outages degrade to the caller's
/// values instead of failing the request.
pub async fn create_chat(
    State(state): State<AppState>,
    body: Result<Json<CreateRecordRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ConversationRecord>)> {
    let request = json_body(body)?;
    let record = state.pipeline.create(request).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /chats/{id}
pub async fn update_chat(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<RecordUpdate>, JsonRejection>,
) -> ApiResult<Json<ConversationRecord>> {
    let id = chat_id(path)?;
    let update = json_body(body)?;

    if update.transcript.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(ApiError::BadRequest("text field cannot be empty".to_string()));
    }

    let record = state
        .store()
        .update(id, &update)
        .await?
        .ok_or(ApiError::NotFound)?;

    info!("Updated chat {}", id);
    Ok(Json(record))
}

/// DELETE /chats/{id}
pub async fn delete_chat(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let id = chat_id(path)?;

    if !state.store().delete(id).await? {
        return Err(ApiError::NotFound);
    }

    info!("Deleted chat {}", id);
    Ok(Json(json!({ "message": "Chat deleted successfully" })))
}
