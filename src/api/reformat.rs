use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use crate::api::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::{ReformatRequest, ReformatResponse};

/// POST /processChat (alias /analyze)
///
/// Inserts `@@` markers and infers who spoke first. Nothing is stored, and
/// unlike record creation a collaborator failure fails the request.
pub async fn process_chat(
    State(state): State<AppState>,
    body: Result<Json<ReformatRequest>, JsonRejection>,
) -> ApiResult<Json<ReformatResponse>> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text field is required".to_string()));
    }

    let reformatted = state
        .reformatter
        .analyze(&request.text)
        .await
        .map_err(|e| ApiError::Internal(format!("LLM processing error: {}", e)))?;

    Ok(Json(ReformatResponse::new(request, reformatted)))
}
