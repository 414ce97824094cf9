//! Analyze Handler - reply (and optional speech) for a user's message

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use std::sync::Arc;
use tracing::Instrument;

use crate::AppState;
use crate::models::{AnalyzeRequest, AnalyzeResponse};
use crate::utils::{ApiError, ApiResult};

/// POST /analyze
#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Assistant reply, with base64 MP3 audio when speech applies", body = AnalyzeResponse),
        (status = 422, description = "Request body missing fields or malformed"),
        (status = 502, description = "Chat or speech provider failed"),
        (status = 503, description = "Chat provider not configured"),
        (status = 504, description = "Chat provider timed out"),
    ),
    tag = "Assistant"
)]
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<AnalyzeResponse>> {
    // Rejected bodies never reach a provider
    let Json(req) = payload.map_err(|e| ApiError::validation_error(e.body_text()))?;

    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("analyze", %request_id, language = %req.language());

    async move {
        let t0 = std::time::Instant::now();
        tracing::debug!(
            "Analyze request: category='{}', {} chars",
            req.category,
            req.text.chars().count()
        );

        let response = state.assistant.analyze(&req).await?;

        tracing::info!(
            "Analyze completed in {}ms (audio: {})",
            t0.elapsed().as_millis(),
            response.audio.is_some()
        );
        Ok::<_, ApiError>(Json(response))
    }
    .instrument(span)
    .await
}
