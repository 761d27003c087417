use axum::{extract::State, http::StatusCode, response::Html, Json};
use std::sync::Arc;
use validator::Validate;

use crate::{
    extractors::AppJson,
    models::{quiz::first_validation_message, QuizRequest, QuizResponse},
    services::AppState,
};

use super::ApiError;

/// GET /index - question generator page
pub async fn index_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let path = state.config.templates_dir.join("index.html");
    tokio::fs::read_to_string(&path)
        .await
        .map(Html)
        .map_err(|e| {
            tracing::error!("Failed to read template {}: {}", path.display(), e);
            ApiError::Internal("页面模板加载失败".to_string())
        })
}

/// POST /index, POST /api/questions/create - generate one question
pub async fn create_question(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<QuizRequest>,
) -> Result<(StatusCode, Json<QuizResponse>), ApiError> {
    req.validate()
        .map_err(|e| ApiError::bad_request(first_validation_message(&e)))?;

    tracing::info!(
        "Generating question: model={:?}, language={:?}, type={:?}, keyword={:?}",
        req.model,
        req.language,
        req.kind,
        req.keyword
    );

    let outcome = state.quiz_service().generate(&req).await.map_err(|e| {
        tracing::error!("Question generation failed: {}", e);
        ApiError::from(e)
    })?;

    // A degraded reply still answers with code 0 and an empty question.
    Ok((
        StatusCode::OK,
        Json(QuizResponse::success(outcome.entry.response)),
    ))
}
