use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::error::QuizError;
use crate::metrics;
use crate::models::QuizResponse;
use crate::services::AppState;

pub mod quiz;

/// Handler-level failure, rendered as `{code: -1, msg, aiRes}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }
}

impl From<QuizError> for ApiError {
    fn from(err: QuizError) -> Self {
        let message = match &err {
            QuizError::MalformedResponse(_) => format!("解析模型响应的 JSON 数据出错: {}", err),
            QuizError::ModelCall(_) => format!("模型调用出错: {}", err),
            QuizError::Persistence(_) => format!("读取/写入json文件出错: {}", err),
        };
        ApiError::Internal(message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(QuizResponse::failure(message))).into_response()
    }
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let data_dir = state.store.data_dir();
    let storage_ok = tokio::fs::metadata(data_dir)
        .await
        .map(|meta| meta.is_dir() && !meta.permissions().readonly())
        .unwrap_or(false);

    let status_code = if storage_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(json!({
            "status": if storage_ok { "healthy" } else { "degraded" },
            "service": "ai-question-bank",
            "version": env!("CARGO_PKG_VERSION"),
            "storage": {
                "data_dir": data_dir.display().to_string(),
                "log_file": state.store.current_path().await.display().to_string(),
                "entries_today": state.store.entries().await.len(),
            }
        })),
    )
}

pub async fn metrics_handler() -> impl IntoResponse {
    match metrics::render_metrics() {
        Ok(metrics_text) => (StatusCode::OK, metrics_text),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to render metrics: {}", e),
        ),
    }
}
