#![allow(dead_code)]

use ai_question_bank::{
    config::Config,
    create_router,
    error::{QuizError, Result},
    services::{chat_client::ChatClient, AppState},
};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Chat client that answers every call with a fixed reply.
pub struct StubChatClient {
    reply: std::result::Result<Vec<u8>, String>,
    calls: Mutex<Vec<String>>,
}

impl StubChatClient {
    /// Replies with a well-formed envelope around `content`.
    pub fn with_content(content: &str) -> Self {
        let body = json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        });
        Self::with_body(serde_json::to_vec(&body).unwrap())
    }

    pub fn with_body(body: Vec<u8>) -> Self {
        Self {
            reply: Ok(body),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for StubChatClient {
    async fn complete(&self, _model: &str, _system: &str, user: &str) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push(user.to_string());
        self.reply.clone().map_err(QuizError::ModelCall)
    }
}

pub fn test_config(data_dir: &Path) -> Config {
    Config {
        data_dir: data_dir.to_path_buf(),
        templates_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("templates"),
        ..Config::default()
    }
}

pub async fn create_test_app(
    data_dir: &Path,
    client: Arc<StubChatClient>,
) -> (Router, Arc<AppState>) {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let state = Arc::new(
        AppState::with_client(test_config(data_dir), client)
            .await
            .expect("Failed to initialize test app state"),
    );
    (create_router(state.clone()), state)
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

pub async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or_else(|_| {
        panic!(
            "non-JSON body with status {}: {}",
            status,
            String::from_utf8_lossy(&body)
        )
    });
    (status, json)
}

pub async fn read_log_file(state: &AppState) -> Value {
    let path = state.store.current_path().await;
    let raw = tokio::fs::read_to_string(&path).await.unwrap();
    serde_json::from_str(&raw).expect("log file must stay a valid JSON array")
}
