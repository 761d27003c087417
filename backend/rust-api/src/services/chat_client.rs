use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

use crate::config::Config;
use crate::error::{QuizError, Result};

/// Sends one chat-completion request and returns the raw response body.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, model: &str, system: &str, user: &str) -> Result<Vec<u8>>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

/// OpenAI-compatible chat-completion endpoint (DashScope by default).
pub struct HttpChatClient {
    http_client: Client,
    endpoint: String,
    api_key: Option<String>,
    timeout: Option<Duration>,
}

impl HttpChatClient {
    pub fn new(endpoint: String, api_key: Option<String>, timeout: Option<Duration>) -> Self {
        Self {
            http_client: Client::new(),
            endpoint,
            api_key,
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.model_endpoint.clone(),
            config.api_key.clone(),
            config.model_timeout_secs.map(Duration::from_secs),
        )
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn complete(&self, model: &str, system: &str, user: &str) -> Result<Vec<u8>> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            QuizError::ModelCall("API key not found in environment variables".to_string())
        })?;

        let payload = ChatCompletionRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let mut request = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&payload);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| QuizError::ModelCall(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| QuizError::ModelCall(format!("failed to read response body: {e}")))?;

        check_status(status, body.to_vec())
    }
}

// Only a plain 200 carries a completion; any other status is a failed call.
fn check_status(status: StatusCode, body: Vec<u8>) -> Result<Vec<u8>> {
    if status != StatusCode::OK {
        return Err(QuizError::ModelCall(format!(
            "status {}: {}",
            status,
            String::from_utf8_lossy(&body)
        )));
    }
    Ok(body)
}
