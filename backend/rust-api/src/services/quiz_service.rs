use chrono::Local;
use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::metrics::{record_model_call, QUIZ_PARSE_DEGRADED_TOTAL};
use crate::models::{LogEntry, QuizRequest};
use crate::services::{
    chat_client::ChatClient,
    extractor::extract_content,
    log_store::LogStore,
    mapper::map_record,
    prompt::{provider_model, user_message, SYSTEM_PROMPT},
    sanitizer::sanitize,
};
use crate::utils::time::to_timestamp;

/// A persisted question. `degraded` marks a reply that could not be parsed, in
/// which case `entry.response` is empty.
#[derive(Debug, Clone)]
pub struct QuizOutcome {
    pub entry: LogEntry,
    pub degraded: bool,
}

pub struct QuizService {
    chat: Arc<dyn ChatClient>,
    store: Arc<LogStore>,
}

impl QuizService {
    pub fn new(chat: Arc<dyn ChatClient>, store: Arc<LogStore>) -> Self {
        Self { chat, store }
    }

    /// Calls the model for `request`, normalizes the reply and appends it to the log.
    /// Nothing is persisted when the call fails or the envelope is malformed.
    pub async fn generate(&self, request: &QuizRequest) -> Result<QuizOutcome> {
        let echo = request.normalized();
        let model = provider_model(&echo.model);
        let message = user_message(&echo);

        let started_at = Local::now();
        let timer = Instant::now();
        tracing::info!("Calling model {} at {}", model, to_timestamp(&started_at));

        let reply = self.chat.complete(model, SYSTEM_PROMPT, &message).await;

        let ended_at = Local::now();
        let cost_seconds = timer.elapsed().as_secs_f64();
        record_model_call(model, reply.is_ok(), cost_seconds);
        tracing::info!("Model {} answered in {:.3}s", model, cost_seconds);

        let body = reply?;
        let content = extract_content(&body)?;
        let mapped = map_record(&sanitize(&content));
        if mapped.degraded {
            QUIZ_PARSE_DEGRADED_TOTAL.inc();
            tracing::warn!(
                "Model reply could not be parsed, storing an empty question (language={}, keyword={})",
                echo.language,
                echo.keyword
            );
        }

        let entry = LogEntry {
            request: echo,
            response: mapped.record,
            start_time: to_timestamp(&started_at),
            end_time: to_timestamp(&ended_at),
            cost_seconds,
        };
        self.store.append(entry.clone()).await?;

        Ok(QuizOutcome {
            entry,
            degraded: mapped.degraded,
        })
    }
}
