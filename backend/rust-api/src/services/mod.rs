use std::sync::Arc;

use crate::config::Config;
use chat_client::{ChatClient, HttpChatClient};
use log_store::LogStore;
use quiz_service::QuizService;

pub mod chat_client;
pub mod extractor;
pub mod log_store;
pub mod mapper;
pub mod prompt;
pub mod quiz_service;
pub mod sanitizer;

pub struct AppState {
    pub config: Config,
    pub store: Arc<LogStore>,
    pub chat: Arc<dyn ChatClient>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let chat = Arc::new(HttpChatClient::from_config(&config));
        Self::with_client(config, chat).await
    }

    /// Builds the state around an existing chat client.
    pub async fn with_client(config: Config, chat: Arc<dyn ChatClient>) -> anyhow::Result<Self> {
        tracing::info!("Opening question log in {}", config.data_dir.display());
        let store = Arc::new(LogStore::open(&config.data_dir).await?);

        Ok(Self {
            config,
            store,
            chat,
        })
    }

    pub fn quiz_service(&self) -> QuizService {
        QuizService::new(self.chat.clone(), self.store.clone())
    }
}
