use serde::Deserialize;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODEL_ENDPOINT: &str =
    "https://dashscope.aliyuncs.com/compatible-mode/v1/chat/completions";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bind_addr: String,
    pub data_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub model_endpoint: String,
    pub api_key: Option<String>,
    pub model_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            data_dir: PathBuf::from("./data"),
            templates_dir: PathBuf::from("./templates"),
            model_endpoint: DEFAULT_MODEL_ENDPOINT.to_string(),
            api_key: None,
            model_timeout_secs: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // config/*.toml first, APP_* environment variables on top
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let defaults = Config::default();

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or(defaults.bind_addr);

        let data_dir = settings
            .get_string("storage.data_dir")
            .or_else(|_| env::var("DATA_DIR"))
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let templates_dir = settings
            .get_string("templates.dir")
            .or_else(|_| env::var("TEMPLATES_DIR"))
            .map(PathBuf::from)
            .unwrap_or(defaults.templates_dir);

        let model_endpoint = settings
            .get_string("model.endpoint")
            .or_else(|_| env::var("MODEL_ENDPOINT"))
            .unwrap_or(defaults.model_endpoint);

        let api_key = settings
            .get_string("model.api_key")
            .or_else(|_| env::var("DASHSCOPE_API_KEY"))
            .ok()
            .filter(|key| !key.is_empty());
        if api_key.is_none() {
            tracing::warn!("DASHSCOPE_API_KEY is not set; model calls will fail");
        }

        let model_timeout_secs = match settings.get_int("model.timeout_secs") {
            Ok(secs) => Some(secs.max(1) as u64),
            Err(_) => env::var("MODEL_TIMEOUT_SECS")
                .ok()
                .and_then(|value| value.parse().ok()),
        };

        Ok(Config {
            bind_addr,
            data_dir,
            templates_dir,
            model_endpoint,
            api_key,
            model_timeout_secs,
        })
    }
}
