use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// Default Hugging Face inference model used for abstractive summaries.
pub const DEFAULT_MODEL: &str = "facebook/bart-large-cnn";
/// Default base URL of the hosted inference API; the model id is appended as a path segment.
pub const DEFAULT_API_URL: &str = "https://api-inference.huggingface.co/models";
/// Default character ceiling applied to extracted text before summarization.
pub const DEFAULT_CLAMP_CHARS: usize = 12_000;
/// Default target chunk size, in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 2_800;
/// Default lookahead window searched for a sentence end past the target chunk size.
pub const DEFAULT_CHUNK_LOOKAHEAD: usize = 400;
/// Default ceiling for the concatenated partial summaries fed to the final reduction call.
pub const DEFAULT_REDUCE_CHARS: usize = 6_000;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for Lectern.
#[derive(Debug, Clone)]
pub struct Config {
    /// External summarization engine settings.
    pub engine: EngineConfig,
    /// Text bounding and chunking limits.
    pub pipeline: PipelineConfig,
    /// Directory that backs `/uploads/...` file URLs.
    pub uploads_dir: PathBuf,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

/// Connection settings for the hosted abstractive summarization engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Bearer credential; `None` disables the engine and forces the local fallback.
    pub api_key: Option<String>,
    /// Model identifier appended to `base_url`.
    pub model: String,
    /// Base URL of the inference API.
    pub base_url: String,
}

/// Character limits applied by the summarization pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Maximum characters kept from the extracted document.
    pub clamp_ceiling: usize,
    /// Target chunk size handed to the engine.
    pub chunk_size: usize,
    /// Extra characters searched for a sentence boundary beyond `chunk_size`.
    pub lookahead: usize,
    /// Maximum characters of joined partial summaries sent to the reduction call.
    pub reduce_ceiling: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            clamp_ceiling: DEFAULT_CLAMP_CHARS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            lookahead: DEFAULT_CHUNK_LOOKAHEAD,
            reduce_ceiling: DEFAULT_REDUCE_CHARS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            pipeline: PipelineConfig::default(),
            uploads_dir: PathBuf::from("uploads"),
            server_port: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    ///
    /// Every variable is optional; blank values are treated as unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            engine: EngineConfig {
                api_key: load_env_optional("HF_API_KEY"),
                model: load_env_optional("HF_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
                base_url: load_env_optional("HF_API_URL")
                    .unwrap_or_else(|| DEFAULT_API_URL.into()),
            },
            pipeline: PipelineConfig {
                clamp_ceiling: parse_env_or("SUMMARY_CLAMP_CHARS", DEFAULT_CLAMP_CHARS)?,
                chunk_size: parse_env_or("SUMMARY_CHUNK_SIZE", DEFAULT_CHUNK_SIZE)?,
                lookahead: parse_env_or("SUMMARY_CHUNK_LOOKAHEAD", DEFAULT_CHUNK_LOOKAHEAD)?,
                reduce_ceiling: parse_env_or("SUMMARY_REDUCE_CHARS", DEFAULT_REDUCE_CHARS)?,
            },
            uploads_dir: load_env_optional("UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env_or<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match load_env_optional(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Global configuration cache populated during process start.
///
/// Only the binaries read from here; library components receive their settings explicitly.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        model = %config.engine.model,
        engine_configured = config.engine.api_key.is_some(),
        uploads_dir = %config.uploads_dir.display(),
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    Ok(CONFIG.get_or_init(|| config))
}
