use std::env;
use std::sync::OnceLock;
use thiserror::Error;

use crate::generation::{DEFAULT_MODEL, GenerationSettings};

/// Public Gemini REST endpoint used when `GEMINI_BASE_URL` is not set.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Port the HTTP server listens on when `SERVER_PORT` is not set.
pub const DEFAULT_SERVER_PORT: u16 = 8000;
/// Upload ceiling applied to `POST /api/extract` when `MAX_UPLOAD_BYTES` is not set.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
/// Local development origins allowed to call the API cross-origin.
pub const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost",
    "http://localhost:5173",
    "http://127.0.0.1:5173",
];

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the docgen server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for the Gemini API. Generation fails closed when absent.
    pub google_api_key: Option<String>,
    /// Base URL of the Gemini REST API.
    pub gemini_base_url: String,
    /// Model used when a request does not name one.
    pub default_model: String,
    /// Port the HTTP server binds to.
    pub server_port: u16,
    /// Origins permitted by the CORS layer.
    pub cors_origins: Vec<String>,
    /// Largest accepted upload body, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            google_api_key: None,
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            google_api_key: optional("GOOGLE_API_KEY").map(|key| key.trim().to_string()),
            gemini_base_url: optional("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            default_model: optional("DEFAULT_MODEL").unwrap_or(defaults.default_model),
            server_port: optional("SERVER_PORT")
                .map(|value| parse_value("SERVER_PORT", &value))
                .transpose()?
                .unwrap_or(defaults.server_port),
            cors_origins: optional("CORS_ORIGINS")
                .map(|value| {
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            max_upload_bytes: optional("MAX_UPLOAD_BYTES")
                .map(|value| parse_value("MAX_UPLOAD_BYTES", &value))
                .transpose()?
                .unwrap_or(defaults.max_upload_bytes),
        })
    }

    /// Settings handed to [`crate::generation::TextGenerator`].
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            api_key: self.google_api_key.clone(),
            base_url: self.gemini_base_url.clone(),
            default_model: self.default_model.clone(),
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key.to_string()))
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    CONFIG.set(config).expect("Failed to set config");
}

/// Log the parts of the loaded configuration worth seeing at startup.
///
/// Runs after tracing is installed, so it is kept separate from [`init_config`].
pub fn log_config(config: &Config) {
    if config.google_api_key.is_none() {
        tracing::warn!("GOOGLE_API_KEY environment variable not found. AI service may not work.");
    } else {
        tracing::info!("Google Generative AI configured successfully.");
    }
    tracing::debug!(
        gemini_base_url = %config.gemini_base_url,
        default_model = %config.default_model,
        server_port = config.server_port,
        cors_origins = ?config.cors_origins,
        max_upload_bytes = config.max_upload_bytes,
        "Loaded configuration"
    );
}
