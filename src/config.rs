//! Service configuration, loaded once at startup from the environment.

use thiserror::Error;

use crate::gemini;
use crate::youtube;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingCredential(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind host
    pub host: String,
    /// Server bind port
    pub port: u16,
    /// YouTube Data API key
    pub youtube_api_key: String,
    /// Gemini API key
    pub gemini_api_key: String,
    /// YouTube Data API base URL
    pub youtube_base_url: String,
    /// Gemini API base URL
    pub gemini_base_url: String,
    /// Model used for topic analysis
    pub analyze_model: String,
    /// Model used for clip suggestion generation
    pub clips_model: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Both provider credentials are required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_or("HOST", "0.0.0.0"),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            youtube_api_key: require("YOUTUBE_API_KEY")?,
            gemini_api_key: require("GEMINI_API_KEY")?,
            youtube_base_url: env_or("YOUTUBE_API_BASE_URL", youtube::DEFAULT_BASE_URL),
            gemini_base_url: env_or("GEMINI_API_BASE_URL", gemini::DEFAULT_BASE_URL),
            analyze_model: env_or("GEMINI_ANALYZE_MODEL", "gemini-2.5-flash"),
            clips_model: env_or("GEMINI_CLIPS_MODEL", "gemini-2.5-pro"),
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingCredential(name)),
    }
}
