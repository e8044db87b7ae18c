//! Domain error types

use thiserror::Error;

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),

    #[error("Missing API endpoint. Set API_URL, pass --api-url, or run 'voice-identify config set api_url <url>'")]
    MissingEndpoint,

    #[error("Missing API key. Set API_KEY, pass --api-key, or run 'voice-identify config set api_key <key>'")]
    MissingCredential,
}
