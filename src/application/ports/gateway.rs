//! Voice backend gateway port interface

use std::path::Path;

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

/// Gateway errors.
///
/// These never cross a transport as protocol errors; callers turn them into
/// an `{"error": ...}` payload with [`GatewayError::to_payload`].
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("Failed to read file '{path}': {message}")]
    FileAccess { path: String, message: String },

    #[error("Invalid base64 data: {0}")]
    Decode(String),

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Failed to parse API response: {0}")]
    ParseError(String),
}

impl GatewayError {
    /// Wire form of a gateway failure
    pub fn to_payload(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

/// Port for the remote voice-recognition backend
#[async_trait]
pub trait VoiceGateway: Send + Sync {
    /// Upload the audio file at `path` for identification.
    ///
    /// # Returns
    /// The backend response with `label_result` decoded, or an error
    async fn identify_from_path(&self, path: &Path) -> Result<Value, GatewayError>;

    /// Decode base64 audio and upload it for identification.
    async fn identify_from_base64(&self, data: &str) -> Result<Value, GatewayError>;

    /// Send plain text to the backend as a JSON body.
    async fn extract_text(&self, text: &str) -> Result<Value, GatewayError>;
}
