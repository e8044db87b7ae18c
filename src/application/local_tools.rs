//! Tools served without calling the backend

use std::path::Path;

use base64::Engine;
use serde_json::{json, Value};
use thiserror::Error;

/// Failure reading a local voice file
#[derive(Debug, Clone, Error)]
#[error("Failed to read file '{path}': {message}")]
pub struct ResourceError {
    pub path: String,
    pub message: String,
}

impl ResourceError {
    pub fn to_payload(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

/// Prompt text asking a model to process a voice file
pub fn voice_recognition_prompt(file_path: &str) -> String {
    format!("Please process this voice file: {}", file_path)
}

/// Read a voice file and return its base64 encoding.
/// The file handle is released before returning.
pub async fn voice_resource(path: &Path) -> Result<String, ResourceError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| ResourceError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}
