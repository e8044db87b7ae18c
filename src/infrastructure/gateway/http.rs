//! HTTP voice backend gateway adapter

use std::path::Path;

use async_trait::async_trait;
use base64::Engine;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::application::ports::{GatewayError, VoiceGateway};
use crate::domain::config::GatewayConfig;
use crate::domain::label::restructure_response;

/// File name sent for uploads that did not come from disk
const SYNTHETIC_FILENAME: &str = "audio.wav";

/// Multipart field carrying the audio bytes
const FILE_FIELD: &str = "file";

// Request body for text extraction

#[derive(Debug, Serialize)]
struct ExtractTextRequest<'a> {
    text: &'a str,
}

/// Gateway to the remote transcription API.
///
/// Every call is a single `POST` to the configured endpoint with a bearer
/// token; JSON responses have their `label_result` decoded before return.
pub struct HttpVoiceGateway {
    config: GatewayConfig,
    client: reqwest::Client,
}

impl HttpVoiceGateway {
    /// Create a gateway from a validated config
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Endpoint every request is sent to
    pub fn endpoint(&self) -> &str {
        self.config.endpoint()
    }

    fn post(&self) -> reqwest::RequestBuilder {
        self.client
            .post(self.config.endpoint())
            .bearer_auth(self.config.credential())
    }

    /// Build the multipart upload for raw audio bytes
    fn upload_form(bytes: Vec<u8>, file_name: String) -> Form {
        Form::new().part(FILE_FIELD, Part::bytes(bytes).file_name(file_name))
    }

    async fn upload(&self, bytes: Vec<u8>, file_name: String) -> Result<Value, GatewayError> {
        debug!(
            endpoint = self.config.endpoint(),
            size = bytes.len(),
            file_name = %file_name,
            "uploading audio"
        );
        let request = self
            .post()
            .header(ACCEPT, "application/json")
            .multipart(Self::upload_form(bytes, file_name));
        self.send(request).await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GatewayError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::ParseError(e.to_string()))?;

        Ok(restructure_response(body))
    }
}

/// Name the backend sees for an uploaded file
fn upload_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| SYNTHETIC_FILENAME.to_string())
}

#[async_trait]
impl VoiceGateway for HttpVoiceGateway {
    async fn identify_from_path(&self, path: &Path) -> Result<Value, GatewayError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| GatewayError::FileAccess {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        self.upload(bytes, upload_file_name(path)).await
    }

    async fn identify_from_base64(&self, data: &str) -> Result<Value, GatewayError> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(data.trim())
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        self.upload(bytes, SYNTHETIC_FILENAME.to_string()).await
    }

    async fn extract_text(&self, text: &str) -> Result<Value, GatewayError> {
        debug!(endpoint = self.config.endpoint(), chars = text.len(), "extracting text");
        let request = self.post().json(&ExtractTextRequest { text });
        self.send(request).await
    }
}
