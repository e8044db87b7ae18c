//! Transport-agnostic operation dispatch

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use super::help::{help_document, TransportKind};
use super::ports::{GatewayError, VoiceGateway};
use super::registry::{OperationId, OperationRegistry};

/// Errors raised while routing a request to its handler
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("Method not found: {0}")]
    UnknownOperation(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),
}

#[derive(Debug, Deserialize)]
pub struct FilePathParams {
    pub file_path: String,
}

#[derive(Debug, Deserialize)]
struct Base64Params {
    base64_data: String,
}

#[derive(Debug, Deserialize)]
struct TextParams {
    text: String,
}

/// A resolved operation with its typed arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationCall {
    Help,
    IdentifyVoice { file_path: String },
    IdentifyVoiceBase64 { base64_data: String },
    ExtractText { text: String },
}

impl OperationCall {
    /// Validate `params` against the operation's fields.
    /// Missing or null params are treated as an empty object.
    pub fn parse(id: OperationId, params: Value) -> Result<Self, DispatchError> {
        let params = normalize_params(params);
        match id {
            OperationId::Help => Ok(Self::Help),
            OperationId::IdentifyVoice => {
                let p: FilePathParams = parse_params(params)?;
                Ok(Self::IdentifyVoice {
                    file_path: p.file_path,
                })
            }
            OperationId::IdentifyVoiceBase64 => {
                let p: Base64Params = parse_params(params)?;
                Ok(Self::IdentifyVoiceBase64 {
                    base64_data: p.base64_data,
                })
            }
            OperationId::ExtractText => {
                let p: TextParams = parse_params(params)?;
                Ok(Self::ExtractText { text: p.text })
            }
        }
    }
}

fn normalize_params(params: Value) -> Value {
    if params.is_null() {
        Value::Object(Map::new())
    } else {
        params
    }
}

/// Deserialize tool or method arguments
pub fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, DispatchError> {
    serde_json::from_value(normalize_params(params))
        .map_err(|e| DispatchError::InvalidParams(e.to_string()))
}

/// Routes canonical operations to their handlers.
///
/// Shared by both transports; holds only read-only state.
pub struct Dispatcher {
    registry: Arc<OperationRegistry>,
    gateway: Arc<dyn VoiceGateway>,
}

impl Dispatcher {
    pub fn new(registry: Arc<OperationRegistry>, gateway: Arc<dyn VoiceGateway>) -> Self {
        Self { registry, gateway }
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Resolve `method`, validate `params` and run the handler.
    ///
    /// Gateway failures are folded into an `{"error": ...}` payload and
    /// returned as `Ok`; only routing and parameter problems are `Err`.
    pub async fn dispatch(
        &self,
        method: &str,
        params: Value,
        transport: TransportKind,
    ) -> Result<Value, DispatchError> {
        let operation = self
            .registry
            .resolve(method)
            .ok_or_else(|| DispatchError::UnknownOperation(method.to_string()))?;
        let call = OperationCall::parse(operation.id(), params)?;
        debug!(operation = %operation.id(), transport = transport.as_str(), "dispatching");
        Ok(self.invoke(call, transport).await)
    }

    /// Run an already-validated call
    pub async fn invoke(&self, call: OperationCall, transport: TransportKind) -> Value {
        match call {
            OperationCall::Help => help_document(&self.registry, transport),
            OperationCall::IdentifyVoice { file_path } => {
                settle(self.gateway.identify_from_path(Path::new(&file_path)).await)
            }
            OperationCall::IdentifyVoiceBase64 { base64_data } => {
                settle(self.gateway.identify_from_base64(&base64_data).await)
            }
            OperationCall::ExtractText { text } => settle(self.gateway.extract_text(&text).await),
        }
    }
}

fn settle(outcome: Result<Value, GatewayError>) -> Value {
    match outcome {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "backend call failed");
            e.to_payload()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records every call and answers with a canned outcome
    struct MockGateway {
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl MockGateway {
        fn new(fail: bool) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail,
            }
        }

        fn reply(&self, call: String) -> Result<Value, GatewayError> {
            self.calls.lock().unwrap().push(call.clone());
            if self.fail {
                Err(GatewayError::RequestFailed("connection refused".to_string()))
            } else {
                Ok(json!({ "echo": call }))
            }
        }
    }

    #[async_trait]
    impl VoiceGateway for MockGateway {
        async fn identify_from_path(&self, path: &Path) -> Result<Value, GatewayError> {
            self.reply(format!("path:{}", path.display()))
        }

        async fn identify_from_base64(&self, data: &str) -> Result<Value, GatewayError> {
            self.reply(format!("b64:{}", data))
        }

        async fn extract_text(&self, text: &str) -> Result<Value, GatewayError> {
            self.reply(format!("text:{}", text))
        }
    }

    fn dispatcher(fail: bool) -> (Dispatcher, Arc<MockGateway>) {
        let gateway = Arc::new(MockGateway::new(fail));
        let dispatcher = Dispatcher::new(Arc::new(OperationRegistry::standard()), gateway.clone());
        (dispatcher, gateway)
    }

    #[tokio::test]
    async fn routes_each_operation_to_the_gateway() {
        let (dispatcher, gateway) = dispatcher(false);

        let result = dispatcher
            .dispatch("identify_voice", json!({"file_path": "/a.wav"}), TransportKind::Stdio)
            .await
            .unwrap();
        assert_eq!(result, json!({"echo": "path:/a.wav"}));

        dispatcher
            .dispatch("identify_voice_base64", json!({"base64_data": "AAA="}), TransportKind::Stdio)
            .await
            .unwrap();
        dispatcher
            .dispatch("extract_text", json!({"text": "hi"}), TransportKind::Stdio)
            .await
            .unwrap();

        assert_eq!(
            *gateway.calls.lock().unwrap(),
            vec!["path:/a.wav", "b64:AAA=", "text:hi"]
        );
    }

    #[tokio::test]
    async fn help_does_not_touch_gateway() {
        let (dispatcher, gateway) = dispatcher(false);

        let result = dispatcher
            .dispatch("help", Value::Null, TransportKind::Stdio)
            .await
            .unwrap();

        assert_eq!(result["type"], "voice_service");
        assert!(gateway.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn gateway_failure_becomes_error_payload() {
        let (dispatcher, _) = dispatcher(true);

        let result = dispatcher
            .dispatch("extract_text", json!({"text": "hi"}), TransportKind::Mcp)
            .await
            .unwrap();

        assert_eq!(
            result,
            json!({"error": "API request failed: connection refused"})
        );
    }

    #[tokio::test]
    async fn unknown_method_is_reported() {
        let (dispatcher, _) = dispatcher(false);

        let err = dispatcher
            .dispatch("transcribe", json!({}), TransportKind::Stdio)
            .await
            .unwrap_err();

        assert_eq!(err, DispatchError::UnknownOperation("transcribe".to_string()));
        assert_eq!(err.to_string(), "Method not found: transcribe");
    }

    #[tokio::test]
    async fn missing_param_is_invalid() {
        let (dispatcher, gateway) = dispatcher(false);

        let err = dispatcher
            .dispatch("identify_voice", json!({}), TransportKind::Stdio)
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::InvalidParams(ref m) if m.contains("file_path")));
        assert!(gateway.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_wrong_type() {
        let err = OperationCall::parse(OperationId::ExtractText, json!({"text": 5})).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidParams(_)));
    }

    #[test]
    fn parse_help_ignores_params() {
        assert_eq!(
            OperationCall::parse(OperationId::Help, json!([1, 2])).unwrap(),
            OperationCall::Help
        );
    }
}
