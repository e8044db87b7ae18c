//! Line-delimited JSON-RPC server
//!
//! Reads one request per line, answers with one response per line, in order.

use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{debug, error, info, warn};

use crate::application::{DispatchError, Dispatcher, TransportKind};

use super::error::TransportError;
use super::jsonrpc::{
    is_blank, read_line, write_line, JsonRpcError, JsonRpcResponse, METHOD_NOT_FOUND,
    SERVER_ERROR,
};

/// Sequential request processor over a line stream
pub struct StdioServer {
    dispatcher: Arc<Dispatcher>,
}

impl StdioServer {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Serve until end of input.
    ///
    /// Each line is fully handled, including any backend call, before the
    /// next is read. Only I/O failures on the streams end the loop early.
    pub async fn run<R, W>(&self, mut reader: R, mut writer: W) -> Result<(), TransportError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        while let Some(line) = read_line(&mut reader).await? {
            if is_blank(&line) {
                continue;
            }

            let response = self.handle_line(&line).await;
            let encoded = serde_json::to_string(&response)?;
            write_line(&mut writer, &encoded).await?;
        }

        info!("end of input, stdio server stopping");
        Ok(())
    }

    /// Turn one request line into its response
    pub async fn handle_line(&self, line: impl AsRef<[u8]>) -> JsonRpcResponse {
        let line = line.as_ref();
        debug!(line = %String::from_utf8_lossy(line), "received");

        let value: Value = match serde_json::from_slice(line) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "unparseable request line");
                return JsonRpcResponse::failure(Value::Null, JsonRpcError::parse_error());
            }
        };

        let Value::Object(mut request) = value else {
            return JsonRpcResponse::failure(
                Value::Null,
                JsonRpcError::new(SERVER_ERROR, "Invalid request: expected a JSON object"),
            );
        };

        let id = request.remove("id").unwrap_or(Value::Null);

        let method = match request.remove("method") {
            Some(Value::String(method)) => method,
            other => {
                let shown = other.unwrap_or(Value::Null);
                return JsonRpcResponse::failure(
                    id,
                    JsonRpcError::new(METHOD_NOT_FOUND, format!("Method not found: {}", shown)),
                );
            }
        };

        let params = request.remove("params").unwrap_or(Value::Null);
        self.dispatch(id, method, params).await
    }

    /// Run the handler on its own task so a panic becomes an error response
    async fn dispatch(&self, id: Value, method: String, params: Value) -> JsonRpcResponse {
        let dispatcher = Arc::clone(&self.dispatcher);
        let task = tokio::spawn(async move {
            dispatcher
                .dispatch(&method, params, TransportKind::Stdio)
                .await
        });

        match task.await {
            Ok(Ok(result)) => JsonRpcResponse::success(id, result),
            Ok(Err(e @ DispatchError::UnknownOperation(_))) => {
                JsonRpcResponse::failure(id, JsonRpcError::new(METHOD_NOT_FOUND, e.to_string()))
            }
            Ok(Err(e @ DispatchError::InvalidParams(_))) => {
                JsonRpcResponse::failure(id, JsonRpcError::new(SERVER_ERROR, e.to_string()))
            }
            Err(e) => {
                error!(error = %e, "handler task failed");
                JsonRpcResponse::failure(
                    id,
                    JsonRpcError::new(SERVER_ERROR, format!("Internal error: {}", e)),
                )
            }
        }
    }
}
