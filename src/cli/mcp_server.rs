//! MCP server over stdio (JSON-RPC 2.0, NDJSON framing)
//!
//! Exposes every registry operation as a tool, plus the MCP-only
//! `voice_recognition_prompt` and `voice_resource` tools. Requests run on a
//! bounded pool of tasks; a single writer task serializes the responses.

use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncWrite};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::application::dispatch::{parse_params, FilePathParams};
use crate::application::help::{
    PROMPT_TOOL_DESCRIPTION, PROMPT_TOOL_NAME, RESOURCE_TOOL_DESCRIPTION, RESOURCE_TOOL_NAME,
};
use crate::application::local_tools::{voice_recognition_prompt, voice_resource};
use crate::application::registry::file_path_schema;
use crate::application::{DispatchError, Dispatcher, OperationCall, OperationId, TransportKind};

use super::error::{McpError, TransportError};
use super::jsonrpc::{
    is_blank, read_line, write_line, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    JSONRPC_VERSION, SERVER_ERROR,
};
use super::mcp_protocol::{
    InitializeParams, InitializeResult, Prompt, PromptArgument, PromptMessage,
    PromptMessageContent, PromptsGetParams, PromptsGetResult, PromptsListResult, Tool,
    ToolCallParams, ToolCallResult, ToolsListResult,
};

/// Responses waiting for the writer
const OUTBOUND_BUFFER: usize = 64;

/// Request handler shared by all worker tasks
#[derive(Clone)]
pub struct McpHandler {
    dispatcher: Arc<Dispatcher>,
}

impl McpHandler {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Handle one line. Notifications produce no response.
    pub async fn handle_line(&self, line: impl AsRef<[u8]>) -> Option<JsonRpcResponse> {
        let line = line.as_ref();
        debug!(line = %String::from_utf8_lossy(line), "received");

        let value: Value = match serde_json::from_slice(line) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "unparseable request line");
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::parse_error(),
                ));
            }
        };

        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                let err = McpError::InvalidRequest(e.to_string());
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::new(err.error_code(), err.to_string()),
                ));
            }
        };

        let Some(id) = request.id.clone() else {
            debug!(method = ?request.method, "notification ignored");
            return None;
        };

        let Some(method) = request.method.as_deref() else {
            let err = McpError::InvalidRequest("missing method".to_string());
            return Some(JsonRpcResponse::failure(
                id,
                JsonRpcError::new(err.error_code(), err.to_string()),
            ));
        };

        let params = request.params.clone().unwrap_or(Value::Null);
        let method = method.to_string();

        // A panicking handler still gets an answer
        let handler = self.clone();
        let task = tokio::spawn(async move {
            let outcome = handler.handle_method(&method, params).await;
            (method, outcome)
        });

        let response = match task.await {
            Ok((_, Ok(result))) => JsonRpcResponse::success(id, result),
            Ok((method, Err(e))) => {
                warn!(method = %method, error = %e, "request failed");
                JsonRpcResponse::failure(id, JsonRpcError::new(e.error_code(), e.to_string()))
            }
            Err(e) => {
                error!(error = %e, "handler task failed");
                JsonRpcResponse::failure(
                    id,
                    JsonRpcError::new(SERVER_ERROR, format!("Internal error: {}", e)),
                )
            }
        };
        Some(response)
    }

    async fn handle_method(&self, method: &str, params: Value) -> Result<Value, McpError> {
        match method {
            "initialize" => {
                let params: InitializeParams = parse_params(params).map_err(invalid_params)?;
                let result = InitializeResult::negotiate(&params);
                info!(protocol = %result.protocol_version, "client initialized");
                to_value(result)
            }
            "ping" => Ok(json!({})),
            "tools/list" => to_value(self.tools_list()),
            "tools/call" => {
                let params: ToolCallParams = parse_params(params).map_err(invalid_params)?;
                to_value(self.call_tool(params).await?)
            }
            "prompts/list" => to_value(prompts_list()),
            "prompts/get" => {
                let params: PromptsGetParams = parse_params(params).map_err(invalid_params)?;
                to_value(prompts_get(params)?)
            }
            "resources/list" => Ok(json!({ "resources": [] })),
            _ => Err(McpError::MethodNotFound(method.to_string())),
        }
    }

    /// Registry operations followed by the MCP-only tools
    pub fn tools_list(&self) -> ToolsListResult {
        let mut tools: Vec<Tool> = self
            .dispatcher
            .registry()
            .operations()
            .map(|op| Tool {
                name: op.name().to_string(),
                description: op.description().to_string(),
                input_schema: op.input_schema().clone(),
            })
            .collect();

        tools.push(Tool {
            name: PROMPT_TOOL_NAME.to_string(),
            description: PROMPT_TOOL_DESCRIPTION.to_string(),
            input_schema: file_path_schema(),
        });
        tools.push(Tool {
            name: RESOURCE_TOOL_NAME.to_string(),
            description: RESOURCE_TOOL_DESCRIPTION.to_string(),
            input_schema: file_path_schema(),
        });

        ToolsListResult { tools }
    }

    /// Run a tool by name
    pub async fn call_tool(&self, params: ToolCallParams) -> Result<ToolCallResult, McpError> {
        debug!(tool = %params.name, "calling tool");
        let arguments = params.arguments.unwrap_or(Value::Null);

        match params.name.as_str() {
            PROMPT_TOOL_NAME => {
                let args: FilePathParams = parse_params(arguments).map_err(invalid_params)?;
                Ok(ToolCallResult::text(voice_recognition_prompt(&args.file_path)))
            }
            RESOURCE_TOOL_NAME => {
                let args: FilePathParams = parse_params(arguments).map_err(invalid_params)?;
                match voice_resource(Path::new(&args.file_path)).await {
                    Ok(encoded) => Ok(ToolCallResult::text(encoded)),
                    Err(e) => Ok(ToolCallResult::json(e.to_payload())),
                }
            }
            name => {
                let operation = self
                    .dispatcher
                    .registry()
                    .resolve(name)
                    .ok_or_else(|| McpError::MethodNotFound(format!("Unknown tool: {}", name)))?;
                let call = OperationCall::parse(operation.id(), arguments).map_err(invalid_params)?;
                let output = self.dispatcher.invoke(call, TransportKind::Mcp).await;

                if operation.id() == OperationId::Help {
                    Ok(ToolCallResult::json(help_envelope(output)))
                } else {
                    Ok(ToolCallResult::json(output))
                }
            }
        }
    }
}

/// `help` answers on this transport with its own JSON-RPC-shaped document
fn help_envelope(output: Value) -> Value {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "output": output,
        "id": unix_millis(),
    })
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn prompts_list() -> PromptsListResult {
    PromptsListResult {
        prompts: vec![Prompt {
            name: PROMPT_TOOL_NAME.to_string(),
            description: Some(PROMPT_TOOL_DESCRIPTION.to_string()),
            arguments: vec![PromptArgument {
                name: "file_path".to_string(),
                description: Some("Voice file path".to_string()),
                required: true,
            }],
        }],
    }
}

fn prompts_get(params: PromptsGetParams) -> Result<PromptsGetResult, McpError> {
    if params.name != PROMPT_TOOL_NAME {
        return Err(McpError::InvalidParams(format!(
            "Unknown prompt: {}",
            params.name
        )));
    }

    let args: FilePathParams =
        parse_params(params.arguments.unwrap_or(Value::Null)).map_err(invalid_params)?;

    Ok(PromptsGetResult {
        description: Some(PROMPT_TOOL_DESCRIPTION.to_string()),
        messages: vec![PromptMessage {
            role: "user".to_string(),
            content: PromptMessageContent::Text {
                text: voice_recognition_prompt(&args.file_path),
            },
        }],
    })
}

fn invalid_params(err: DispatchError) -> McpError {
    McpError::InvalidParams(match err {
        DispatchError::InvalidParams(message) => message,
        other => other.to_string(),
    })
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value, McpError> {
    serde_json::to_value(value).map_err(|e| McpError::InvalidRequest(e.to_string()))
}

/// MCP server loop
pub struct McpServer {
    handler: McpHandler,
    max_concurrency: usize,
}

impl McpServer {
    pub fn new(dispatcher: Arc<Dispatcher>, max_concurrency: usize) -> Self {
        Self {
            handler: McpHandler::new(dispatcher),
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Serve until end of input, then wait for in-flight requests.
    pub async fn run<R, W>(&self, mut reader: R, writer: W) -> Result<(), TransportError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<String>(OUTBOUND_BUFFER);
        let writer_task = tokio::spawn(write_responses(rx, writer));

        let permits = Arc::new(Semaphore::new(self.max_concurrency));
        let mut in_flight = JoinSet::new();
        while let Some(line) = read_line(&mut reader).await? {
            if is_blank(&line) {
                continue;
            }

            let permit = Arc::clone(&permits)
                .acquire_owned()
                .await
                .map_err(|e| TransportError::WriterClosed(e.to_string()))?;
            let handler = self.handler.clone();
            let tx = tx.clone();

            in_flight.spawn(async move {
                let _permit = permit;
                if let Some(response) = handler.handle_line(&line).await {
                    match serde_json::to_string(&response) {
                        Ok(encoded) => {
                            if tx.send(encoded).await.is_err() {
                                error!("response writer is gone");
                            }
                        }
                        Err(e) => error!(error = %e, "failed to serialize response"),
                    }
                }
            });

            while let Some(joined) = in_flight.try_join_next() {
                log_join(joined);
            }
        }

        while let Some(joined) = in_flight.join_next().await {
            log_join(joined);
        }

        drop(tx);
        writer_task
            .await
            .map_err(|e| TransportError::WriterClosed(e.to_string()))??;

        info!("end of input, MCP server stopping");
        Ok(())
    }
}

fn log_join(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        error!(error = %e, "request task failed");
    }
}

async fn write_responses<W>(
    mut rx: mpsc::Receiver<String>,
    mut writer: W,
) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = rx.recv().await {
        write_line(&mut writer, &line).await?;
    }
    Ok(())
}
