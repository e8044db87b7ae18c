//! Transport-level error types

use thiserror::Error;

/// Errors that end a transport loop
#[derive(Debug, Error)]
pub enum TransportError {
    /// IO error (stdin/stdout)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Background writer stopped unexpectedly
    #[error("Response writer stopped: {0}")]
    WriterClosed(String),
}

/// Errors answered with a JSON-RPC error object on the MCP transport
#[derive(Debug, Clone, Error)]
pub enum McpError {
    #[error("Invalid JSON-RPC request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),
}

impl McpError {
    /// Convert error to JSON-RPC error code
    pub fn error_code(&self) -> i32 {
        match self {
            McpError::InvalidRequest(_) => super::jsonrpc::INVALID_REQUEST,
            McpError::MethodNotFound(_) => super::jsonrpc::METHOD_NOT_FOUND,
            McpError::InvalidParams(_) => super::jsonrpc::INVALID_PARAMS,
        }
    }
}
