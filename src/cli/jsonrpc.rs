//! JSON-RPC 2.0 envelope types
//!
//! See: https://www.jsonrpc.org/specification

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::error::TransportError;

pub const JSONRPC_VERSION: &str = "2.0";

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const SERVER_ERROR: i32 = -32000;

/// Incoming request. Every field is optional so malformed envelopes can
/// still be answered with whatever id they carried.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<String>,
    /// Request ID (string or number); absent for notifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn parse_error() -> Self {
        Self::new(PARSE_ERROR, "Parse error")
    }
}

/// Response carrying exactly one of `result` or `error`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(flatten)]
    pub outcome: Outcome,
    pub id: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(JsonRpcError),
}

impl JsonRpcResponse {
    /// Create a new success response
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            outcome: Outcome::Result(result),
            id,
        }
    }

    /// Create a new error response
    pub fn failure(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            outcome: Outcome::Error(error),
            id,
        }
    }

    pub fn error(&self) -> Option<&JsonRpcError> {
        match &self.outcome {
            Outcome::Error(e) => Some(e),
            Outcome::Result(_) => None,
        }
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Result(v) => Some(v),
            Outcome::Error(_) => None,
        }
    }
}

/// Write one JSON document followed by a newline and flush
pub async fn write_line<W>(writer: &mut W, line: &str) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

/// Read one line as raw bytes, without its line ending.
///
/// Returns `None` at end of input. The bytes are not checked for UTF-8 so a
/// bad line can still be answered with a parse error.
pub async fn read_line<R>(reader: &mut R) -> Result<Option<Vec<u8>>, TransportError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf).await? == 0 {
        return Ok(None);
    }
    while matches!(buf.last(), Some(b'\n' | b'\r')) {
        buf.pop();
    }
    Ok(Some(buf))
}

/// True for lines holding nothing but whitespace
pub fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_has_result_only() {
        let response = JsonRpcResponse::success(json!(7), json!({"ok": true}));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value, json!({"jsonrpc": "2.0", "result": {"ok": true}, "id": 7}));
    }

    #[test]
    fn failure_has_error_only() {
        let response = JsonRpcResponse::failure(Value::Null, JsonRpcError::parse_error());
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(
            value,
            json!({
                "jsonrpc": "2.0",
                "error": {"code": -32700, "message": "Parse error"},
                "id": null
            })
        );
    }

    #[test]
    fn response_parses_back() {
        let line = r#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"Method not found: x"},"id":"a"}"#;
        let response: JsonRpcResponse = serde_json::from_str(line).unwrap();
        assert_eq!(response.error().unwrap().code, METHOD_NOT_FOUND);
        assert_eq!(response.id, json!("a"));
        assert!(response.result().is_none());
    }

    #[test]
    fn request_fields_are_optional() {
        let request: JsonRpcRequest = serde_json::from_str(r#"{"params": {}}"#).unwrap();
        assert!(request.method.is_none());
        assert!(request.id.is_none());
    }

    #[tokio::test]
    async fn write_line_appends_newline() {
        let mut out = Vec::new();
        write_line(&mut out, "{}").await.unwrap();
        assert_eq!(out, b"{}\n");
    }

    #[tokio::test]
    async fn read_line_keeps_invalid_utf8() {
        let mut input = tokio::io::BufReader::new(&b"{}\r\n\xff\xfe\nlast"[..]);

        assert_eq!(read_line(&mut input).await.unwrap(), Some(b"{}".to_vec()));
        assert_eq!(read_line(&mut input).await.unwrap(), Some(vec![0xff, 0xfe]));
        assert_eq!(read_line(&mut input).await.unwrap(), Some(b"last".to_vec()));
        assert_eq!(read_line(&mut input).await.unwrap(), None);
    }

    #[test]
    fn blank_lines() {
        assert!(is_blank(b""));
        assert!(is_blank(b" \t "));
        assert!(!is_blank(b" {} "));
    }
}
