//! CLI layer - Command-line interface
//!
//! Contains argument parsing, the JSON-RPC and MCP transports, output
//! formatting, logging setup, and the application runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod error;
pub mod jsonrpc;
pub mod logging;
pub mod mcp_protocol;
pub mod mcp_server;
pub mod presenter;
pub mod stdio_server;

// Re-export commonly used types
pub use app::{run_mcp, run_stdio, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction};
pub use error::{McpError, TransportError};
pub use mcp_server::{McpHandler, McpServer};
pub use presenter::Presenter;
pub use stdio_server::StdioServer;
