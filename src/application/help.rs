//! Capability description returned by the `help` operation

use serde_json::{json, Value};

use super::registry::{file_path_schema, OperationRegistry};

pub const SERVICE_NAME: &str = "Voice Recognition Service";
pub const SERVICE_AUTHOR: &str = "AIO-2030";
pub const SERVICE_GITHUB: &str = "https://github.com/AIO-2030/mcp_voice_identify";

/// Tool that builds a prompt for a voice file (MCP only)
pub const PROMPT_TOOL_NAME: &str = "voice_recognition_prompt";
pub const PROMPT_TOOL_DESCRIPTION: &str = "Create a voice recognition prompt template";

/// Tool that returns a voice file as base64 (MCP only)
pub const RESOURCE_TOOL_NAME: &str = "voice_resource";
pub const RESOURCE_TOOL_DESCRIPTION: &str = "Provide voice file content as a resource";

/// Which transport is asking for help
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Stdio,
    Mcp,
}

impl TransportKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Mcp => "mcp",
        }
    }
}

/// Build the help document.
///
/// The MCP variant adds the MCP transport, the `tools_list`/`tools_call`
/// methods, and the `prompts` and `resources` sections.
pub fn help_document(registry: &OperationRegistry, transport: TransportKind) -> Value {
    let mut methods: Vec<Value> = registry
        .operations()
        .map(|op| {
            json!({
                "name": op.name(),
                "description": op.description(),
                "inputSchema": op.input_schema(),
            })
        })
        .collect();

    let mut transports = vec![TransportKind::Stdio.as_str()];

    let mut doc = json!({
        "type": "voice_service",
        "name": SERVICE_NAME,
        "description": "This service provides voice recognition and text extraction services",
        "author": SERVICE_AUTHOR,
        "version": env!("CARGO_PKG_VERSION"),
        "github": SERVICE_GITHUB,
    });

    if transport == TransportKind::Mcp {
        transports.push(TransportKind::Mcp.as_str());
        methods.push(json!({
            "name": "tools_list",
            "description": "List all available tools"
        }));
        methods.push(json!({
            "name": "tools_call",
            "description": "Call a tool",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "name": {"type": "string", "description": "Tool name"},
                    "arguments": {"type": "object", "description": "Tool arguments"}
                },
                "required": ["name"]
            }
        }));
        doc["prompts"] = json!([{
            "name": PROMPT_TOOL_NAME,
            "description": PROMPT_TOOL_DESCRIPTION,
            "inputSchema": file_path_schema(),
        }]);
        doc["resources"] = json!([{
            "name": RESOURCE_TOOL_NAME,
            "description": RESOURCE_TOOL_DESCRIPTION,
            "inputSchema": file_path_schema(),
        }]);
    }

    doc["transport"] = json!(transports);
    doc["methods"] = Value::Array(methods);
    doc
}
