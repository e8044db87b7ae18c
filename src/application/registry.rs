//! Operation registry shared by both transports

use std::fmt;

use serde_json::{json, Value};
use thiserror::Error;

/// Registration errors. Only raised while building a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Operation already registered: {0}")]
    Duplicate(String),
}

/// Canonical operations reachable from either transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationId {
    Help,
    IdentifyVoice,
    IdentifyVoiceBase64,
    ExtractText,
}

impl OperationId {
    /// All canonical operations, in registration order
    pub const ALL: [OperationId; 4] = [
        Self::Help,
        Self::IdentifyVoice,
        Self::IdentifyVoiceBase64,
        Self::ExtractText,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::IdentifyVoice => "identify_voice",
            Self::IdentifyVoiceBase64 => "identify_voice_base64",
            Self::ExtractText => "extract_text",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            Self::Help => "Show this help information.",
            Self::IdentifyVoice => "Identify voice from file",
            Self::IdentifyVoiceBase64 => "Identify voice from base64 encoded data",
            Self::ExtractText => "Extract text",
        }
    }

    /// JSON Schema describing the operation's parameters
    pub fn input_schema(&self) -> Value {
        match self {
            Self::Help => json!({
                "type": "object",
                "properties": {}
            }),
            Self::IdentifyVoice => file_path_schema(),
            Self::IdentifyVoiceBase64 => string_param_schema("base64_data", "Base64 encoded voice data"),
            Self::ExtractText => string_param_schema("text", "Text to extract"),
        }
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Schema for tools taking a single `file_path` argument
pub fn file_path_schema() -> Value {
    string_param_schema("file_path", "Voice file path")
}

fn string_param_schema(name: &str, description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            name: {
                "type": "string",
                "description": description
            }
        },
        "required": [name]
    })
}

/// A registered operation: name, handler selector and input schema
#[derive(Debug, Clone)]
pub struct Operation {
    id: OperationId,
    input_schema: Value,
}

impl Operation {
    pub fn new(id: OperationId) -> Self {
        Self {
            id,
            input_schema: id.input_schema(),
        }
    }

    pub fn id(&self) -> OperationId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    pub fn description(&self) -> &'static str {
        self.id.description()
    }

    pub fn input_schema(&self) -> &Value {
        &self.input_schema
    }
}

/// Name to operation mapping, built once at startup and read-only after.
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    operations: Vec<Operation>,
}

impl OperationRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the four canonical operations
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for id in OperationId::ALL {
            // Names in OperationId::ALL are distinct
            let _ = registry.register(Operation::new(id));
        }
        registry
    }

    /// Add an operation. Names must be unique.
    pub fn register(&mut self, operation: Operation) -> Result<(), RegistryError> {
        if self.operations.iter().any(|op| op.name() == operation.name()) {
            return Err(RegistryError::Duplicate(operation.name().to_string()));
        }
        self.operations.push(operation);
        Ok(())
    }

    /// Exact, case-sensitive lookup by name
    pub fn resolve(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.name() == name)
    }

    /// Registered operations in registration order
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
