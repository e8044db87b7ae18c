//! Application layer - Use cases and port interfaces
//!
//! Contains the operation registry, the dispatcher shared by both
//! transports, and trait definitions for external system interactions.

pub mod dispatch;
pub mod help;
pub mod local_tools;
pub mod ports;
pub mod registry;

// Re-export use cases
pub use dispatch::{DispatchError, Dispatcher, OperationCall};
pub use help::{help_document, TransportKind};
pub use registry::{Operation, OperationId, OperationRegistry, RegistryError};
