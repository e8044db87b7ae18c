//! Domain layer - Core business logic
//!
//! Contains value objects and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod label;

// Re-export common types
pub use config::{AppConfig, GatewayConfig};
pub use error::*;
pub use label::{restructure_response, LabelResult};
