//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces:
//! the HTTP gateway to the transcription API and the config file store.

pub mod config;
pub mod gateway;

// Re-export adapters
pub use config::XdgConfigStore;
pub use gateway::HttpVoiceGateway;
