//! voice-identify - voice recognition and text extraction service
//!
//! This crate exposes a remote transcription API through two transports:
//! line-delimited JSON-RPC on stdio and the Model Context Protocol. Both
//! share one operation registry and dispatcher, and both reshape the
//! backend's tagged `label_result` text into structured fields.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Label decoding, configuration values, and errors
//! - **Application**: Operation registry, dispatcher, and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (HTTP gateway, config file)
//! - **CLI**: Argument parsing, transports, and logging

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
