//! Configuration domain module

mod app_config;
mod gateway_config;

pub use app_config::AppConfig;
pub use gateway_config::{GatewayConfig, DEFAULT_TIMEOUT_SECS};
