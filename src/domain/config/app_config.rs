//! Application configuration value object

use serde::{Deserialize, Serialize};

use super::gateway_config::{GatewayConfig, DEFAULT_TIMEOUT_SECS};
use crate::domain::error::ConfigError;

/// Default number of MCP requests processed at once
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_concurrency: Option<usize>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            api_url: None,
            api_key: None,
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            max_concurrency: Some(DEFAULT_MAX_CONCURRENCY),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_url: other.api_url.or(self.api_url),
            api_key: other.api_key.or(self.api_key),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            max_concurrency: other.max_concurrency.or(self.max_concurrency),
        }
    }

    /// Get request timeout in seconds, or the default if not set
    pub fn timeout_or_default(&self) -> u64 {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    /// Get MCP worker count, or the default if not set
    pub fn max_concurrency_or_default(&self) -> usize {
        self.max_concurrency
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_CONCURRENCY)
    }

    /// Build the validated gateway configuration.
    ///
    /// Fails when the endpoint or the credential is missing or blank.
    pub fn gateway_config(&self) -> Result<GatewayConfig, ConfigError> {
        let endpoint = self.api_url.as_deref().unwrap_or_default();
        let credential = self.api_key.as_deref().unwrap_or_default();

        Ok(GatewayConfig::new(endpoint, credential)?.with_timeout_secs(self.timeout_or_default()))
    }
}
