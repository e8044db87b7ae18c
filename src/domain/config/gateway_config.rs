//! Validated backend gateway configuration

use std::fmt;
use std::time::Duration;

use crate::domain::error::ConfigError;

/// Default backend request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Immutable endpoint and credential for the transcription backend.
/// Can only be built with a non-blank endpoint and credential.
#[derive(Clone)]
pub struct GatewayConfig {
    endpoint: String,
    credential: String,
    timeout: Duration,
}

impl GatewayConfig {
    pub fn new(
        endpoint: impl Into<String>,
        credential: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let endpoint = endpoint.into().trim().to_string();
        let credential = credential.into().trim().to_string();

        if endpoint.is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }
        if credential.is_empty() {
            return Err(ConfigError::MissingCredential);
        }

        Ok(Self {
            endpoint,
            credential,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Override the request timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

// Keep the credential out of logs
impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("endpoint", &self.endpoint)
            .field("credential", &"***")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_endpoint() {
        assert!(matches!(
            GatewayConfig::new("", "key"),
            Err(ConfigError::MissingEndpoint)
        ));
    }

    #[test]
    fn rejects_empty_credential() {
        assert!(matches!(
            GatewayConfig::new("https://api.example", ""),
            Err(ConfigError::MissingCredential)
        ));
    }

    #[test]
    fn trims_values() {
        let config = GatewayConfig::new(" https://api.example ", " key ").unwrap();
        assert_eq!(config.endpoint(), "https://api.example");
        assert_eq!(config.credential(), "key");
        assert_eq!(config.timeout().as_secs(), DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn debug_masks_credential() {
        let config = GatewayConfig::new("https://api.example", "secret-key").unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("https://api.example"));
    }
}
