//! App runners for the stdio and MCP transports

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::BufReader;
use tracing::{debug, info};

use crate::application::ports::ConfigStore;
use crate::application::{Dispatcher, OperationRegistry};
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::infrastructure::{HttpVoiceGateway, XdgConfigStore};

use super::mcp_server::McpServer;
use super::presenter::Presenter;
use super::stdio_server::StdioServer;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment variables read at startup
pub const ENV_API_URL: &str = "API_URL";
pub const ENV_API_KEY: &str = "API_KEY";
pub const ENV_TIMEOUT: &str = "VOICE_IDENTIFY_TIMEOUT";

/// Serve line-delimited JSON-RPC on stdin/stdout
pub async fn run_stdio(config: AppConfig) -> ExitCode {
    let presenter = Presenter::new();

    let dispatcher = match build_dispatcher(&config) {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    info!("stdio server ready");
    let server = StdioServer::new(Arc::new(dispatcher));
    let stdin = BufReader::new(tokio::io::stdin());

    match server.run(stdin, tokio::io::stdout()).await {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Serve MCP on stdin/stdout
pub async fn run_mcp(config: AppConfig) -> ExitCode {
    let presenter = Presenter::new();

    let dispatcher = match build_dispatcher(&config) {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let max_concurrency = config.max_concurrency_or_default();
    info!(max_concurrency, "mcp server ready");
    let server = McpServer::new(Arc::new(dispatcher), max_concurrency);
    let stdin = BufReader::new(tokio::io::stdin());

    match server.run(stdin, tokio::io::stdout()).await {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Wire the HTTP gateway and the standard registry into a dispatcher.
///
/// Fails when the endpoint or credential is missing so the process stops
/// before reading any request.
pub fn build_dispatcher(config: &AppConfig) -> Result<Dispatcher, ConfigError> {
    let gateway_config = config.gateway_config()?;
    debug!(endpoint = gateway_config.endpoint(), "building gateway");

    let gateway = HttpVoiceGateway::new(gateway_config).map_err(|e| ConfigError::ValidationError {
        key: "api_url".to_string(),
        message: e.to_string(),
    })?;

    Ok(Dispatcher::new(
        Arc::new(OperationRegistry::standard()),
        Arc::new(gateway),
    ))
}

/// Config values taken from the environment
pub fn env_config() -> AppConfig {
    AppConfig {
        api_url: env_var(ENV_API_URL),
        api_key: env_var(ENV_API_KEY),
        timeout_secs: env_var(ENV_TIMEOUT).and_then(|s| s.parse().ok()),
        max_concurrency: None,
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            Presenter::new().warn(&format!("Ignoring config file: {}", e));
            AppConfig::empty()
        }
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config())
        .merge(cli_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_dispatcher_requires_endpoint() {
        let config = AppConfig {
            api_key: Some("k".to_string()),
            ..AppConfig::defaults()
        };
        assert!(matches!(
            build_dispatcher(&config),
            Err(ConfigError::MissingEndpoint)
        ));
    }

    #[test]
    fn build_dispatcher_requires_credential() {
        let config = AppConfig {
            api_url: Some("https://api.example/extract".to_string()),
            ..AppConfig::defaults()
        };
        assert!(matches!(
            build_dispatcher(&config),
            Err(ConfigError::MissingCredential)
        ));
    }

    #[test]
    fn build_dispatcher_registers_four_operations() {
        let config = AppConfig {
            api_url: Some("https://api.example/extract".to_string()),
            api_key: Some("k".to_string()),
            ..AppConfig::defaults()
        };
        let dispatcher = build_dispatcher(&config).unwrap();
        assert_eq!(dispatcher.registry().len(), 4);
    }
}
