//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

use crate::domain::config::AppConfig;

/// voice-identify - voice recognition and text extraction service
#[derive(Parser, Debug)]
#[command(name = "voice-identify")]
#[command(version)]
#[command(about = "Voice recognition and text extraction over stdio JSON-RPC or MCP")]
#[command(long_about = None)]
pub struct Cli {
    /// Transcription API endpoint URL
    #[arg(long, value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// API key sent as a bearer token
    #[arg(long, value_name = "KEY", global = true)]
    pub api_key: Option<String>,

    /// Backend request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Increase log verbosity on stderr (-v info, -vv debug)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Config values given on the command line
    pub fn to_config(&self) -> AppConfig {
        AppConfig {
            api_url: self.api_url.clone(),
            api_key: self.api_key.clone(),
            timeout_secs: self.timeout,
            max_concurrency: match &self.command {
                Some(Commands::Mcp { max_concurrency }) => *max_concurrency,
                _ => None,
            },
        }
    }
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve line-delimited JSON-RPC on stdin/stdout (default)
    Stdio,
    /// Serve the Model Context Protocol on stdin/stdout
    Mcp {
        /// Requests handled at once
        #[arg(long, value_name = "N")]
        max_concurrency: Option<usize>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["api_url", "api_key", "timeout_secs", "max_concurrency"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["voice-identify"]);
        assert!(cli.api_url.is_none());
        assert!(cli.api_key.is_none());
        assert!(cli.timeout.is_none());
        assert_eq!(cli.verbose, 0);
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_parses_stdio_with_overrides() {
        let cli = Cli::parse_from([
            "voice-identify",
            "stdio",
            "--api-url",
            "https://api.example/extract",
            "--api-key",
            "k",
            "--timeout",
            "30",
        ]);
        assert!(matches!(cli.command, Some(Commands::Stdio)));
        let config = cli.to_config();
        assert_eq!(config.api_url, Some("https://api.example/extract".to_string()));
        assert_eq!(config.api_key, Some("k".to_string()));
        assert_eq!(config.timeout_secs, Some(30));
    }

    #[test]
    fn cli_parses_mcp_concurrency() {
        let cli = Cli::parse_from(["voice-identify", "-vv", "mcp", "--max-concurrency", "8"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.to_config().max_concurrency, Some(8));
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["voice-identify", "config", "set", "api_url", "https://x"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "api_url");
            assert_eq!(value, "https://x");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("api_url"));
        assert!(is_valid_config_key("api_key"));
        assert!(is_valid_config_key("timeout_secs"));
        assert!(!is_valid_config_key("duration"));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
