//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => {
            presenter.output(&store.path().display().to_string());
            Ok(())
        }
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    presenter.info(
        "Set the endpoint and key with 'config set api_url <url>' and 'config set api_key <key>'",
    );
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    ensure_known_key(key)?;

    let mut config = store.load().await?;
    apply_config_value(&mut config, key, value)?;
    store.save(&config).await?;

    let shown = if key == "api_key" {
        mask_api_key(value)
    } else {
        value.to_string()
    };
    presenter.success(&format!("{} = {}", key, shown));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    ensure_known_key(key)?;

    let config = store.load().await?;
    presenter.output(&display_value(&config, key).unwrap_or_else(|| NOT_SET.to_string()));

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        presenter.key_value(
            key,
            &display_value(&config, key).unwrap_or_else(|| NOT_SET.to_string()),
        );
    }

    Ok(())
}

fn ensure_known_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

/// Validate `value` for `key` and store it in `config`
fn apply_config_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: &str| ConfigError::ValidationError {
        key: key.to_string(),
        message: message.to_string(),
    };

    match key {
        "api_url" => {
            let value = value.trim();
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(invalid("Value must be an http:// or https:// URL"));
            }
            config.api_url = Some(value.to_string());
        }
        "api_key" => {
            if value.trim().is_empty() {
                return Err(invalid("Value must not be empty"));
            }
            config.api_key = Some(value.trim().to_string());
        }
        "timeout_secs" => {
            let secs = parse_positive(value)
                .ok_or_else(|| invalid("Value must be a positive number of seconds"))?;
            config.timeout_secs = Some(secs);
        }
        "max_concurrency" => {
            let n = parse_positive(value)
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| invalid("Value must be a positive integer"))?;
            config.max_concurrency = Some(n);
        }
        _ => return Err(invalid("Unknown key")),
    }
    Ok(())
}

fn parse_positive(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().filter(|n| *n > 0)
}

fn display_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "api_url" => config.api_url.clone(),
        "api_key" => config.api_key.as_deref().map(mask_api_key),
        "timeout_secs" => config.timeout_secs.map(|n| n.to_string()),
        "max_concurrency" => config.max_concurrency.map(|n| n.to_string()),
        _ => None,
    }
}

/// Mask API key for display (show first 4 and last 4 chars)
fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_api_key_long() {
        assert_eq!(mask_api_key("abcdefghijklmnop"), "abcd...mnop");
    }

    #[test]
    fn mask_api_key_short() {
        assert_eq!(mask_api_key("short"), "*****");
    }

    #[test]
    fn api_url_must_be_http() {
        let mut config = AppConfig::empty();
        assert!(apply_config_value(&mut config, "api_url", "ftp://x").is_err());
        apply_config_value(&mut config, "api_url", "https://api.example/x").unwrap();
        assert_eq!(config.api_url, Some("https://api.example/x".to_string()));
    }

    #[test]
    fn numeric_keys_are_validated() {
        let mut config = AppConfig::empty();
        assert!(apply_config_value(&mut config, "timeout_secs", "soon").is_err());
        assert!(apply_config_value(&mut config, "timeout_secs", "0").is_err());
        apply_config_value(&mut config, "timeout_secs", "45").unwrap();
        apply_config_value(&mut config, "max_concurrency", "2").unwrap();
        assert_eq!(config.timeout_secs, Some(45));
        assert_eq!(config.max_concurrency, Some(2));
    }

    #[test]
    fn max_concurrency_rejects_out_of_range() {
        let mut config = AppConfig::empty();
        assert!(apply_config_value(&mut config, "max_concurrency", "0").is_err());
        assert!(apply_config_value(&mut config, "max_concurrency", "-3").is_err());
        let huge = "99999999999999999999";
        assert!(apply_config_value(&mut config, "max_concurrency", huge).is_err());
        assert!(config.max_concurrency.is_none());
    }

    #[test]
    fn display_masks_key() {
        let config = AppConfig {
            api_key: Some("833_txLiSbJibu160317".to_string()),
            ..Default::default()
        };
        assert_eq!(display_value(&config, "api_key").unwrap(), "833_...0317");
        assert!(display_value(&config, "api_url").is_none());
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(matches!(
            ensure_known_key("duration"),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}
