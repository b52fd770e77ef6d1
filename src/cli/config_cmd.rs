//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{is_valid_server_url, AppConfig, DeviceConfig};
use crate::domain::error::ConfigError;
use crate::domain::recording::Duration;

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
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;
    validate_config_value(key, value)?;

    let mut config = store.load().await?;
    set_value(&mut config, key, value);
    store.save(&config).await?;

    presenter.success(&format!("{} = {}", key, value));
    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    presenter.output(get_value(&config, key).unwrap_or(NOT_SET));
    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        presenter.key_value(key, get_value(&config, key).unwrap_or(NOT_SET));
    }
    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

/// Store a validated value under `key`
fn set_value(config: &mut AppConfig, key: &str, value: &str) {
    let value = Some(value.to_string());
    match key {
        "server_url" => config.server_url = value,
        "preparation" => config.preparation = value,
        "recording" => config.recording = value,
        "devices.video" => config.devices.get_or_insert_with(DeviceConfig::default).video = value,
        "devices.audio" => config.devices.get_or_insert_with(DeviceConfig::default).audio = value,
        _ => {}
    }
}

fn get_value<'a>(config: &'a AppConfig, key: &str) -> Option<&'a str> {
    match key {
        "server_url" => config.server_url.as_deref(),
        "preparation" => config.preparation.as_deref(),
        "recording" => config.recording.as_deref(),
        "devices.video" => config.video_device(),
        "devices.audio" => config.audio_device(),
        _ => None,
    }
}

/// Validate a config value based on key type
fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "preparation" | "recording" => {
            value
                .parse::<Duration>()
                .map_err(|e| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
        }
        "server_url" => {
            if !is_valid_server_url(value) {
                return Err(ConfigError::ValidationError {
                    key: key.to_string(),
                    message: "Value must be an http:// or https:// URL".to_string(),
                });
            }
        }
        _ => {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    key: key.to_string(),
                    message: "Value must not be empty".to_string(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_durations() {
        assert!(validate_config_value("preparation", "20s").is_ok());
        assert!(validate_config_value("recording", "1m30s").is_ok());
        assert!(validate_config_value("recording", "forever").is_err());
        assert!(validate_config_value("preparation", "0s").is_err());
    }

    #[test]
    fn validate_server_url() {
        assert!(validate_config_value("server_url", "http://127.0.0.1:5000").is_ok());
        assert!(validate_config_value("server_url", "https://coach.example.com/").is_ok());
        assert!(validate_config_value("server_url", "ftp://example.com").is_err());
        assert!(validate_config_value("server_url", "http://").is_err());
    }

    #[test]
    fn validate_device_not_empty() {
        assert!(validate_config_value("devices.video", "/dev/video1").is_ok());
        assert!(validate_config_value("devices.audio", " ").is_err());
    }

    #[test]
    fn set_and_get_nested_device_keys() {
        let mut config = AppConfig::empty();
        set_value(&mut config, "devices.audio", "usb_mic");

        assert_eq!(get_value(&config, "devices.audio"), Some("usb_mic"));
        assert_eq!(get_value(&config, "devices.video"), None);

        set_value(&mut config, "devices.video", "/dev/video3");
        assert_eq!(get_value(&config, "devices.audio"), Some("usb_mic"));
        assert_eq!(get_value(&config, "devices.video"), Some("/dev/video3"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = check_key("api_key").unwrap_err();
        assert!(err.to_string().contains("Valid keys"));
    }
}
