//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::recording::Duration;

/// Server the client talks to when nothing else is configured
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Capture device selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub video: Option<String>,
    pub audio: Option<String>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub server_url: Option<String>,
    pub preparation: Option<String>,
    pub recording: Option<String>,
    pub devices: Option<DeviceConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            server_url: Some(DEFAULT_SERVER_URL.to_string()),
            preparation: Some(Duration::default_preparation().to_string()),
            recording: Some(Duration::default_recording().to_string()),
            devices: None,
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
            server_url: other.server_url.or(self.server_url),
            preparation: other.preparation.or(self.preparation),
            recording: other.recording.or(self.recording),
            devices: Self::merge_devices(self.devices, other.devices),
        }
    }

    fn merge_devices(
        base: Option<DeviceConfig>,
        other: Option<DeviceConfig>,
    ) -> Option<DeviceConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(DeviceConfig {
                video: o.video.or(b.video),
                audio: o.audio.or(b.audio),
            }),
        }
    }

    /// Get server URL without a trailing slash, or the default
    pub fn server_url_or_default(&self) -> String {
        self.server_url
            .as_deref()
            .unwrap_or(DEFAULT_SERVER_URL)
            .trim_end_matches('/')
            .to_string()
    }

    /// Get preparation window, or default if not set/invalid
    pub fn preparation_or_default(&self) -> Duration {
        self.preparation
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_preparation)
    }

    /// Get recording window, or default if not set/invalid
    pub fn recording_or_default(&self) -> Duration {
        self.recording
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_recording)
    }

    /// Configured video input, if any
    pub fn video_device(&self) -> Option<&str> {
        self.devices.as_ref().and_then(|d| d.video.as_deref())
    }

    /// Configured audio input, if any
    pub fn audio_device(&self) -> Option<&str> {
        self.devices.as_ref().and_then(|d| d.audio.as_deref())
    }
}

/// Check that a server URL is usable
pub fn is_valid_server_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));
    matches!(rest, Some(host) if !host.is_empty() && !host.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.server_url, Some(DEFAULT_SERVER_URL.to_string()));
        assert_eq!(config.preparation, Some("20s".to_string()));
        assert_eq!(config.recording, Some("30s".to_string()));
        assert!(config.devices.is_none());
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.server_url.is_none());
        assert!(config.preparation.is_none());
        assert!(config.recording.is_none());
        assert!(config.devices.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            server_url: Some("http://base".to_string()),
            preparation: Some("10s".to_string()),
            ..Default::default()
        };
        let other = AppConfig {
            server_url: Some("http://other".to_string()),
            preparation: None,
            recording: Some("45s".to_string()),
            ..Default::default()
        };

        let merged = base.merge(other);
        assert_eq!(merged.server_url, Some("http://other".to_string()));
        assert_eq!(merged.preparation, Some("10s".to_string()));
        assert_eq!(merged.recording, Some("45s".to_string()));
    }

    #[test]
    fn merge_devices_field_by_field() {
        let base = AppConfig {
            devices: Some(DeviceConfig {
                video: Some("/dev/video0".to_string()),
                audio: Some("default".to_string()),
            }),
            ..Default::default()
        };
        let other = AppConfig {
            devices: Some(DeviceConfig {
                video: Some("/dev/video2".to_string()),
                audio: None,
            }),
            ..Default::default()
        };

        let merged = base.merge(other);
        assert_eq!(merged.video_device(), Some("/dev/video2"));
        assert_eq!(merged.audio_device(), Some("default"));
    }

    #[test]
    fn invalid_durations_fall_back_to_defaults() {
        let config = AppConfig {
            preparation: Some("soon".to_string()),
            recording: Some("1m".to_string()),
            ..Default::default()
        };
        assert_eq!(config.preparation_or_default(), Duration::default_preparation());
        assert_eq!(config.recording_or_default().as_secs(), 60);
    }

    #[test]
    fn server_url_trailing_slash_trimmed() {
        let config = AppConfig {
            server_url: Some("http://localhost:5000/".to_string()),
            ..Default::default()
        };
        assert_eq!(config.server_url_or_default(), "http://localhost:5000");
        assert_eq!(AppConfig::empty().server_url_or_default(), DEFAULT_SERVER_URL);
    }

    #[test]
    fn server_url_validation() {
        assert!(is_valid_server_url("http://localhost:5000"));
        assert!(is_valid_server_url("https://coach.example.com"));
        assert!(!is_valid_server_url("localhost:5000"));
        assert!(!is_valid_server_url("http://"));
        assert!(!is_valid_server_url("ftp://example.com"));
    }
}
