//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>s, <number>m, or <number>m<number>s (e.g., 20s, 1m, 1m30s)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}

/// User-facing failures of one interview attempt.
///
/// Each variant maps to one visible error message in the result area.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterviewError {
    /// Permission denied, no hardware, or no capture backend
    #[error("Unable to access camera. Please ensure you have given permission and try again. ({0})")]
    DeviceUnavailable(String),

    /// The recorder finalized without producing any bytes
    #[error("Recording failed: No data captured.")]
    EmptyCapture,

    /// Network failure talking to the interview server
    #[error("{0}")]
    TransportFailure(String),

    /// The analysis backend answered with an error
    #[error("{0}")]
    UploadRejected(String),

    /// Response body was not in any shape we can display
    #[error("Unexpected response from server: {0}")]
    MalformedResponse(String),
}
