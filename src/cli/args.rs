//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

use crate::domain::recording::Duration;

/// Interview Coach - timed mock interviews with recorded answers and scoring
#[derive(Parser, Debug)]
#[command(name = "interview-coach")]
#[command(version)]
#[command(about = "Practice interview answers: prepare, record, and get them scored")]
#[command(long_about = None)]
pub struct Cli {
    /// Interview server base URL
    #[arg(short = 's', long, value_name = "URL")]
    pub server: Option<String>,

    /// Preparation window before recording (e.g., 20s, 1m)
    #[arg(short = 'p', long, value_name = "TIME")]
    pub prep: Option<String>,

    /// Recording window (e.g., 30s, 1m30s)
    #[arg(short = 'r', long, value_name = "TIME")]
    pub record: Option<String>,

    /// Camera input (Linux: /dev/videoN, macOS: avfoundation index)
    #[arg(long, value_name = "DEVICE")]
    pub video_device: Option<String>,

    /// Microphone input (Linux: PulseAudio source, macOS: avfoundation index)
    #[arg(long, value_name = "DEVICE")]
    pub audio_device: Option<String>,

    /// Verbose logging to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
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

/// Parsed interview options
#[derive(Debug, Clone)]
pub struct InterviewOptions {
    pub server_url: String,
    pub preparation: Duration,
    pub recording: Duration,
    pub video_device: Option<String>,
    pub audio_device: Option<String>,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "server_url",
    "preparation",
    "recording",
    "devices.video",
    "devices.audio",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
