//! Main app runner for the interactive interview

use std::env;
use std::process::ExitCode;

use tracing::info;

use crate::application::ports::ConfigStore;
use crate::application::{CaptureManager, ControllerConfig, InterviewController};
use crate::domain::config::{is_valid_server_url, AppConfig, DeviceConfig};
use crate::domain::recording::Duration;
use crate::infrastructure::{
    FfmpegCaptureDevice, HttpAnalysisBackend, HttpQuestionSource, XdgConfigStore,
};

use super::args::{Cli, InterviewOptions};
use super::input::spawn_stdin_pump;
use super::presenter::{Presenter, TerminalView};
use super::signals::forward_shutdown_signals;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment variable overriding the configured server
pub const SERVER_URL_ENV: &str = "INTERVIEW_SERVER_URL";

/// Run interview sessions until the user quits
pub async fn run_interview(options: InterviewOptions) -> ExitCode {
    let presenter = Presenter::new();

    let device = FfmpegCaptureDevice::with_devices(
        options.video_device.as_deref(),
        options.audio_device.as_deref(),
    );
    let client = reqwest::Client::new();
    let questions = HttpQuestionSource::with_client(&options.server_url, client.clone());
    let backend = HttpAnalysisBackend::with_client(&options.server_url, client);

    let mut controller = InterviewController::new(
        CaptureManager::new(device),
        questions,
        backend,
        TerminalView::new(),
        ControllerConfig {
            preparation: options.preparation,
            recording: options.recording,
        },
    );

    if let Err(e) = forward_shutdown_signals(controller.sender()) {
        presenter.error(&format!("Failed to setup signal handler: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }
    if let Err(e) = spawn_stdin_pump(controller.sender()) {
        presenter.error(&format!("Failed to read keyboard input: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }

    info!(server = %options.server_url, "interview client ready");
    presenter.info(&format!(
        "Server: {} | preparation {} | recording {}",
        options.server_url,
        options.preparation.clock(),
        options.recording.clock()
    ));
    presenter.commands_help();

    controller.run().await;
    ExitCode::from(EXIT_SUCCESS)
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load_or_empty().await;

    let env_config = AppConfig {
        server_url: env::var(SERVER_URL_ENV).ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

/// Config layer built from command-line flags
pub fn cli_config(cli: &Cli) -> AppConfig {
    let devices = match (&cli.video_device, &cli.audio_device) {
        (None, None) => None,
        (video, audio) => Some(DeviceConfig {
            video: video.clone(),
            audio: audio.clone(),
        }),
    };

    AppConfig {
        server_url: cli.server.clone(),
        preparation: cli.prep.clone(),
        recording: cli.record.clone(),
        devices,
    }
}

/// Validate the merged config into runnable options.
///
/// Unlike the `*_or_default` accessors, a bad value here is an error, not a silent fallback.
pub fn resolve_options(config: &AppConfig) -> Result<InterviewOptions, String> {
    let server_url = config.server_url_or_default();
    if !is_valid_server_url(&server_url) {
        return Err(format!(
            "Invalid server URL: \"{}\". Expected http://host[:port] or https://host[:port]",
            server_url
        ));
    }

    let preparation = parse_window(config.preparation.as_deref(), "preparation")?
        .unwrap_or_else(Duration::default_preparation);
    let recording = parse_window(config.recording.as_deref(), "recording")?
        .unwrap_or_else(Duration::default_recording);

    Ok(InterviewOptions {
        server_url,
        preparation,
        recording,
        video_device: config.video_device().map(String::from),
        audio_device: config.audio_device().map(String::from),
    })
}

fn parse_window(value: Option<&str>, what: &str) -> Result<Option<Duration>, String> {
    value
        .map(|s| {
            s.parse::<Duration>()
                .map_err(|e| format!("Invalid {} time: {}", what, e))
        })
        .transpose()
}
