//! FFmpeg-based camera and microphone capture adapter
//!
//! FFmpeg writes fragmented MP4 to stdout; a reader task slices the byte
//! stream into one chunk per time slice. Fragmented output stays playable
//! even if the process is killed before it can write a trailer.

use std::process::Stdio;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::application::ports::{
    CaptureConstraints, CaptureDevice, CaptureError, CaptureStream, SinkEvent,
};
use crate::domain::recording::VideoContainer;

const READ_BUFFER_SIZE: usize = 64 * 1024;

#[cfg(target_os = "linux")]
const DEFAULT_VIDEO_DEVICE: &str = "/dev/video0";
#[cfg(target_os = "linux")]
const DEFAULT_AUDIO_DEVICE: &str = "default";

#[cfg(target_os = "macos")]
const DEFAULT_VIDEO_DEVICE: &str = "0";
#[cfg(target_os = "macos")]
const DEFAULT_AUDIO_DEVICE: &str = "0";

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
const DEFAULT_VIDEO_DEVICE: &str = "";
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
const DEFAULT_AUDIO_DEVICE: &str = "";

/// Camera + microphone through an FFmpeg child process
#[derive(Debug, Clone)]
pub struct FfmpegCaptureDevice {
    video: String,
    audio: String,
}

impl FfmpegCaptureDevice {
    /// Use the platform's default camera and microphone
    pub fn new() -> Self {
        Self::with_devices(None, None)
    }

    /// Override either input; `None` keeps the platform default
    pub fn with_devices(video: Option<&str>, audio: Option<&str>) -> Self {
        Self {
            video: video.unwrap_or(DEFAULT_VIDEO_DEVICE).to_string(),
            audio: audio.unwrap_or(DEFAULT_AUDIO_DEVICE).to_string(),
        }
    }

    pub fn video(&self) -> &str {
        &self.video
    }

    pub fn audio(&self) -> &str {
        &self.audio
    }

    /// Platform input arguments
    #[cfg(target_os = "linux")]
    fn input_args(&self, constraints: &CaptureConstraints) -> Result<Vec<String>, CaptureError> {
        let mut args = vec![
            "-f".to_string(),
            "v4l2".to_string(),
            "-video_size".to_string(),
            format!("{}x{}", constraints.width, constraints.height),
            "-i".to_string(),
            self.video.clone(),
        ];
        if constraints.audio {
            args.extend([
                "-f".to_string(),
                "pulse".to_string(),
                "-i".to_string(),
                self.audio.clone(),
            ]);
        }
        Ok(args)
    }

    #[cfg(target_os = "macos")]
    fn input_args(&self, constraints: &CaptureConstraints) -> Result<Vec<String>, CaptureError> {
        // avfoundation takes "video:audio" device indices in one input
        let input = if constraints.audio {
            format!("{}:{}", self.video, self.audio)
        } else {
            format!("{}:none", self.video)
        };
        Ok(vec![
            "-f".to_string(),
            "avfoundation".to_string(),
            "-framerate".to_string(),
            "30".to_string(),
            "-video_size".to_string(),
            format!("{}x{}", constraints.width, constraints.height),
            "-i".to_string(),
            input,
        ])
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    fn input_args(&self, _constraints: &CaptureConstraints) -> Result<Vec<String>, CaptureError> {
        Err(CaptureError::DeviceUnavailable(
            "camera capture is not supported on this platform".to_string(),
        ))
    }

    /// Build the full FFmpeg command line
    fn build_ffmpeg_args(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Vec<String>, CaptureError> {
        let mut args = vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-nostdin".to_string(),
        ];
        args.extend(self.input_args(constraints)?);
        args.extend(output_args(constraints));
        Ok(args)
    }

    /// Fail early if the configured camera node does not exist
    async fn check_video_node(&self) -> Result<(), CaptureError> {
        if !self.video.starts_with("/dev/") {
            return Ok(());
        }
        match tokio::fs::metadata(&self.video).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                Err(CaptureError::PermissionDenied(self.video.clone()))
            }
            Err(_) => Err(CaptureError::DeviceUnavailable(format!(
                "{} not found",
                self.video
            ))),
        }
    }
}

impl Default for FfmpegCaptureDevice {
    fn default() -> Self {
        Self::new()
    }
}

/// Encoder and muxer arguments for the requested container
fn output_args(constraints: &CaptureConstraints) -> Vec<String> {
    let container = constraints.container;
    let mut args: Vec<String> = match container {
        VideoContainer::Mp4 => [
            "-c:v", "libx264", "-preset", "ultrafast", "-tune", "zerolatency", "-pix_fmt", "yuv420p",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        VideoContainer::Webm => ["-c:v", "libvpx", "-deadline", "realtime"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    };

    if constraints.audio {
        let codec = match container {
            VideoContainer::Mp4 => "aac",
            VideoContainer::Webm => "libopus",
        };
        args.extend(["-c:a".to_string(), codec.to_string()]);
    }

    if container == VideoContainer::Mp4 {
        args.extend([
            "-movflags".to_string(),
            "frag_keyframe+empty_moov+default_base_moof".to_string(),
        ]);
    }

    args.extend([
        "-f".to_string(),
        container.muxer().to_string(),
        "pipe:1".to_string(),
    ]);
    args
}

/// Make sure an `ffmpeg` binary can be launched
async fn probe_ffmpeg() -> Result<(), CaptureError> {
    let status = Command::new("ffmpeg")
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CaptureError::FfmpegNotFound
            } else {
                CaptureError::DeviceUnavailable(e.to_string())
            }
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(CaptureError::FfmpegNotFound)
    }
}

#[async_trait]
impl CaptureDevice for FfmpegCaptureDevice {
    type Stream = FfmpegStream;

    async fn open(&self, constraints: &CaptureConstraints) -> Result<FfmpegStream, CaptureError> {
        probe_ffmpeg().await?;
        self.check_video_node().await?;
        let args = self.build_ffmpeg_args(constraints)?;
        debug!(video = %self.video, audio = %self.audio, "capture inputs ready");

        Ok(FfmpegStream {
            args,
            container: constraints.container,
            child: None,
            reader: None,
        })
    }
}

/// Inputs checked and ready; FFmpeg runs only while the sink is started
pub struct FfmpegStream {
    args: Vec<String>,
    container: VideoContainer,
    child: Option<Child>,
    reader: Option<JoinHandle<()>>,
}

impl FfmpegStream {
    fn spawn_ffmpeg(&self) -> Result<Child, CaptureError> {
        Command::new("ffmpeg")
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CaptureError::FfmpegNotFound
                } else {
                    CaptureError::RecordingFailed(e.to_string())
                }
            })
    }

    /// Ask FFmpeg to flush and exit
    #[cfg(unix)]
    fn interrupt(child: &mut Child) -> Result<(), CaptureError> {
        use nix::sys::signal::{self, Signal};
        use nix::unistd::Pid;

        if let Some(id) = child.id() {
            signal::kill(Pid::from_raw(id as i32), Signal::SIGINT)
                .map_err(|e| CaptureError::RecordingFailed(format!("Signal failed: {}", e)))?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn interrupt(child: &mut Child) -> Result<(), CaptureError> {
        child
            .start_kill()
            .map_err(|e| CaptureError::RecordingFailed(e.to_string()))
    }
}

#[async_trait]
impl CaptureStream for FfmpegStream {
    fn container(&self) -> VideoContainer {
        self.container
    }

    async fn start_sink(
        &mut self,
        timeslice: StdDuration,
    ) -> Result<mpsc::UnboundedReceiver<SinkEvent>, CaptureError> {
        if self.child.is_some() {
            return Err(CaptureError::AlreadyRecording);
        }

        let mut child = self.spawn_ffmpeg()?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| CaptureError::RecordingFailed("FFmpeg stdout unavailable".into()))?;
        let stderr = child.stderr.take();

        let (tx, rx) = mpsc::unbounded_channel();
        self.reader = Some(tokio::spawn(pump_chunks(stdout, stderr, timeslice, tx)));
        self.child = Some(child);
        Ok(rx)
    }

    async fn stop_sink(&mut self) -> Result<(), CaptureError> {
        let child = self.child.as_mut().ok_or(CaptureError::NotRecording)?;
        Self::interrupt(child)
    }

    async fn stop_tracks(&mut self) {
        if let Some(mut child) = self.child.take() {
            if matches!(child.try_wait(), Ok(None)) {
                let _ = child.start_kill();
            }
            if let Err(e) = child.wait().await {
                warn!(error = %e, "failed to reap ffmpeg");
            }
        }
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}

/// Read FFmpeg output and emit one `Data` event per time slice, then `Finalized` at EOF
async fn pump_chunks<R, E>(
    mut stdout: R,
    stderr: Option<E>,
    timeslice: StdDuration,
    tx: mpsc::UnboundedSender<SinkEvent>,
) where
    R: AsyncRead + Unpin,
    E: AsyncRead + Unpin + Send + 'static,
{
    let diagnostics = stderr.map(|stderr| tokio::spawn(last_stderr_line(stderr)));

    let mut ticker = interval_at(Instant::now() + timeslice, timeslice);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut pending = Vec::new();
    let mut total = 0usize;
    let mut buf = vec![0u8; READ_BUFFER_SIZE];

    loop {
        tokio::select! {
            read = stdout.read(&mut buf) => match read {
                Ok(0) => break,
                Ok(n) => {
                    total += n;
                    pending.extend_from_slice(&buf[..n]);
                }
                Err(e) => {
                    if !pending.is_empty() {
                        let _ = tx.send(SinkEvent::Data(std::mem::take(&mut pending)));
                    }
                    let _ = tx.send(SinkEvent::Failed(e.to_string()));
                    return;
                }
            },
            _ = ticker.tick() => {
                if !pending.is_empty() {
                    let _ = tx.send(SinkEvent::Data(std::mem::take(&mut pending)));
                }
            }
        }
    }

    if !pending.is_empty() {
        let _ = tx.send(SinkEvent::Data(pending));
    }

    let last_line = match diagnostics {
        Some(task) => task.await.ok().flatten(),
        None => None,
    };

    match (total, last_line) {
        (0, Some(line)) => {
            let _ = tx.send(SinkEvent::Failed(format!("FFmpeg exited with error: {}", line)));
        }
        _ => {
            debug!(bytes = total, "ffmpeg output finished");
            let _ = tx.send(SinkEvent::Finalized);
        }
    }
}

/// Drain stderr so FFmpeg never blocks on it, keeping the last non-empty line
async fn last_stderr_line<E: AsyncRead + Unpin>(stderr: E) -> Option<String> {
    let mut lines = BufReader::new(stderr).lines();
    let mut last = None;
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim().to_string();
        if !line.is_empty() {
            last = Some(line);
        }
    }
    last
}
