//! Capture device port interfaces

use std::time::Duration as StdDuration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::error::InterviewError;
use crate::domain::recording::VideoContainer;

/// Capture errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("No capture device available: {0}")]
    DeviceUnavailable(String),

    #[error("Permission to use the capture device was denied: {0}")]
    PermissionDenied(String),

    #[error("ffmpeg not found. Please install FFmpeg.")]
    FfmpegNotFound,

    #[error("Capture stream is not open")]
    StreamClosed,

    #[error("Recording already in progress")]
    AlreadyRecording,

    #[error("No recording in progress")]
    NotRecording,

    #[error("Recording failed: {0}")]
    RecordingFailed(String),

    #[error("No data captured")]
    EmptyCapture,
}

impl From<CaptureError> for InterviewError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::EmptyCapture => InterviewError::EmptyCapture,
            other => InterviewError::DeviceUnavailable(other.to_string()),
        }
    }
}

/// What to ask the platform for when opening the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConstraints {
    pub width: u32,
    pub height: u32,
    pub audio: bool,
    pub container: VideoContainer,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            audio: true,
            container: VideoContainer::Mp4,
        }
    }
}

/// Event emitted by a running sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    /// One time slice of encoded media
    Data(Vec<u8>),
    /// The sink flushed its last bytes after a stop request
    Finalized,
    /// The sink died; no more data will follow
    Failed(String),
}

/// An open audio+video input stream with a recorder bound to it
#[async_trait]
pub trait CaptureStream: Send {
    /// Container the sink encodes into
    fn container(&self) -> VideoContainer;

    /// Start producing chunks roughly every `timeslice`.
    ///
    /// Data may keep arriving after `stop_sink` returns; the stream is done
    /// once [`SinkEvent::Finalized`] or [`SinkEvent::Failed`] is received.
    async fn start_sink(
        &mut self,
        timeslice: StdDuration,
    ) -> Result<mpsc::UnboundedReceiver<SinkEvent>, CaptureError>;

    /// Ask the sink to stop and flush
    async fn stop_sink(&mut self) -> Result<(), CaptureError>;

    /// Stop every underlying device track. Must be safe to call more than once.
    async fn stop_tracks(&mut self);
}

/// Port for acquiring a capture stream
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    type Stream: CaptureStream + 'static;

    /// Open the camera and microphone.
    ///
    /// # Arguments
    /// * `constraints` - Resolution, audio and container requirements
    ///
    /// # Returns
    /// An open stream whose sink is not yet running
    async fn open(&self, constraints: &CaptureConstraints) -> Result<Self::Stream, CaptureError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_constraints_are_vga_with_audio() {
        let c = CaptureConstraints::default();
        assert_eq!((c.width, c.height), (640, 480));
        assert!(c.audio);
        assert_eq!(c.container, VideoContainer::Mp4);
    }

    #[test]
    fn empty_capture_maps_to_its_own_kind() {
        assert_eq!(
            InterviewError::from(CaptureError::EmptyCapture),
            InterviewError::EmptyCapture
        );
    }

    #[test]
    fn device_errors_map_to_device_unavailable() {
        let err = InterviewError::from(CaptureError::FfmpegNotFound);
        assert!(matches!(err, InterviewError::DeviceUnavailable(msg) if msg.contains("ffmpeg")));
    }
}
