//! Capture infrastructure module
//!
//! Camera and microphone capture through FFmpeg, producing fragmented MP4.

mod ffmpeg;

pub use ffmpeg::{FfmpegCaptureDevice, FfmpegStream};
