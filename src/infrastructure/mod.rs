//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like FFmpeg and the interview server.

pub mod capture;
pub mod config;
pub mod http;

// Re-export adapters
pub use capture::FfmpegCaptureDevice;
pub use config::XdgConfigStore;
pub use http::{HttpAnalysisBackend, HttpQuestionSource};
