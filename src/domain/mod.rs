//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod analysis;
pub mod config;
pub mod error;
pub mod interview;
pub mod recording;

// Re-export common types
pub use analysis::{AnalysisReport, ResultView, UploadResult};
pub use config::AppConfig;
pub use error::*;
pub use interview::{InterviewSession, Layout, PhaseState, QuestionReply, TimerKind};
pub use recording::{Duration, MediaArtifact, VideoContainer};
