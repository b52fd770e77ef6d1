//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod analysis;
pub mod capture;
pub mod config;
pub mod questions;
pub mod view;

// Re-export common types
pub use analysis::AnalysisBackend;
pub use capture::{CaptureConstraints, CaptureDevice, CaptureError, CaptureStream, SinkEvent};
pub use config::ConfigStore;
pub use questions::{QuestionError, QuestionSource};
pub use view::InterviewView;
