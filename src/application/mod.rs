//! Application layer - Use cases and port interfaces
//!
//! Contains the interview controller and the pieces it drives,
//! plus trait definitions for external system interactions.

pub mod capture;
pub mod controller;
pub mod ports;
pub mod session;
pub mod timer;
pub mod upload;

pub use capture::{CaptureHandle, CaptureManager, CHUNK_TIMESLICE, FINALIZE_GRACE};
pub use controller::{ControllerConfig, ControllerEvent, InterviewController};
pub use session::Session;
pub use timer::{PhaseTimer, Tick, TimerHandle, TimerId};
pub use upload::UploadPipeline;
