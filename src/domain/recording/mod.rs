//! Recording domain module

mod artifact;
mod duration;

pub use artifact::{MediaArtifact, VideoContainer};
pub use duration::{format_clock, Duration, DEFAULT_PREPARATION_SECS, DEFAULT_RECORDING_SECS};
