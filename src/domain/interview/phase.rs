//! Interview phases

use std::fmt;

/// Where the interview flow currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PhaseState {
    #[default]
    Idle,
    AwaitingQuestion,
    Preparing,
    Recording,
    Processing,
    AwaitingNext,
}

impl PhaseState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingQuestion => "awaiting question",
            Self::Preparing => "preparing",
            Self::Recording => "recording",
            Self::Processing => "processing",
            Self::AwaitingNext => "awaiting next",
        }
    }
}

impl fmt::Display for PhaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which countdown a phase timer drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Preparation,
    Recording,
}

impl TimerKind {
    /// Label shown next to the countdown
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Preparation => "Preparation time",
            Self::Recording => "Recording time",
        }
    }
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preparation => write!(f, "preparation"),
            Self::Recording => write!(f, "recording"),
        }
    }
}
