//! Everything one interview attempt owns

use crate::domain::error::InterviewError;
use crate::domain::interview::{InterviewSession, PhaseState};

use super::capture::CaptureHandle;
use super::ports::CaptureStream;
use super::timer::PhaseTimer;

/// Mutable state of the running interview.
///
/// The controller is the only owner; nothing here is shared.
pub struct Session<S: CaptureStream> {
    pub(crate) state: InterviewSession,
    pub(crate) capture: Option<CaptureHandle<S>>,
    pub(crate) timer: PhaseTimer,
    pub(crate) last_error: Option<InterviewError>,
}

impl<S: CaptureStream> Session<S> {
    pub fn new() -> Self {
        Self {
            state: InterviewSession::new(),
            capture: None,
            timer: PhaseTimer::new(),
            last_error: None,
        }
    }

    pub fn phase(&self) -> PhaseState {
        self.state.phase()
    }

    pub fn current_question(&self) -> Option<&str> {
        self.state.current_question()
    }

    pub fn has_more_questions(&self) -> bool {
        self.state.has_more_questions()
    }

    /// A capture stream is held and not yet released
    pub fn has_device(&self) -> bool {
        self.capture.as_ref().is_some_and(CaptureHandle::is_open)
    }

    /// The sink is running
    pub fn is_recording(&self) -> bool {
        self.capture.as_ref().is_some_and(CaptureHandle::is_recording)
    }

    pub fn timer_active(&self) -> bool {
        self.timer.is_active()
    }

    /// Error that ended the last attempt, cleared when a new question is requested
    pub fn last_error(&self) -> Option<&InterviewError> {
        self.last_error.as_ref()
    }
}

impl<S: CaptureStream> Default for Session<S> {
    fn default() -> Self {
        Self::new()
    }
}
