//! Interview session state machine

use thiserror::Error;

use super::phase::PhaseState;

/// Error when an invalid phase transition is attempted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid phase transition: cannot {action} while {current_state}")]
pub struct InvalidPhaseTransition {
    pub current_state: PhaseState,
    pub action: String,
}

/// Interview session entity.
/// Owns the phase and the question being answered.
///
/// State machine:
///   IDLE | AWAITING_NEXT -> AWAITING_QUESTION (request_question)
///   AWAITING_QUESTION -> PREPARING (question_received)
///   AWAITING_QUESTION -> IDLE (questions_exhausted)
///   PREPARING -> RECORDING (start_recording)
///   RECORDING -> PROCESSING (start_processing)
///   PROCESSING -> AWAITING_NEXT (complete_processing)
///   any -> IDLE (abort)
#[derive(Debug)]
pub struct InterviewSession {
    phase: PhaseState,
    current_question: Option<String>,
    has_more_questions: bool,
}

impl InterviewSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self {
            phase: PhaseState::Idle,
            current_question: None,
            has_more_questions: true,
        }
    }

    /// Get the current phase
    pub fn phase(&self) -> PhaseState {
        self.phase
    }

    /// The question currently shown, if any
    pub fn current_question(&self) -> Option<&str> {
        self.current_question.as_deref()
    }

    /// False once the question source reported exhaustion
    pub fn has_more_questions(&self) -> bool {
        self.has_more_questions
    }

    pub fn is_idle(&self) -> bool {
        self.phase == PhaseState::Idle
    }

    fn guard(&self, allowed: &[PhaseState], action: &str) -> Result<(), InvalidPhaseTransition> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(InvalidPhaseTransition {
                current_state: self.phase,
                action: action.to_string(),
            })
        }
    }

    /// Transition from IDLE or AWAITING_NEXT to AWAITING_QUESTION
    pub fn request_question(&mut self) -> Result<(), InvalidPhaseTransition> {
        self.guard(
            &[PhaseState::Idle, PhaseState::AwaitingNext],
            "request a question",
        )?;
        if self.phase == PhaseState::Idle {
            self.has_more_questions = true;
        }
        self.phase = PhaseState::AwaitingQuestion;
        Ok(())
    }

    /// Transition from AWAITING_QUESTION to PREPARING
    pub fn question_received(
        &mut self,
        question: impl Into<String>,
    ) -> Result<(), InvalidPhaseTransition> {
        self.guard(&[PhaseState::AwaitingQuestion], "accept a question")?;
        self.current_question = Some(question.into());
        self.phase = PhaseState::Preparing;
        Ok(())
    }

    /// Transition from AWAITING_QUESTION to IDLE
    pub fn questions_exhausted(&mut self) -> Result<(), InvalidPhaseTransition> {
        self.guard(&[PhaseState::AwaitingQuestion], "finish the question set")?;
        self.has_more_questions = false;
        self.current_question = None;
        self.phase = PhaseState::Idle;
        Ok(())
    }

    /// Transition from PREPARING to RECORDING
    pub fn start_recording(&mut self) -> Result<(), InvalidPhaseTransition> {
        self.guard(&[PhaseState::Preparing], "start recording")?;
        self.phase = PhaseState::Recording;
        Ok(())
    }

    /// Transition from RECORDING to PROCESSING
    pub fn start_processing(&mut self) -> Result<(), InvalidPhaseTransition> {
        self.guard(&[PhaseState::Recording], "start processing")?;
        self.phase = PhaseState::Processing;
        Ok(())
    }

    /// Transition from PROCESSING to AWAITING_NEXT
    pub fn complete_processing(&mut self) -> Result<(), InvalidPhaseTransition> {
        self.guard(&[PhaseState::Processing], "complete processing")?;
        self.phase = PhaseState::AwaitingNext;
        Ok(())
    }

    /// Drop the current attempt and return to IDLE. Always allowed.
    pub fn abort(&mut self) {
        self.current_question = None;
        self.phase = PhaseState::Idle;
    }
}

impl Default for InterviewSession {
    fn default() -> Self {
        Self::new()
    }
}
