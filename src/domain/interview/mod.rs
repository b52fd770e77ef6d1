//! Interview domain module

mod layout;
mod phase;
mod session;

pub use layout::{Layout, Section};
pub use phase::{PhaseState, TimerKind};
pub use session::{InterviewSession, InvalidPhaseTransition};

/// Signal text the question source sends when the set is used up
pub const QUESTIONS_EXHAUSTED_MESSAGE: &str = "All questions have been asked.";

/// One answer from the question source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionReply {
    Question(String),
    Exhausted,
}
