//! Question source port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::interview::QuestionReply;

/// Question source errors
#[derive(Debug, Clone, Error)]
pub enum QuestionError {
    #[error("Question request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse question response: {0}")]
    ParseError(String),
}

/// Port for fetching interview questions
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch the next question.
    ///
    /// # Returns
    /// The question text, or [`QuestionReply::Exhausted`] once the set is used up
    async fn next_question(&self) -> Result<QuestionReply, QuestionError>;
}
