//! Question source adapter (`GET /get_question`)

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::application::ports::{QuestionError, QuestionSource};
use crate::domain::interview::{QuestionReply, QUESTIONS_EXHAUSTED_MESSAGE};

use super::endpoint;

#[derive(Debug, Deserialize)]
struct QuestionResponse {
    question: Option<String>,
    message: Option<String>,
}

/// Fetches questions from the interview server
pub struct HttpQuestionSource {
    url: String,
    client: reqwest::Client,
}

impl HttpQuestionSource {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Share a client with other adapters
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            url: endpoint(base_url, "get_question"),
            client,
        }
    }

    fn interpret(response: QuestionResponse) -> Result<QuestionReply, QuestionError> {
        if response
            .message
            .as_deref()
            .is_some_and(|m| m.trim() == QUESTIONS_EXHAUSTED_MESSAGE)
        {
            return Ok(QuestionReply::Exhausted);
        }

        match response.question {
            Some(question) if !question.trim().is_empty() => Ok(QuestionReply::Question(question)),
            _ => Err(QuestionError::ParseError(
                response
                    .message
                    .unwrap_or_else(|| "response has no question".to_string()),
            )),
        }
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionSource {
    async fn next_question(&self) -> Result<QuestionReply, QuestionError> {
        debug!(url = %self.url, "requesting question");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| QuestionError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuestionError::RequestFailed(format!(
                "HTTP error! status: {}",
                status.as_u16()
            )));
        }

        let body: QuestionResponse = response
            .json()
            .await
            .map_err(|e| QuestionError::ParseError(e.to_string()))?;

        Self::interpret(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(question: Option<&str>, message: Option<&str>) -> QuestionResponse {
        QuestionResponse {
            question: question.map(String::from),
            message: message.map(String::from),
        }
    }

    #[test]
    fn question_text_is_returned() {
        let reply = HttpQuestionSource::interpret(response(Some("Why us?"), None)).unwrap();
        assert_eq!(reply, QuestionReply::Question("Why us?".into()));
    }

    #[test]
    fn exhaustion_message_wins() {
        let reply = HttpQuestionSource::interpret(response(
            None,
            Some("All questions have been asked."),
        ))
        .unwrap();
        assert_eq!(reply, QuestionReply::Exhausted);
    }

    #[test]
    fn other_message_without_question_is_error() {
        let err = HttpQuestionSource::interpret(response(None, Some("maintenance"))).unwrap_err();
        assert!(matches!(err, QuestionError::ParseError(msg) if msg == "maintenance"));
    }

    #[test]
    fn blank_question_is_error() {
        assert!(HttpQuestionSource::interpret(response(Some("  "), None)).is_err());
    }

    #[test]
    fn url_points_at_get_question() {
        let source = HttpQuestionSource::new("http://localhost:5000/");
        assert_eq!(source.url, "http://localhost:5000/get_question");
    }
}
