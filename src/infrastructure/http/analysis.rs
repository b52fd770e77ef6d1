//! Analysis backend adapter (`POST /upload`)

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::debug;

use crate::application::ports::AnalysisBackend;
use crate::domain::analysis::AnalysisReport;
use crate::domain::error::InterviewError;
use crate::domain::recording::MediaArtifact;

use super::endpoint;

/// Multipart field the server reads the recording from
const VIDEO_FIELD: &str = "video";

/// Uploads recordings to the interview server for scoring
pub struct HttpAnalysisBackend {
    url: String,
    client: reqwest::Client,
}

impl HttpAnalysisBackend {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            url: endpoint(base_url, "upload"),
            client,
        }
    }

    /// Build the multipart body
    fn build_form(artifact: &MediaArtifact) -> Result<Form, InterviewError> {
        let container = artifact.container();
        let part = Part::bytes(artifact.data().to_vec())
            .file_name(format!("interview.{}", container.extension()))
            .mime_str(container.as_str())
            .map_err(|e| InterviewError::TransportFailure(e.to_string()))?;

        Ok(Form::new().part(VIDEO_FIELD, part))
    }

    /// Message for a non-2xx answer: the body's `error` field, or the status code
    fn rejection_message(status: u16, body: &str) -> String {
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| match v.get("error") {
                Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
                _ => None,
            })
            .unwrap_or_else(|| format!("HTTP error! status: {}", status))
    }
}

#[async_trait]
impl AnalysisBackend for HttpAnalysisBackend {
    async fn analyze(&self, artifact: &MediaArtifact) -> Result<AnalysisReport, InterviewError> {
        let form = Self::build_form(artifact)?;
        debug!(url = %self.url, bytes = artifact.size_bytes(), "posting recording");

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| InterviewError::TransportFailure(format!("Failed to upload video: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| InterviewError::TransportFailure(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(InterviewError::UploadRejected(Self::rejection_message(
                status.as_u16(),
                &body,
            )));
        }

        serde_json::from_str(&body).map_err(|e| InterviewError::MalformedResponse(e.to_string()))
    }
}
