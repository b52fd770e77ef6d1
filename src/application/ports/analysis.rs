//! Analysis backend port interface

use async_trait::async_trait;

use crate::domain::analysis::AnalysisReport;
use crate::domain::error::InterviewError;
use crate::domain::recording::MediaArtifact;

/// Port for submitting a recorded answer for scoring
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Upload the artifact and parse the analysis.
    ///
    /// Fails with `TransportFailure`, `UploadRejected` or `MalformedResponse`.
    /// Partial payloads are not failures; they parse into a partial report.
    async fn analyze(&self, artifact: &MediaArtifact) -> Result<AnalysisReport, InterviewError>;
}
