//! Upload pipeline: submit an artifact and fold every outcome into an `UploadResult`

use tracing::{info, warn};

use crate::domain::analysis::UploadResult;
use crate::domain::recording::MediaArtifact;

use super::ports::AnalysisBackend;

/// Sends recordings to the analysis backend
pub struct UploadPipeline<A: AnalysisBackend> {
    backend: A,
}

impl<A: AnalysisBackend> UploadPipeline<A> {
    pub fn new(backend: A) -> Self {
        Self { backend }
    }

    /// Submit one artifact. Never fails; errors come back as `UploadResult::Failure`.
    pub async fn submit(&self, artifact: &MediaArtifact) -> UploadResult {
        info!(
            size = %artifact.human_readable_size(),
            container = %artifact.container(),
            "uploading recording"
        );

        match self.backend.analyze(artifact).await {
            Ok(report) => {
                if let Some(message) = report.error() {
                    warn!(%message, "server reported an analysis error");
                } else {
                    info!("analysis received");
                }
                UploadResult::Success(report)
            }
            Err(e) => {
                warn!(error = %e, "upload failed");
                UploadResult::failure(e.to_string())
            }
        }
    }
}
