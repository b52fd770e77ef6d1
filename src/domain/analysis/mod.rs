//! Analysis domain module

mod render;
mod report;

pub use render::{humanize_key, ResultLine, ResultView, NO_ANALYSIS, NO_KEY_POINTS, RETRY_HINT};
pub use report::{AnalysisReport, FreeformAnalysis, Metric, UploadResult};
