//! Projection of an upload outcome into displayable lines

use std::fmt;

use super::report::{AnalysisReport, FreeformAnalysis, Metric, UploadResult};

/// Shown under every failure message
pub const RETRY_HINT: &str = "Please try again. If the problem persists, ensure you're recording for the full time and that your video and audio are working correctly.";

pub const NO_KEY_POINTS: &str = "No key points found in the analysis.";
pub const NO_ANALYSIS: &str = "No analysis available.";
const NOT_AVAILABLE: &str = "N/A";

/// One line of the result area
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultLine {
    Heading(String),
    Score { label: String, value: String },
    Bullet(String),
    Paragraph(String),
    Notice(String),
    Error(String),
}

impl fmt::Display for ResultLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heading(text) | Self::Paragraph(text) | Self::Notice(text) => {
                write!(f, "{}", text)
            }
            Self::Score { label, value } => write!(f, "{}: {}/10", label, value),
            Self::Bullet(text) => write!(f, "- {}", text),
            Self::Error(message) => write!(f, "Error: {}", message),
        }
    }
}

/// The result area's content, ready for any view to draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    lines: Vec<ResultLine>,
}

impl ResultView {
    /// Render an upload outcome
    pub fn render(result: &UploadResult) -> Self {
        match result {
            UploadResult::Success(report) => match report.error() {
                Some(message) => Self::failure(message),
                None => Self::analysis(report),
            },
            UploadResult::Failure { message } => Self::failure(message),
        }
    }

    /// Error message plus the generic retry hint
    pub fn failure(message: &str) -> Self {
        Self {
            lines: vec![
                ResultLine::Error(message.to_string()),
                ResultLine::Notice(RETRY_HINT.to_string()),
            ],
        }
    }

    /// Placeholder shown while the upload is in flight
    pub fn pending() -> Self {
        Self {
            lines: vec![ResultLine::Paragraph(
                "Processing video, please wait...".to_string(),
            )],
        }
    }

    fn analysis(report: &AnalysisReport) -> Self {
        let mut lines = vec![ResultLine::Heading("Analysis Results:".to_string())];

        for metric in Metric::ALL {
            lines.push(ResultLine::Score {
                label: metric.label().to_string(),
                value: report.score(metric).unwrap_or(NOT_AVAILABLE).to_string(),
            });
        }

        if report.key_points().is_empty() {
            lines.push(ResultLine::Notice(NO_KEY_POINTS.to_string()));
        } else {
            lines.push(ResultLine::Heading("Key Points:".to_string()));
            lines.extend(report.key_points().iter().cloned().map(ResultLine::Bullet));
        }

        match report.analysis() {
            FreeformAnalysis::Text(text) => {
                lines.push(ResultLine::Heading("Analysis:".to_string()));
                lines.push(ResultLine::Paragraph(text.clone()));
            }
            FreeformAnalysis::Findings(findings) if !findings.is_empty() => {
                lines.push(ResultLine::Heading("Analysis:".to_string()));
                lines.extend(findings.iter().map(|(key, value)| {
                    ResultLine::Bullet(format!("{}: {}", humanize_key(key), value))
                }));
            }
            _ => lines.push(ResultLine::Notice(NO_ANALYSIS.to_string())),
        }

        Self { lines }
    }

    pub fn lines(&self) -> &[ResultLine] {
        &self.lines
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.lines.first(), Some(ResultLine::Error(_)))
    }
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// `body_language` -> `Body language`
pub fn humanize_key(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => {
            let rest: String = chars.collect();
            format!("{}{}", first.to_uppercase(), rest.replace('_', " "))
        }
        None => String::new(),
    }
}
