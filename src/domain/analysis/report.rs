//! Analysis payload returned by the upload endpoint

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

/// Fixed scoring dimensions, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Confidence,
    Clarity,
    SpeechRate,
    EyeContact,
    BodyLanguage,
    VoiceTone,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Self::Confidence,
        Self::Clarity,
        Self::SpeechRate,
        Self::EyeContact,
        Self::BodyLanguage,
        Self::VoiceTone,
    ];

    /// Key in the `twelvelabs_data` object
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Confidence => "confidence",
            Self::Clarity => "clarity",
            Self::SpeechRate => "speech_rate",
            Self::EyeContact => "eye_contact",
            Self::BodyLanguage => "body_language",
            Self::VoiceTone => "voice_tone",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Confidence => "Confidence",
            Self::Clarity => "Clarity",
            Self::SpeechRate => "Speech Rate",
            Self::EyeContact => "Eye Contact",
            Self::BodyLanguage => "Body Language",
            Self::VoiceTone => "Voice Tone",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Free-form commentary, which the backend sends either as prose or as labeled findings
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FreeformAnalysis {
    Text(String),
    Findings(Vec<(String, String)>),
    #[default]
    Missing,
}

/// Parsed analysis payload.
///
/// Parsing never fails: any field that is absent or has an unexpected shape
/// degrades to "not available" instead of rejecting the whole response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Value")]
pub struct AnalysisReport {
    scores: Vec<(Metric, String)>,
    key_points: Vec<String>,
    analysis: FreeformAnalysis,
    error: Option<String>,
}

impl AnalysisReport {
    /// Score for a metric, already formatted for display
    pub fn score(&self, metric: Metric) -> Option<&str> {
        self.scores
            .iter()
            .find(|(m, _)| *m == metric)
            .map(|(_, s)| s.as_str())
    }

    pub fn key_points(&self) -> &[String] {
        &self.key_points
    }

    pub fn analysis(&self) -> &FreeformAnalysis {
        &self.analysis
    }

    /// Error message carried in an otherwise successful response
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn scores_from(data: &Map<String, Value>) -> Vec<(Metric, String)> {
        Metric::ALL
            .iter()
            .filter_map(|metric| {
                data.get(metric.key())
                    .and_then(display_value)
                    .map(|s| (*metric, s))
            })
            .collect()
    }

    fn key_points_from(data: &Map<String, Value>) -> Vec<String> {
        match data.get("imp_points") {
            Some(Value::Array(points)) => points.iter().filter_map(display_value).collect(),
            _ => Vec::new(),
        }
    }

    fn analysis_from(value: Option<&Value>) -> FreeformAnalysis {
        match value {
            Some(Value::String(text)) if !text.trim().is_empty() => {
                FreeformAnalysis::Text(text.clone())
            }
            Some(Value::Object(findings)) => FreeformAnalysis::Findings(
                findings
                    .iter()
                    .map(|(k, v)| (k.clone(), display_value(v).unwrap_or_default()))
                    .collect(),
            ),
            _ => FreeformAnalysis::Missing,
        }
    }
}

impl From<Value> for AnalysisReport {
    fn from(value: Value) -> Self {
        let Value::Object(root) = value else {
            return Self::default();
        };

        let empty = Map::new();
        let data = match root.get("twelvelabs_data") {
            Some(Value::Object(data)) => data,
            _ => &empty,
        };

        let error = root
            .get("error")
            .and_then(display_value)
            .filter(|e| !e.is_empty());

        Self {
            scores: Self::scores_from(data),
            key_points: Self::key_points_from(data),
            analysis: Self::analysis_from(root.get("gemini_analysis")),
            error,
        }
    }
}

/// Text form of a JSON scalar; `null` counts as absent.
fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Outcome of one submission, consumed once by rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResult {
    Success(AnalysisReport),
    Failure { message: String },
}

impl UploadResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> AnalysisReport {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn full_payload() {
        let report = parse(json!({
            "twelvelabs_data": {
                "confidence": 8,
                "clarity": 7.5,
                "speech_rate": "6",
                "eye_contact": 9,
                "body_language": 5,
                "voice_tone": 7,
                "imp_points": ["Good structure", "Speak slower"]
            },
            "gemini_analysis": "Solid answer overall."
        }));

        assert_eq!(report.score(Metric::Confidence), Some("8"));
        assert_eq!(report.score(Metric::Clarity), Some("7.5"));
        assert_eq!(report.score(Metric::SpeechRate), Some("6"));
        assert_eq!(report.key_points(), &["Good structure", "Speak slower"]);
        assert_eq!(
            report.analysis(),
            &FreeformAnalysis::Text("Solid answer overall.".to_string())
        );
        assert!(report.error().is_none());
    }

    #[test]
    fn missing_and_null_scores_are_absent() {
        let report = parse(json!({
            "twelvelabs_data": { "confidence": 8, "clarity": null }
        }));
        assert_eq!(report.score(Metric::Confidence), Some("8"));
        assert_eq!(report.score(Metric::Clarity), None);
        assert_eq!(report.score(Metric::SpeechRate), None);
    }

    #[test]
    fn findings_keep_server_order() {
        let report = parse(json!({
            "gemini_analysis": { "posture": "upright", "body_language": "steady" }
        }));
        assert_eq!(
            report.analysis(),
            &FreeformAnalysis::Findings(vec![
                ("posture".to_string(), "upright".to_string()),
                ("body_language".to_string(), "steady".to_string()),
            ])
        );
    }

    #[test]
    fn unexpected_shapes_degrade() {
        let report = parse(json!({
            "twelvelabs_data": "not an object",
            "gemini_analysis": 42
        }));
        assert_eq!(report, AnalysisReport::default());

        let report = parse(json!(["not", "an", "object"]));
        assert_eq!(report, AnalysisReport::default());
    }

    #[test]
    fn non_array_key_points_are_ignored() {
        let report = parse(json!({ "twelvelabs_data": { "imp_points": "one point" } }));
        assert!(report.key_points().is_empty());
    }

    #[test]
    fn blank_text_analysis_is_missing() {
        let report = parse(json!({ "gemini_analysis": "   " }));
        assert_eq!(report.analysis(), &FreeformAnalysis::Missing);
    }

    #[test]
    fn error_field_is_captured() {
        let report = parse(json!({ "error": "Video could not be processed" }));
        assert_eq!(report.error(), Some("Video could not be processed"));
    }

    #[test]
    fn metric_keys_and_labels() {
        assert_eq!(Metric::SpeechRate.key(), "speech_rate");
        assert_eq!(Metric::SpeechRate.label(), "Speech Rate");
        assert_eq!(Metric::ALL.len(), 6);
    }
}
