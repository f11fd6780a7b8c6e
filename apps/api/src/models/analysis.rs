use serde::{Deserialize, Serialize};

/// Structured evaluation parsed out of the model's free-form answer.
///
/// Every field is best-effort: a section the model left out is empty, never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// ATS-style score, 0 – 100. `None` when the model gave no usable number.
    pub score: Option<u8>,
    pub skills_present: Vec<String>,
    pub skills_missing: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommended_courses: Vec<String>,
    pub summary: String,
    /// The model's answer verbatim, for display when parsing came up short.
    pub raw_response: String,
}

impl AnalysisResult {
    /// True when nothing beyond the raw text could be recovered.
    pub fn is_unstructured(&self) -> bool {
        self.score.is_none()
            && self.skills_present.is_empty()
            && self.skills_missing.is_empty()
            && self.strengths.is_empty()
            && self.weaknesses.is_empty()
            && self.recommended_courses.is_empty()
            && self.summary.is_empty()
    }
}
