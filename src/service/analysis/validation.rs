//! Validation logic for LLM-extracted conversation analyses
//!
//! Errors make the output unusable (the orchestrator falls back); warnings
//! are logged and the converters normalize the offending fields.

use crate::model::ExtractedRiskAssessment;
use crate::model::assessment::{IMMINENT_RISK_SCORE_FLOOR, MAX_RISK_SCORE};

/// Result of assessment validation
#[derive(Debug)]
pub struct AssessmentValidationResult {
    /// Whether the assessment passed validation
    pub is_valid: bool,
    /// Critical errors that indicate invalid output
    pub errors: Vec<String>,
    /// Warnings that indicate potential quality issues
    pub warnings: Vec<String>,
}

impl AssessmentValidationResult {
    /// Create a new validation result with no issues
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

/// Validate an extracted analysis against the conversation it came from
///
/// Checks:
/// 1. Risk score is within 0..=100 (error)
/// 2. A summary is present when the score is above 0 (warning)
/// 3. Imminent risk comes with a score of at least 90 (warning)
/// 4. Every example is a verbatim substring of the conversation (warning)
/// 5. Categories and recommendations have no duplicates (warning)
pub fn validate_extracted_assessment(
    assessment: &ExtractedRiskAssessment,
    text: &str,
) -> AssessmentValidationResult {
    let mut result = AssessmentValidationResult::valid();

    if assessment.risk_score < 0 || assessment.risk_score > i64::from(MAX_RISK_SCORE) {
        result.add_error(format!(
            "Risk score {} is outside 0..={}",
            assessment.risk_score, MAX_RISK_SCORE
        ));
    }

    if assessment.risk_score > 0 && assessment.risk_summary.trim().is_empty() {
        result.add_warning(format!(
            "Risk score is {} but the risk summary is empty",
            assessment.risk_score
        ));
    }

    if assessment.imminent_risk && assessment.risk_score < i64::from(IMMINENT_RISK_SCORE_FLOOR) {
        result.add_warning(format!(
            "Imminent risk flagged with score {} below {}",
            assessment.risk_score, IMMINENT_RISK_SCORE_FLOOR
        ));
    }

    for (i, example) in assessment.examples.iter().enumerate() {
        if !is_verbatim_example(example, text) {
            result.add_warning(format!(
                "Example {} ({} chars) is not a verbatim quote",
                i + 1,
                example.chars().count()
            ));
        }
    }

    if has_duplicates(&assessment.categories) {
        result.add_warning("Categories contain duplicates".to_string());
    }

    if has_duplicates(&assessment.recommendations) {
        result.add_warning("Recommendations contain duplicates".to_string());
    }

    result
}

/// An example must be a non-empty literal substring of the conversation
pub fn is_verbatim_example(example: &str, text: &str) -> bool {
    !example.trim().is_empty() && text.contains(example)
}

fn has_duplicates(items: &[String]) -> bool {
    items
        .iter()
        .enumerate()
        .any(|(i, item)| items[..i].contains(item))
}
