//! Error types for the model stage of an analysis

use std::time::Duration;

use thiserror::Error;

/// Error type for the model stage
///
/// None of these reach the caller: the orchestrator turns every one of them
/// into the fallback assessment.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalysisError {
    #[error("LLM analysis failed: {0}")]
    ModelFailed(String),

    #[error("Malformed model output: {0}")]
    Malformed(String),

    #[error("LLM analysis timed out after {0:?}")]
    Timeout(Duration),
}
