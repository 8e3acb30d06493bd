//! Models able to produce a raw conversation analysis

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::providers::openai;

use crate::model::{ExtractedRiskAssessment, RequestContext};
use crate::service::analysis::error::AnalysisError;
use crate::service::analysis::prompts::{ANALYSIS_SYSTEM_PROMPT, build_analysis_prompt};

/// Default model for conversation analysis
pub const DEFAULT_MODEL: &str = openai::GPT_4O_MINI;

/// Source of raw, unvalidated analyses
#[async_trait]
pub trait AssessmentModel: Send + Sync {
    /// Analyze the conversation described by `context`
    async fn analyze(
        &self,
        context: &RequestContext,
    ) -> Result<ExtractedRiskAssessment, AnalysisError>;

    /// Backend name used in logs and health reports
    fn name(&self) -> &str;
}

/// OpenAI chat model queried through rig structured extraction
pub struct OpenAiAssessmentModel {
    client: openai::Client,
    model: String,
}

impl OpenAiAssessmentModel {
    /// Create a new model with the provided API key
    pub fn new(api_key: &str, model: impl Into<String>) -> Result<Self, AnalysisError> {
        let client = openai::Client::new(api_key);

        let model = model.into();
        tracing::info!(model = %model, "OpenAI assessment model initialized");

        Ok(Self { client, model })
    }
}

#[async_trait]
impl AssessmentModel for OpenAiAssessmentModel {
    async fn analyze(
        &self,
        context: &RequestContext,
    ) -> Result<ExtractedRiskAssessment, AnalysisError> {
        let start_time = std::time::Instant::now();

        let prompt = build_analysis_prompt(context);
        let prompt_length = prompt.len();

        tracing::debug!(
            model = %self.model,
            prompt_length = prompt_length,
            "Initiating OpenAI API call for conversation analysis"
        );

        let extractor = self
            .client
            .extractor::<ExtractedRiskAssessment>(&self.model)
            .preamble(ANALYSIS_SYSTEM_PROMPT)
            .build();

        match extractor.extract(&prompt).await {
            Ok(result) => {
                tracing::info!(
                    model = %self.model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    prompt_length = prompt_length,
                    "OpenAI API call for conversation analysis completed successfully"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    prompt_length = prompt_length,
                    error = %e,
                    "OpenAI API call for conversation analysis failed"
                );
                Err(AnalysisError::ModelFailed(e.to_string()))
            }
        }
    }

    fn name(&self) -> &str {
        "openai"
    }
}
