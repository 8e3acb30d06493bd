//! Application state and service initialization
//!
//! Builds the analysis backend and the emergency notifier from configuration
//! and wires them into the risk assessment service.

use std::sync::Arc;
use std::time::Duration;

use crate::model::{AnalysisBackend, Config};
use crate::service::analysis::DEFAULT_MODEL;
use crate::service::{
    AssessmentModel, HeuristicModel, OpenAiAssessmentModel, RiskAssessmentService,
    SendGridConfig, SendGridNotifier,
};

/// Application state shared with Actix-web handlers
pub struct AppState {
    pub assessment_service: Arc<RiskAssessmentService>,
}

impl AppState {
    /// Initialize all services
    ///
    /// The OpenAI backend requires `OPENAI_API_KEY`. SendGrid secrets are
    /// optional: without them the notifier reports every attempt as failed.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let model = Self::build_model(&config)?;
        let notifier = Self::build_notifier(&config);

        let assessment_service = Arc::new(RiskAssessmentService::new(
            model,
            Arc::new(notifier),
            Duration::from_secs(config.analysis.timeout_secs),
            Duration::from_secs(config.notifier.timeout_secs),
        ));

        Ok(Self { assessment_service })
    }

    fn build_model(config: &Config) -> Result<Arc<dyn AssessmentModel>, AppError> {
        tracing::info!(
            backend = config.analysis.backend.as_str(),
            "Building analysis backend"
        );

        match config.analysis.backend {
            AnalysisBackend::Openai => {
                let api_key = std::env::var("OPENAI_API_KEY")
                    .map_err(|_| AppError::MissingConfig("OPENAI_API_KEY"))?;

                let model_name = std::env::var("ANALYSIS_MODEL")
                    .ok()
                    .or_else(|| config.analysis.model.clone())
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string());

                let model = OpenAiAssessmentModel::new(&api_key, model_name)
                    .map_err(|_| AppError::InvalidConfig("Invalid OPENAI_API_KEY"))?;

                Ok(Arc::new(model))
            }
            AnalysisBackend::Heuristic => {
                tracing::warn!("Using offline heuristic analysis backend");
                Ok(Arc::new(HeuristicModel::new()))
            }
        }
    }

    fn build_notifier(config: &Config) -> SendGridNotifier {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        SendGridNotifier::new(SendGridConfig {
            api_key: non_empty("SENDGRID_API_KEY"),
            from_email: non_empty("SENDGRID_FROM_EMAIL"),
            base_url: config.notifier.base_url.clone(),
        })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
