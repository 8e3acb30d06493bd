//! Conversation risk assessment service
//!
//! Sequences one analysis: model call, validation, keyword guard,
//! notification pre-check, optional emergency notification and recommendation
//! augmentation. Every failure is absorbed; callers always receive a
//! `RiskAssessment`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::model::{RequestContext, RiskAssessment};
use crate::service::analysis::converters::convert_assessment;
use crate::service::analysis::validation::validate_extracted_assessment;
use crate::service::guard::{GuardOutcome, apply_keyword_guard};
use crate::service::notifier::{EmergencyNotification, EmergencyNotifier};
use crate::service::recommendations::{
    NotificationPlan, NotificationStatus, augment_recommendations,
};

pub mod converters;
pub mod error;
pub mod model;
pub mod prompts;
pub mod validation;

pub use error::AnalysisError;
pub use model::{AssessmentModel, DEFAULT_MODEL, OpenAiAssessmentModel};

/// Service producing final risk assessments
pub struct RiskAssessmentService {
    model: Arc<dyn AssessmentModel>,
    notifier: Arc<dyn EmergencyNotifier>,
    model_timeout: Duration,
    notifier_timeout: Duration,
}

impl RiskAssessmentService {
    pub fn new(
        model: Arc<dyn AssessmentModel>,
        notifier: Arc<dyn EmergencyNotifier>,
        model_timeout: Duration,
        notifier_timeout: Duration,
    ) -> Self {
        tracing::info!(
            backend = model.name(),
            notifier_configured = notifier.is_configured(),
            model_timeout_secs = model_timeout.as_secs(),
            notifier_timeout_secs = notifier_timeout.as_secs(),
            "Risk assessment service initialized"
        );

        Self {
            model,
            notifier,
            model_timeout,
            notifier_timeout,
        }
    }

    pub fn backend(&self) -> &str {
        self.model.name()
    }

    pub fn notifier_configured(&self) -> bool {
        self.notifier.is_configured()
    }

    /// Analyze a conversation and apply the escalation policy
    pub async fn assess(&self, context: &RequestContext) -> RiskAssessment {
        let start_time = Instant::now();

        let mut assessment = match self.invoke_model(context).await {
            Ok(assessment) => assessment,
            Err(e) => {
                tracing::error!(
                    backend = self.model.name(),
                    elapsed_ms = start_time.elapsed().as_millis(),
                    error = %e,
                    "Conversation analysis failed, returning fallback assessment"
                );
                return RiskAssessment::fallback();
            }
        };

        let guard_outcome = apply_keyword_guard(&context.text, &mut assessment);

        let notification = match NotificationPlan::for_assessment(&assessment, context) {
            NotificationPlan::Skip => None,
            NotificationPlan::NoContact => {
                tracing::warn!("Imminent risk detected without a usable emergency contact");
                Some(NotificationStatus::NoContact)
            }
            NotificationPlan::Notify { address } => {
                Some(self.notify_contact(address, context, &assessment).await)
            }
        };

        if let Some(status) = notification {
            augment_recommendations(&mut assessment, status);
        }

        tracing::info!(
            backend = self.model.name(),
            risk_score = assessment.risk_score,
            imminent_risk = assessment.imminent_risk,
            guard_overridden = matches!(guard_outcome, GuardOutcome::Overridden { .. }),
            notification = ?notification,
            categories_count = assessment.categories.len(),
            elapsed_ms = start_time.elapsed().as_millis(),
            "Conversation analysis completed"
        );

        assessment
    }

    /// Stage 1: call the model, validate and normalize its output
    async fn invoke_model(&self, context: &RequestContext) -> Result<RiskAssessment, AnalysisError> {
        tracing::debug!(
            backend = self.model.name(),
            text_length = context.text.len(),
            "Requesting conversation analysis"
        );

        let extracted = tokio::time::timeout(self.model_timeout, self.model.analyze(context))
            .await
            .map_err(|_| AnalysisError::Timeout(self.model_timeout))??;

        let validation = validate_extracted_assessment(&extracted, &context.text);
        for warning in &validation.warnings {
            tracing::warn!(warning = %warning, "Model output validation warning");
        }
        if !validation.is_valid {
            return Err(AnalysisError::Malformed(validation.errors.join("; ")));
        }

        Ok(convert_assessment(extracted, &context.text))
    }

    /// Stage 4: one notification attempt, never retried
    async fn notify_contact(
        &self,
        address: &str,
        context: &RequestContext,
        assessment: &RiskAssessment,
    ) -> NotificationStatus {
        let user_name = context.profile.display_name();
        let notification = EmergencyNotification {
            to: address,
            user_name: &user_name,
            risk_summary: &assessment.risk_summary,
            assessment,
        };

        match tokio::time::timeout(self.notifier_timeout, self.notifier.notify(&notification)).await
        {
            Ok(Ok(true)) => {
                tracing::info!("Emergency contact notified");
                NotificationStatus::Sent
            }
            Ok(Ok(false)) => {
                tracing::warn!("Emergency notification was not delivered");
                NotificationStatus::Failed
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Emergency notification failed");
                NotificationStatus::Failed
            }
            Err(_) => {
                tracing::error!(
                    timeout_secs = self.notifier_timeout.as_secs(),
                    "Emergency notification timed out"
                );
                NotificationStatus::Failed
            }
        }
    }
}
