//! Emergency notification of a user's contact
//!
//! The orchestrator calls a notifier at most once per assessment and never
//! retries. `Ok(false)` and `Err(_)` are both treated as a failed attempt.

mod email;
mod sendgrid;

use async_trait::async_trait;

use crate::model::RiskAssessment;

pub use sendgrid::{SendGridConfig, SendGridNotifier};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum NotifierError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

/// Payload handed to a notifier
#[derive(Debug, Clone, Copy)]
pub struct EmergencyNotification<'a> {
    /// Destination address
    pub to: &'a str,
    /// Name of the user at risk, as shown to the contact
    pub user_name: &'a str,
    pub risk_summary: &'a str,
    pub assessment: &'a RiskAssessment,
}

/// Sender of emergency notifications
#[async_trait]
pub trait EmergencyNotifier: Send + Sync {
    /// Attempt one delivery; `Ok(true)` only when it was accepted
    async fn notify(&self, notification: &EmergencyNotification<'_>)
    -> Result<bool, NotifierError>;

    /// Whether the notifier has everything it needs to deliver
    fn is_configured(&self) -> bool;
}
