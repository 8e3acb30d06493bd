//! Notification-aware recommendation augmentation
//!
//! Advisories are appended only for imminent-risk assessments. Each advisory
//! starts with a fixed marker; an advisory is skipped when a recommendation
//! already contains its marker, so augmentation is idempotent.

use crate::model::{RequestContext, RiskAssessment};

pub const NOTIFICATION_SENT_MARKER: &str = "Se intentó notificar a tu contacto de emergencia";
pub const NOTIFICATION_SENT_ADVISORY: &str = "Se intentó notificar a tu contacto de emergencia sobre esta situación de riesgo. Aun así, busca ayuda profesional o contacta con los servicios de emergencia de inmediato.";

pub const NOTIFICATION_FAILED_MARKER: &str = "No se pudo notificar a tu contacto de emergencia";
pub const NOTIFICATION_FAILED_ADVISORY: &str = "No se pudo notificar a tu contacto de emergencia. Busca ayuda profesional o contacta con los servicios de emergencia de inmediato.";

pub const NO_CONTACT_MARKER: &str = "Se detectó un riesgo alto, pero no se proporcionó un contacto de emergencia válido";
pub const NO_CONTACT_ADVISORY: &str = "Se detectó un riesgo alto, pero no se proporcionó un contacto de emergencia válido. Busca ayuda directamente: llama a una línea de crisis, a los servicios de emergencia o a alguien de confianza.";

/// Resolved state of the emergency notification for one assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStatus {
    /// The notifier reported success
    Sent,
    /// The notifier returned false, failed or timed out
    Failed,
    /// No usable address was available, so the notifier was not called
    NoContact,
}

impl NotificationStatus {
    fn advisory(&self) -> (&'static str, &'static str) {
        match self {
            NotificationStatus::Sent => (NOTIFICATION_SENT_MARKER, NOTIFICATION_SENT_ADVISORY),
            NotificationStatus::Failed => {
                (NOTIFICATION_FAILED_MARKER, NOTIFICATION_FAILED_ADVISORY)
            }
            NotificationStatus::NoContact => (NO_CONTACT_MARKER, NO_CONTACT_ADVISORY),
        }
    }
}

/// Pre-check deciding whether and how the notifier is involved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPlan<'a> {
    /// No imminent risk: no notifier call, no advisory
    Skip,
    /// Imminent risk without a usable address
    NoContact,
    /// Imminent risk with a usable address
    Notify { address: &'a str },
}

impl<'a> NotificationPlan<'a> {
    pub fn for_assessment(assessment: &RiskAssessment, context: &'a RequestContext) -> Self {
        if !assessment.imminent_risk {
            return NotificationPlan::Skip;
        }
        match context.profile.usable_contact_address() {
            Some(address) => NotificationPlan::Notify { address },
            None => NotificationPlan::NoContact,
        }
    }
}

/// Append the advisory matching `status`
///
/// Returns whether the recommendation list changed. Assessments without
/// imminent risk are never touched.
pub fn augment_recommendations(
    assessment: &mut RiskAssessment,
    status: NotificationStatus,
) -> bool {
    if !assessment.imminent_risk {
        return false;
    }

    let (marker, advisory) = status.advisory();
    if assessment.has_recommendation_containing(marker) {
        return false;
    }

    assessment.push_recommendation(advisory)
}
