//! Risk assessment returned to callers
//!
//! A `RiskAssessment` is created fresh for every analysis request and is only
//! mutated by the post-processing steps (keyword guard and recommendation
//! augmentation) before it is returned.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Highest possible risk score
pub const MAX_RISK_SCORE: u8 = 100;

/// Minimum score of any assessment flagged with imminent risk
pub const IMMINENT_RISK_SCORE_FLOOR: u8 = 90;

/// Summary used when the analysis could not be completed
pub const FALLBACK_RISK_SUMMARY: &str =
    "Error: no se pudo completar el análisis de la conversación.";

/// Single recommendation returned when the analysis could not be completed
pub const FALLBACK_RECOMMENDATION: &str =
    "Error: No se pudo analizar la conversación. El modelo no proporcionó una respuesta válida.";

/// Who is attributed as exhibiting the problematic behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    #[serde(alias = "usuario")]
    User,
    #[serde(alias = "interlocutor")]
    Counterpart,
    #[serde(alias = "ambiguo")]
    Ambiguous,
    #[serde(alias = "ninguno")]
    None,
    #[serde(alias = "externo")]
    External,
}

impl Origin {
    /// Label used in notification e-mails
    pub fn label(&self) -> &'static str {
        match self {
            Origin::User => "usuario",
            Origin::Counterpart => "interlocutor",
            Origin::Ambiguous => "ambiguo",
            Origin::None => "ninguno",
            Origin::External => "externo",
        }
    }
}

/// Who is attributed as suffering the negative impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AffectedParty {
    #[serde(alias = "usuario")]
    User,
    #[serde(alias = "interlocutor")]
    Counterpart,
    #[serde(alias = "ambos")]
    Both,
    #[serde(alias = "grupo")]
    Group,
    #[serde(alias = "ninguno")]
    None,
}

impl AffectedParty {
    /// Human readable description, without names or pronouns
    pub fn display_text(&self) -> &'static str {
        match self {
            AffectedParty::User => "El usuario que proporcionó la conversación",
            AffectedParty::Counterpart => "La otra persona",
            AffectedParty::Both => "Ambas partes",
            AffectedParty::Group => "Miembros del grupo",
            AffectedParty::None => "Ninguno identificado claramente",
        }
    }
}

/// Structured result of a conversation analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RiskAssessment {
    /// Overall risk, 0 (very low) to 100 (very high)
    pub risk_score: u8,
    /// Danger of self-harm, suicide or physical violence requiring urgent action
    pub imminent_risk: bool,
    /// Short explanation of the nature of the risk
    pub risk_summary: String,
    /// Detected behavioral patterns, unique
    pub categories: Vec<String>,
    /// Verbatim quotes from the conversation
    pub examples: Vec<String>,
    /// Advisory strings, urgent items first, unique
    pub recommendations: Vec<String>,
    pub origin: Origin,
    pub affected_party: AffectedParty,
}

impl RiskAssessment {
    /// Result returned whenever the model stage fails
    pub fn fallback() -> Self {
        Self {
            risk_score: 0,
            imminent_risk: false,
            risk_summary: FALLBACK_RISK_SUMMARY.to_string(),
            categories: Vec::new(),
            examples: Vec::new(),
            recommendations: vec![FALLBACK_RECOMMENDATION.to_string()],
            origin: Origin::None,
            affected_party: AffectedParty::None,
        }
    }

    /// Add a category unless an equal one is already present
    pub fn add_category(&mut self, category: impl Into<String>) -> bool {
        push_unique(&mut self.categories, category.into())
    }

    /// Append a recommendation unless an equal one is already present
    pub fn push_recommendation(&mut self, recommendation: impl Into<String>) -> bool {
        push_unique(&mut self.recommendations, recommendation.into())
    }

    /// Put a recommendation first, moving an equal entry rather than duplicating it
    ///
    /// Returns whether the list changed.
    pub fn prepend_recommendation(&mut self, recommendation: impl Into<String>) -> bool {
        let recommendation = recommendation.into();
        match self.recommendations.iter().position(|r| *r == recommendation) {
            Some(0) => false,
            Some(index) => {
                let existing = self.recommendations.remove(index);
                self.recommendations.insert(0, existing);
                true
            }
            None => {
                self.recommendations.insert(0, recommendation);
                true
            }
        }
    }

    /// Whether any recommendation contains the given marker
    pub fn has_recommendation_containing(&self, marker: &str) -> bool {
        self.recommendations.iter().any(|r| r.contains(marker))
    }

    /// Raise the score to the imminent-risk floor when imminent risk is flagged
    pub fn enforce_imminent_floor(&mut self) {
        if self.imminent_risk && self.risk_score < IMMINENT_RISK_SCORE_FLOOR {
            self.risk_score = IMMINENT_RISK_SCORE_FLOOR;
        }
    }

    /// `imminent_risk` implies `risk_score >= 90`
    pub fn satisfies_imminent_floor(&self) -> bool {
        !self.imminent_risk || self.risk_score >= IMMINENT_RISK_SCORE_FLOOR
    }
}

fn push_unique(items: &mut Vec<String>, item: String) -> bool {
    if items.contains(&item) {
        return false;
    }
    items.push(item);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_shape() {
        let fallback = RiskAssessment::fallback();
        assert_eq!(fallback.risk_score, 0);
        assert!(!fallback.imminent_risk);
        assert!(fallback.categories.is_empty());
        assert!(fallback.examples.is_empty());
        assert_eq!(fallback.recommendations, vec![FALLBACK_RECOMMENDATION.to_string()]);
        assert_eq!(fallback.origin, Origin::None);
        assert_eq!(fallback.affected_party, AffectedParty::None);
    }

    #[test]
    fn test_unique_collections() {
        let mut assessment = RiskAssessment::fallback();
        assert!(assessment.add_category("gaslighting"));
        assert!(!assessment.add_category("gaslighting"));
        assert_eq!(assessment.categories.len(), 1);

        assert!(assessment.prepend_recommendation("Primero"));
        assert!(!assessment.prepend_recommendation("Primero"));
        assert!(!assessment.push_recommendation("Primero"));
        assert_eq!(assessment.recommendations[0], "Primero");
        assert_eq!(assessment.recommendations.len(), 2);
    }

    #[test]
    fn test_prepend_moves_existing_entry_first() {
        let mut assessment = RiskAssessment::fallback();
        assessment.push_recommendation("Urgente");
        assessment.push_recommendation("Otra");

        assert!(assessment.prepend_recommendation("Urgente"));

        assert_eq!(
            assessment.recommendations,
            vec![
                "Urgente".to_string(),
                FALLBACK_RECOMMENDATION.to_string(),
                "Otra".to_string()
            ]
        );
    }

    #[test]
    fn test_imminent_floor() {
        let mut assessment = RiskAssessment::fallback();
        assessment.imminent_risk = true;
        assessment.risk_score = 40;
        assert!(!assessment.satisfies_imminent_floor());

        assessment.enforce_imminent_floor();
        assert_eq!(assessment.risk_score, IMMINENT_RISK_SCORE_FLOOR);
        assert!(assessment.satisfies_imminent_floor());
    }

    #[test]
    fn test_spanish_aliases_deserialize() {
        let origin: Origin = serde_json::from_str("\"interlocutor\"").unwrap();
        assert_eq!(origin, Origin::Counterpart);
        let affected: AffectedParty = serde_json::from_str("\"ambos\"").unwrap();
        assert_eq!(affected, AffectedParty::Both);
        assert_eq!(serde_json::to_string(&Origin::Counterpart).unwrap(), "\"counterpart\"");
    }
}
