//! Converters from extracted LLM models to domain models

use crate::model::assessment::MAX_RISK_SCORE;
use crate::model::{
    AffectedParty, ExtractedAffectedParty, ExtractedOrigin, ExtractedRiskAssessment, Origin,
    RiskAssessment,
};
use crate::service::analysis::validation::is_verbatim_example;

/// Summary used when the model reports risk without explaining it
pub const GENERIC_RISK_SUMMARY: &str = "Se detectaron señales de riesgo en la conversación.";

pub fn convert_origin(extracted: ExtractedOrigin) -> Origin {
    match extracted {
        ExtractedOrigin::User => Origin::User,
        ExtractedOrigin::Counterpart => Origin::Counterpart,
        ExtractedOrigin::Ambiguous => Origin::Ambiguous,
        ExtractedOrigin::None => Origin::None,
        ExtractedOrigin::External => Origin::External,
    }
}

pub fn convert_affected_party(extracted: ExtractedAffectedParty) -> AffectedParty {
    match extracted {
        ExtractedAffectedParty::User => AffectedParty::User,
        ExtractedAffectedParty::Counterpart => AffectedParty::Counterpart,
        ExtractedAffectedParty::Both => AffectedParty::Both,
        ExtractedAffectedParty::Group => AffectedParty::Group,
        ExtractedAffectedParty::None => AffectedParty::None,
    }
}

/// Convert a validated extraction into a normalized domain assessment
///
/// Normalization drops non-verbatim examples, collapses duplicate categories
/// and recommendations, fills an empty summary and raises imminent-risk
/// scores to the floor.
pub fn convert_assessment(extracted: ExtractedRiskAssessment, text: &str) -> RiskAssessment {
    let risk_score = extracted.risk_score.clamp(0, i64::from(MAX_RISK_SCORE)) as u8;

    let risk_summary = if extracted.risk_summary.trim().is_empty() && risk_score > 0 {
        GENERIC_RISK_SUMMARY.to_string()
    } else {
        extracted.risk_summary.trim().to_string()
    };

    let mut assessment = RiskAssessment {
        risk_score,
        imminent_risk: extracted.imminent_risk,
        risk_summary,
        categories: Vec::new(),
        examples: extracted
            .examples
            .into_iter()
            .filter(|example| is_verbatim_example(example, text))
            .collect(),
        recommendations: Vec::new(),
        origin: convert_origin(extracted.origin),
        affected_party: convert_affected_party(extracted.affected_party),
    };

    for category in extracted.categories {
        let category = category.trim();
        if !category.is_empty() {
            assessment.add_category(category);
        }
    }

    for recommendation in extracted.recommendations {
        let recommendation = recommendation.trim();
        if !recommendation.is_empty() {
            assessment.push_recommendation(recommendation);
        }
    }

    assessment.enforce_imminent_floor();
    assessment
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "A: Es tu culpa que me enoje.\nB: Lo siento.";

    fn create_extracted() -> ExtractedRiskAssessment {
        ExtractedRiskAssessment {
            risk_score: 65,
            imminent_risk: false,
            risk_summary: " Culpabilización por parte del interlocutor. ".to_string(),
            categories: vec![
                "culpabilizacion".to_string(),
                "culpabilizacion".to_string(),
                " ".to_string(),
            ],
            examples: vec![
                "Es tu culpa que me enoje.".to_string(),
                "Todo es culpa tuya".to_string(),
            ],
            recommendations: vec![
                "No eres responsable de las emociones ajenas.".to_string(),
                "No eres responsable de las emociones ajenas.".to_string(),
            ],
            origin: ExtractedOrigin::Counterpart,
            affected_party: ExtractedAffectedParty::User,
        }
    }

    #[test]
    fn test_normalizes_collections() {
        let assessment = convert_assessment(create_extracted(), TEXT);

        assert_eq!(assessment.risk_score, 65);
        assert_eq!(assessment.risk_summary, "Culpabilización por parte del interlocutor.");
        assert_eq!(assessment.categories, vec!["culpabilizacion".to_string()]);
        assert_eq!(assessment.examples, vec!["Es tu culpa que me enoje.".to_string()]);
        assert_eq!(assessment.recommendations.len(), 1);
        assert_eq!(assessment.origin, Origin::Counterpart);
        assert_eq!(assessment.affected_party, AffectedParty::User);
    }

    #[test]
    fn test_imminent_floor_and_generic_summary() {
        let mut extracted = create_extracted();
        extracted.imminent_risk = true;
        extracted.risk_summary = String::new();

        let assessment = convert_assessment(extracted, TEXT);

        assert_eq!(assessment.risk_score, 90);
        assert_eq!(assessment.risk_summary, GENERIC_RISK_SUMMARY);
        assert!(assessment.satisfies_imminent_floor());
    }

    #[test]
    fn test_zero_score_keeps_empty_summary() {
        let mut extracted = create_extracted();
        extracted.risk_score = 0;
        extracted.risk_summary = String::new();

        let assessment = convert_assessment(extracted, TEXT);

        assert!(assessment.risk_summary.is_empty());
    }
}
