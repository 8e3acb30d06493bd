//! Keyword override guard
//!
//! Re-checks the raw conversation after the model returns so that explicit
//! kill statements cannot be missed. Only the critical subset mutates the
//! assessment; weaker high-severity phrases are reported to operators and the
//! model's judgment is kept.

use crate::model::RiskAssessment;

/// Score floor applied when the guard forces imminent risk
pub const OVERRIDE_SCORE_FLOOR: u8 = 95;

/// Phrases signalling suicidal ideation, lowercase
pub const SUICIDAL_IDEATION_MARKERS: &[&str] = &[
    "quiero morir",
    "matarme",
    "no quiero vivir",
    "me voy a matar",
    "quitarme la vida",
    "suicidarme",
];

/// Phrases signalling a direct threat of violence, lowercase
pub const DIRECT_THREAT_MARKERS: &[&str] = &[
    "te voy a matar",
    "voy a hacerte daño",
    "te voy a hacer daño",
];

/// Explicit first-person kill statements; the only phrases that force an override
pub const CRITICAL_MARKERS: &[&str] = &["te voy a matar", "me voy a matar"];

/// Appended to the risk summary when the guard forces imminent risk
pub const OVERRIDE_SUMMARY_NOTE: &str =
    "[Riesgo inminente confirmado por la detección de frases críticas en la conversación.]";

/// Prepended to the recommendations when the guard forces imminent risk
pub const OVERRIDE_URGENT_RECOMMENDATION: &str = "URGENTE: La conversación contiene frases que indican un peligro inmediato. Si tú o alguien más está en riesgo, contacta ahora mismo con los servicios de emergencia o con una línea de crisis.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    SuicidalIdeation,
    DirectThreat,
}

/// A marker found in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerMatch {
    pub phrase: &'static str,
    pub kind: MarkerKind,
    pub critical: bool,
}

/// What the guard did with an assessment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The model already flagged imminent risk; nothing to check
    AlreadyImminent,
    /// No marker found
    NoMatch,
    /// A critical phrase forced imminent risk
    Overridden { phrase: &'static str },
    /// Only non-critical phrases found; a warning was logged
    Flagged { phrases: Vec<&'static str> },
}

/// Find every marker contained in `text`, case-insensitively
pub fn find_markers(text: &str) -> Vec<MarkerMatch> {
    let lowered = text.to_lowercase();

    let suicidal = SUICIDAL_IDEATION_MARKERS
        .iter()
        .map(|phrase| (*phrase, MarkerKind::SuicidalIdeation));
    let threats = DIRECT_THREAT_MARKERS
        .iter()
        .map(|phrase| (*phrase, MarkerKind::DirectThreat));

    suicidal
        .chain(threats)
        .filter(|(phrase, _)| lowered.contains(phrase))
        .map(|(phrase, kind)| MarkerMatch {
            phrase,
            kind,
            critical: CRITICAL_MARKERS.contains(&phrase),
        })
        .collect()
}

/// Apply the keyword override policy to a freshly extracted assessment
///
/// Must run exactly once per assessment, after the model call and before
/// recommendation augmentation.
pub fn apply_keyword_guard(text: &str, assessment: &mut RiskAssessment) -> GuardOutcome {
    if assessment.imminent_risk {
        return GuardOutcome::AlreadyImminent;
    }

    let matches = find_markers(text);
    if matches.is_empty() {
        return GuardOutcome::NoMatch;
    }

    if let Some(critical) = matches.iter().find(|m| m.critical) {
        let previous_score = assessment.risk_score;

        assessment.imminent_risk = true;
        assessment.risk_score = assessment.risk_score.max(OVERRIDE_SCORE_FLOOR);
        annotate_summary(assessment);
        assessment.prepend_recommendation(OVERRIDE_URGENT_RECOMMENDATION);

        tracing::warn!(
            phrase = critical.phrase,
            kind = ?critical.kind,
            previous_score = previous_score,
            risk_score = assessment.risk_score,
            "Critical phrase detected; forcing imminent risk the model did not report"
        );

        return GuardOutcome::Overridden {
            phrase: critical.phrase,
        };
    }

    let phrases: Vec<&'static str> = matches.iter().map(|m| m.phrase).collect();

    tracing::warn!(
        phrases = ?phrases,
        risk_score = assessment.risk_score,
        "High-severity phrases detected but the model did not report imminent risk; assessment left unchanged"
    );

    GuardOutcome::Flagged { phrases }
}

fn annotate_summary(assessment: &mut RiskAssessment) {
    if assessment.risk_summary.contains(OVERRIDE_SUMMARY_NOTE) {
        return;
    }
    let summary = assessment.risk_summary.trim_end();
    assessment.risk_summary = if summary.is_empty() {
        OVERRIDE_SUMMARY_NOTE.to_string()
    } else {
        format!("{} {}", summary, OVERRIDE_SUMMARY_NOTE)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AffectedParty, Origin};
    use crate::service::log_capture::LogBuffer;

    fn guard_with_logs(text: &str, assessment: &mut RiskAssessment) -> (GuardOutcome, String) {
        let buffer = LogBuffer::default();
        let outcome = tracing::subscriber::with_default(buffer.subscriber(), || {
            apply_keyword_guard(text, assessment)
        });
        (outcome, buffer.contents())
    }

    fn model_result(risk_score: u8) -> RiskAssessment {
        RiskAssessment {
            risk_score,
            imminent_risk: false,
            risk_summary: "Conflicto con lenguaje agresivo.".to_string(),
            categories: vec!["amenaza_velada".to_string()],
            examples: Vec::new(),
            recommendations: vec!["Documenta los mensajes.".to_string()],
            origin: Origin::Counterpart,
            affected_party: AffectedParty::User,
        }
    }

    #[test]
    fn test_critical_threat_forces_imminent_risk() {
        let mut assessment = model_result(30);

        let outcome = apply_keyword_guard("Si sales hoy te voy a matar", &mut assessment);

        assert_eq!(
            outcome,
            GuardOutcome::Overridden {
                phrase: "te voy a matar"
            }
        );
        assert!(assessment.imminent_risk);
        assert_eq!(assessment.risk_score, OVERRIDE_SCORE_FLOOR);
        assert!(assessment.risk_summary.starts_with("Conflicto con lenguaje agresivo."));
        assert!(assessment.risk_summary.ends_with(OVERRIDE_SUMMARY_NOTE));
        assert_eq!(assessment.recommendations[0], OVERRIDE_URGENT_RECOMMENDATION);
        assert_eq!(assessment.recommendations[1], "Documenta los mensajes.");
    }

    #[test]
    fn test_urgent_recommendation_moved_first_when_already_present() {
        let mut assessment = model_result(30);
        assessment
            .recommendations
            .push(OVERRIDE_URGENT_RECOMMENDATION.to_string());

        apply_keyword_guard("te voy a matar", &mut assessment);

        assert_eq!(assessment.recommendations.len(), 2);
        assert_eq!(assessment.recommendations[0], OVERRIDE_URGENT_RECOMMENDATION);
        assert_eq!(assessment.recommendations[1], "Documenta los mensajes.");
    }

    #[test]
    fn test_override_keeps_higher_score() {
        let mut assessment = model_result(97);

        apply_keyword_guard("me voy a matar", &mut assessment);

        assert!(assessment.imminent_risk);
        assert_eq!(assessment.risk_score, 97);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let mut assessment = model_result(10);

        let outcome = apply_keyword_guard("¡TE VOY A MATAR!", &mut assessment);

        assert!(matches!(outcome, GuardOutcome::Overridden { .. }));
        assert!(assessment.imminent_risk);
    }

    #[test]
    fn test_empty_summary_gets_note_only() {
        let mut assessment = model_result(0);
        assessment.risk_summary = String::new();

        apply_keyword_guard("me voy a matar", &mut assessment);

        assert_eq!(assessment.risk_summary, OVERRIDE_SUMMARY_NOTE);
    }

    #[test]
    fn test_non_critical_phrase_only_warns() {
        let mut assessment = model_result(40);
        let before = assessment.clone();

        let (outcome, logs) = guard_with_logs("no quiero vivir más", &mut assessment);

        assert_eq!(
            outcome,
            GuardOutcome::Flagged {
                phrases: vec!["no quiero vivir"]
            }
        );
        assert_eq!(assessment, before);
        assert!(logs.contains("WARN"));
        assert!(logs.contains("no quiero vivir"));
        assert!(logs.contains("assessment left unchanged"));
    }

    #[test]
    fn test_threat_outside_critical_subset_is_not_overridden() {
        let mut assessment = model_result(30);
        let before = assessment.clone();

        let (outcome, logs) = guard_with_logs("voy a hacerte daño", &mut assessment);

        assert_eq!(
            outcome,
            GuardOutcome::Flagged {
                phrases: vec!["voy a hacerte daño"]
            }
        );
        assert_eq!(assessment, before);
        assert!(!assessment.imminent_risk);
        assert_eq!(assessment.risk_score, 30);
        assert!(logs.contains("WARN"));
    }

    #[test]
    fn test_already_imminent_is_noop() {
        let mut assessment = model_result(92);
        assessment.imminent_risk = true;
        let before = assessment.clone();

        let outcome = apply_keyword_guard("te voy a matar", &mut assessment);

        assert_eq!(outcome, GuardOutcome::AlreadyImminent);
        assert_eq!(assessment, before);
    }

    #[test]
    fn test_no_match() {
        let mut assessment = model_result(20);
        let before = assessment.clone();

        let (outcome, logs) = guard_with_logs("Nos vemos mañana", &mut assessment);

        assert_eq!(outcome, GuardOutcome::NoMatch);
        assert_eq!(assessment, before);
        assert!(!logs.contains("WARN"));
    }

    #[test]
    fn test_find_markers_reports_both_lists() {
        let matches = find_markers("Quiero morir. Te voy a matar.");

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].kind, MarkerKind::SuicidalIdeation);
        assert!(!matches[0].critical);
        assert_eq!(matches[1].kind, MarkerKind::DirectThreat);
        assert!(matches[1].critical);
    }

    #[test]
    fn test_critical_subset_is_in_marker_lists() {
        for phrase in CRITICAL_MARKERS {
            assert!(
                SUICIDAL_IDEATION_MARKERS.contains(phrase) || DIRECT_THREAT_MARKERS.contains(phrase)
            );
        }
    }
}
