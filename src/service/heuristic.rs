//! Offline keyword analyzer
//!
//! Produces a coarse analysis without any network access. Used when no LLM is
//! configured and as a deterministic backend in tests.

use async_trait::async_trait;

use crate::model::{ExtractedAffectedParty, ExtractedOrigin, ExtractedRiskAssessment, RequestContext};
use crate::service::analysis::{AnalysisError, AssessmentModel};

const BASE_RISK_SCORE: i64 = 30;
const ELEVATED_RISK_THRESHOLD: i64 = 70;
/// One extra point of risk per this many characters of conversation
const CHARS_PER_LENGTH_POINT: usize = 150;

const DEFAULT_SUMMARY: &str = "No se detectaron riesgos significativos.";
const DEFAULT_RECOMMENDATIONS: &[&str] = &[
    "Recuerda comunicarte de forma asertiva.",
    "Confía en tu percepción de la situación.",
];
const ELEVATED_RISK_RECOMMENDATIONS: &[&str] = &[
    "Considera buscar apoyo profesional si la situación se repite.",
    "Habla con alguien de confianza sobre lo que está pasando.",
];

/// A pattern rule; phrases are lowercase
struct PatternRule {
    phrases: &'static [&'static str],
    category: &'static str,
    score_floor: i64,
    recommendation: &'static str,
    origin: Option<ExtractedOrigin>,
    summary: Option<&'static str>,
}

/// A rule that marks imminent risk and replaces the recommendations
struct ImminentRule {
    phrases: &'static [&'static str],
    category: &'static str,
    score: i64,
    summary: &'static str,
    recommendations: &'static [&'static str],
}

static PATTERN_RULES: &[PatternRule] = &[
    PatternRule {
        phrases: &["if you really loved me", "si me quisieras de verdad"],
        category: "manipulacion",
        score_floor: 75,
        recommendation: "Cuestiona las condiciones que se ponen al afecto: el cariño no debería depender de ceder.",
        origin: Some(ExtractedOrigin::Counterpart),
        summary: Some("Riesgo de manipulación emocional."),
    },
    PatternRule {
        phrases: &["you're crazy", "estás loco", "estás loca"],
        category: "gaslighting",
        score_floor: 85,
        recommendation: "El gaslighting busca que dudes de tu realidad. Confía en tu memoria y anota lo ocurrido.",
        origin: Some(ExtractedOrigin::Counterpart),
        summary: Some("Riesgo de gaslighting."),
    },
    PatternRule {
        phrases: &["nobody else understands you", "nadie más te va a entender"],
        category: "aislamiento",
        score_floor: 80,
        recommendation: "Fomentar el aislamiento es una señal de alerta. Mantén el contacto con tu red de apoyo.",
        origin: Some(ExtractedOrigin::Counterpart),
        summary: Some("Riesgo de aislamiento social."),
    },
    PatternRule {
        phrases: &["you always", "you never", "siempre haces", "nunca haces"],
        category: "generalizacion",
        score_floor: 60,
        recommendation: "Las generalizaciones suelen ser injustas; habla de situaciones concretas.",
        origin: None,
        summary: None,
    },
    PatternRule {
        phrases: &["it's your fault", "es tu culpa"],
        category: "culpabilizacion",
        score_floor: 70,
        recommendation: "No eres responsable de las emociones ajenas.",
        origin: Some(ExtractedOrigin::Counterpart),
        summary: Some("Riesgo de culpabilización."),
    },
    PatternRule {
        phrases: &["i only get angry because you make me", "me haces enojar"],
        category: "culpabilizacion",
        score_floor: 70,
        recommendation: "Asume la responsabilidad de tus emociones y exprésalas sin culpar a la otra persona.",
        origin: Some(ExtractedOrigin::User),
        summary: Some("Posible culpabilización ejercida por el usuario."),
    },
];

static IMMINENT_RULES: &[ImminentRule] = &[
    ImminentRule {
        phrases: &["quiero morir", "matarme"],
        category: "ideacion_suicida",
        score: 95,
        summary: "RIESGO INMINENTE: ideación suicida detectada.",
        recommendations: &[
            "URGENTE: contacta con ayuda profesional inmediatamente, por ejemplo una línea de crisis.",
            "Habla con alguien de confianza ahora mismo.",
        ],
    },
    ImminentRule {
        phrases: &["te voy a matar", "voy a hacerte daño"],
        category: "amenaza_directa",
        score: 98,
        summary: "RIESGO INMINENTE: amenaza directa de violencia detectada.",
        recommendations: &[
            "URGENTE: tu seguridad es prioritaria. Busca un lugar seguro y contacta con las autoridades.",
            "Informa a alguien de confianza sobre la amenaza.",
        ],
    },
];

/// Keyword-driven analysis backend
#[derive(Debug, Default)]
pub struct HeuristicModel;

impl HeuristicModel {
    pub fn new() -> Self {
        Self
    }

    /// Analyze a conversation synchronously
    pub fn analyze_text(&self, text: &str) -> ExtractedRiskAssessment {
        let mut risk_score = BASE_RISK_SCORE;
        let mut imminent_risk = false;
        let mut risk_summary = DEFAULT_SUMMARY.to_string();
        let mut categories: Vec<String> = Vec::new();
        let mut examples: Vec<String> = Vec::new();
        let mut recommendations: Vec<String> =
            DEFAULT_RECOMMENDATIONS.iter().map(|r| r.to_string()).collect();
        let mut origin = ExtractedOrigin::None;

        for rule in PATTERN_RULES {
            let quotes = find_quotes(text, rule.phrases);
            if quotes.is_empty() {
                continue;
            }
            risk_score = risk_score.max(rule.score_floor);
            push_unique(&mut categories, rule.category);
            for quote in quotes {
                push_unique(&mut examples, quote);
            }
            push_unique(&mut recommendations, rule.recommendation);
            if let Some(rule_origin) = rule.origin {
                origin = rule_origin;
            }
            if let Some(summary) = rule.summary {
                risk_summary = summary.to_string();
            }
        }

        for rule in IMMINENT_RULES {
            let quotes = find_quotes(text, rule.phrases);
            if quotes.is_empty() {
                continue;
            }
            risk_score = rule.score;
            imminent_risk = true;
            push_unique(&mut categories, rule.category);
            for quote in quotes {
                push_unique(&mut examples, quote);
            }
            risk_summary = rule.summary.to_string();
            recommendations = rule.recommendations.iter().map(|r| r.to_string()).collect();
        }

        if risk_score > ELEVATED_RISK_THRESHOLD && !imminent_risk {
            for recommendation in ELEVATED_RISK_RECOMMENDATIONS {
                push_unique(&mut recommendations, *recommendation);
            }
        }

        let length_bonus = (text.chars().count() / CHARS_PER_LENGTH_POINT) as i64;
        risk_score = (risk_score + length_bonus).min(100);
        if imminent_risk {
            risk_score = risk_score.max(90);
        }

        let affected_party = match origin {
            ExtractedOrigin::Counterpart => ExtractedAffectedParty::User,
            ExtractedOrigin::User => ExtractedAffectedParty::Counterpart,
            _ => ExtractedAffectedParty::None,
        };

        ExtractedRiskAssessment {
            risk_score,
            imminent_risk,
            risk_summary,
            categories,
            examples,
            recommendations,
            origin,
            affected_party,
        }
    }
}

#[async_trait]
impl AssessmentModel for HeuristicModel {
    async fn analyze(
        &self,
        context: &RequestContext,
    ) -> Result<ExtractedRiskAssessment, AnalysisError> {
        Ok(self.analyze_text(&context.text))
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

fn push_unique(items: &mut Vec<String>, item: impl Into<String>) {
    let item = item.into();
    if !items.contains(&item) {
        items.push(item);
    }
}

/// Verbatim quotes of every phrase occurring in `text`, case-insensitively
fn find_quotes(text: &str, phrases: &[&str]) -> Vec<String> {
    phrases
        .iter()
        .filter_map(|phrase| find_verbatim(text, phrase))
        .map(str::to_string)
        .collect()
}

/// Locate `needle` (lowercase) in `text` ignoring case and return the original slice
fn find_verbatim<'a>(text: &'a str, needle: &str) -> Option<&'a str> {
    text.char_indices()
        .find_map(|(start, _)| match_len_at(&text[start..], needle).map(|len| &text[start..start + len]))
}

fn match_len_at(haystack: &str, needle: &str) -> Option<usize> {
    let mut remaining = needle.chars().peekable();
    for (offset, ch) in haystack.char_indices() {
        for lower in ch.to_lowercase() {
            if remaining.next() != Some(lower) {
                return None;
            }
        }
        if remaining.peek().is_none() {
            return Some(offset + ch.len_utf8());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calm_conversation() {
        let result = HeuristicModel::new().analyze_text("¿Cenamos a las nueve?");

        assert_eq!(result.risk_score, BASE_RISK_SCORE);
        assert!(!result.imminent_risk);
        assert!(result.categories.is_empty());
        assert!(result.examples.is_empty());
        assert_eq!(result.recommendations.len(), DEFAULT_RECOMMENDATIONS.len());
        assert!(matches!(result.origin, ExtractedOrigin::None));
    }

    #[test]
    fn test_gaslighting_quotes_are_verbatim() {
        let text = "A: ¡Estás LOCA! Eso nunca pasó.";
        let result = HeuristicModel::new().analyze_text(text);

        assert_eq!(result.risk_score, 85);
        assert_eq!(result.categories, vec!["gaslighting".to_string()]);
        assert_eq!(result.examples, vec!["Estás LOCA".to_string()]);
        assert!(text.contains(&result.examples[0]));
        assert!(matches!(result.origin, ExtractedOrigin::Counterpart));
        assert!(matches!(result.affected_party, ExtractedAffectedParty::User));
        assert!(result.recommendations.len() > DEFAULT_RECOMMENDATIONS.len() + 1);
    }

    #[test]
    fn test_user_side_blame() {
        let result = HeuristicModel::new().analyze_text("Me haces enojar cuando llegas tarde");

        assert_eq!(result.risk_score, 70);
        assert!(matches!(result.origin, ExtractedOrigin::User));
        assert!(matches!(result.affected_party, ExtractedAffectedParty::Counterpart));
        assert_eq!(result.examples, vec!["Me haces enojar".to_string()]);
    }

    #[test]
    fn test_suicidal_ideation_replaces_recommendations() {
        let result = HeuristicModel::new().analyze_text("Es tu culpa. Ya no aguanto, quiero morir");

        assert!(result.imminent_risk);
        assert_eq!(result.risk_score, 95);
        assert!(result.categories.contains(&"ideacion_suicida".to_string()));
        assert!(result.categories.contains(&"culpabilizacion".to_string()));
        assert_eq!(result.recommendations.len(), 2);
        assert!(result.recommendations[0].starts_with("URGENTE"));
    }

    #[test]
    fn test_length_bonus_is_capped() {
        let text = format!("estás loco {}", "bla ".repeat(1000));
        let result = HeuristicModel::new().analyze_text(&text);

        assert_eq!(result.risk_score, 100);
    }

    #[test]
    fn test_find_verbatim_handles_accents_and_case() {
        assert_eq!(find_verbatim("Voy a HACERTE DAÑO", "voy a hacerte daño"), Some("Voy a HACERTE DAÑO"));
        assert_eq!(find_verbatim("nada que ver", "estás loco"), None);
        assert_eq!(find_verbatim("mata", "matarme"), None);
    }
}
