//! Emergency e-mail content

use crate::model::RiskAssessment;
use crate::service::notifier::EmergencyNotification;

const MAX_EXAMPLES: usize = 5;
const MAX_RECOMMENDATIONS: usize = 3;
const MAX_RECOMMENDATION_CHARS: usize = 250;

pub fn subject(user_name: &str) -> String {
    format!("Alerta Urgente de Alumbra sobre {}", user_name)
}

pub fn text_body(notification: &EmergencyNotification<'_>) -> String {
    format!(
        "Hola,\n\nEste es un mensaje automático de Alumbra.\n\n\
         Se ha detectado una situación de riesgo potencialmente grave para {name} basada en un análisis de conversación reciente.\n\n\
         Resumen del Riesgo: {summary}\n\n\
         Se recomienda contactar a {name} y considerar buscar ayuda profesional urgentemente.\n\n\
         Detalles del Análisis:\n{details}\n\
         Atentamente,\nEl equipo de Alumbra",
        name = notification.user_name,
        summary = notification.risk_summary,
        details = text_details(notification.assessment),
    )
}

pub fn html_body(notification: &EmergencyNotification<'_>) -> String {
    let name = escape_html(notification.user_name);
    format!(
        r#"<p>Hola,</p>
<p>Este es un mensaje automático de <strong>Alumbra</strong>.</p>
<p>Se ha detectado una situación de <strong>riesgo potencialmente grave para {name}</strong> basada en un análisis de conversación reciente.</p>
<hr>
<h3>Resumen del Riesgo:</h3>
<p style="color: red; font-weight: bold;">{summary}</p>
<hr>
<h3>Detalles del Análisis:</h3>
{details}
<hr>
<p>Se recomienda contactar a {name} y considerar buscar ayuda profesional urgentemente.</p>
<p>Atentamente,<br/>El equipo de Alumbra</p>"#,
        name = name,
        summary = escape_html(notification.risk_summary),
        details = html_details(notification.assessment),
    )
}

fn text_details(assessment: &RiskAssessment) -> String {
    let mut text = format!("Nivel de Riesgo: {}/100\n", assessment.risk_score);
    text.push_str(&format!(
        "Riesgo Inminente Detectado: {}\n",
        if assessment.imminent_risk { "Sí" } else { "No" }
    ));
    text.push_str(&format!("Posible Origen: {}\n", assessment.origin.label()));
    text.push_str(&format!(
        "Persona Afectada Principalmente: {}\n",
        assessment.affected_party.display_text()
    ));

    if !assessment.categories.is_empty() {
        text.push_str(&format!(
            "Categorías Detectadas: {}\n",
            assessment.categories.join(", ")
        ));
    }

    if !assessment.examples.is_empty() {
        text.push_str("Ejemplos Problemáticos Clave:\n");
        for example in assessment.examples.iter().take(MAX_EXAMPLES) {
            text.push_str(&format!("- \"{}\"\n", example));
        }
    }

    let recommendations = key_recommendations(assessment);
    if !recommendations.is_empty() {
        text.push_str("Recomendaciones Clave:\n");
        for recommendation in recommendations {
            text.push_str(&format!("- {}\n", truncate(recommendation)));
        }
    }

    text
}

fn html_details(assessment: &RiskAssessment) -> String {
    let mut html = format!(
        "<p><strong>Nivel de Riesgo:</strong> {}/100</p>",
        assessment.risk_score
    );
    html.push_str(&format!(
        "<p><strong>Riesgo Inminente Detectado:</strong> {}</p>",
        if assessment.imminent_risk { "<strong>Sí</strong>" } else { "No" }
    ));
    html.push_str(&format!(
        "<p><strong>Posible Origen:</strong> {}</p>",
        assessment.origin.label()
    ));
    html.push_str(&format!(
        "<p><strong>Persona Afectada Principalmente:</strong> {}</p>",
        assessment.affected_party.display_text()
    ));

    if !assessment.categories.is_empty() {
        let badges: Vec<String> = assessment
            .categories
            .iter()
            .map(|c| {
                format!(
                    r#"<span style="background-color: #eee; padding: 2px 5px; border-radius: 3px; margin-right: 5px;">{}</span>"#,
                    escape_html(c)
                )
            })
            .collect();
        html.push_str(&format!(
            "<p><strong>Categorías Detectadas:</strong> {}</p>",
            badges.join(" ")
        ));
    }

    if !assessment.examples.is_empty() {
        let items: String = assessment
            .examples
            .iter()
            .take(MAX_EXAMPLES)
            .map(|e| format!("<li><em>\"{}\"</em></li>", escape_html(e)))
            .collect();
        html.push_str(&format!(
            "<p><strong>Ejemplos Problemáticos Clave:</strong></p><ul>{}</ul>",
            items
        ));
    }

    let recommendations = key_recommendations(assessment);
    if !recommendations.is_empty() {
        let items: String = recommendations
            .into_iter()
            .map(|r| format!("<li>{}</li>", escape_html(&truncate(r))))
            .collect();
        html.push_str(&format!(
            "<p><strong>Recomendaciones Clave:</strong></p><ul>{}</ul>",
            items
        ));
    }

    html
}

/// First recommendations worth showing to the contact
///
/// With imminent risk only urgent or safety related items are kept.
fn key_recommendations(assessment: &RiskAssessment) -> Vec<&str> {
    assessment
        .recommendations
        .iter()
        .map(String::as_str)
        .filter(|r| {
            if !assessment.imminent_risk {
                return true;
            }
            let lowered = r.to_lowercase();
            lowered.contains("urgente") || lowered.contains("seguridad")
        })
        .take(MAX_RECOMMENDATIONS)
        .collect()
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_RECOMMENDATION_CHARS {
        return text.to_string();
    }
    let head: String = text.chars().take(MAX_RECOMMENDATION_CHARS).collect();
    format!("{}...", head)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AffectedParty, Origin};

    fn assessment() -> RiskAssessment {
        RiskAssessment {
            risk_score: 98,
            imminent_risk: true,
            risk_summary: "Amenaza directa de violencia.".to_string(),
            categories: vec!["amenaza_directa".to_string()],
            examples: (1..=7).map(|i| format!("ejemplo {}", i)).collect(),
            recommendations: vec![
                "URGENTE: busca un lugar seguro.".to_string(),
                "Habla con alguien de confianza.".to_string(),
                "Tu seguridad es prioritaria.".to_string(),
                format!("URGENTE: {}", "x".repeat(300)),
                "URGENTE: cuarta".to_string(),
            ],
            origin: Origin::Counterpart,
            affected_party: AffectedParty::User,
        }
    }

    fn notification(assessment: &RiskAssessment) -> EmergencyNotification<'_> {
        EmergencyNotification {
            to: "contacto@example.com",
            user_name: "Alex <Ruiz>",
            risk_summary: &assessment.risk_summary,
            assessment,
        }
    }

    #[test]
    fn test_subject() {
        assert_eq!(subject("Alex Ruiz"), "Alerta Urgente de Alumbra sobre Alex Ruiz");
    }

    #[test]
    fn test_key_recommendations_filter_when_imminent() {
        let assessment = assessment();
        let keys = key_recommendations(&assessment);

        assert_eq!(keys.len(), 3);
        assert_eq!(keys[0], "URGENTE: busca un lugar seguro.");
        assert_eq!(keys[1], "Tu seguridad es prioritaria.");
        assert!(!keys.contains(&"Habla con alguien de confianza."));
    }

    #[test]
    fn test_key_recommendations_unfiltered_without_imminent_risk() {
        let mut assessment = assessment();
        assessment.imminent_risk = false;

        let keys = key_recommendations(&assessment);
        assert_eq!(keys[1], "Habla con alguien de confianza.");
    }

    #[test]
    fn test_text_body_limits_and_truncation() {
        let assessment = assessment();
        let body = text_body(&notification(&assessment));

        assert!(body.contains("Nivel de Riesgo: 98/100"));
        assert!(body.contains("Riesgo Inminente Detectado: Sí"));
        assert!(body.contains("Posible Origen: interlocutor"));
        assert!(body.contains("El usuario que proporcionó la conversación"));
        assert!(body.contains("ejemplo 5"));
        assert!(!body.contains("ejemplo 6"));
        assert!(body.contains(&format!("{}...", "x".repeat(241))));
        assert!(!body.contains(&"x".repeat(242)));
    }

    #[test]
    fn test_html_body_escapes_user_content() {
        let assessment = assessment();
        let body = html_body(&notification(&assessment));

        assert!(body.contains("Alex &lt;Ruiz&gt;"));
        assert!(!body.contains("<Ruiz>"));
        assert!(body.contains("<strong>Sí</strong>"));
    }

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate("corto"), "corto");
        let exact = "ñ".repeat(MAX_RECOMMENDATION_CHARS);
        assert_eq!(truncate(&exact), exact);
    }
}
