//! Prompts for conversation analysis

use crate::model::{RelationshipType, RequestContext, UserGender};

/// System prompt for conversation analysis
pub const ANALYSIS_SYSTEM_PROMPT: &str = r#"You are a psychologist specialized in detecting emotional abuse and manipulation in interpersonal relationships through text.

You must:
- Base every conclusion on the conversation provided
- Consider seriously that the person who submitted the text may be the one exercising the abuse
- Quote examples exactly as they appear in the conversation, character for character
- Write the summary and recommendations in Spanish, specific and actionable, explaining why

Do not:
- Invent quotes or facts that are not in the conversation
- Rely on gender stereotypes
- Flag imminent risk unless there is probable immediate danger of suicide, self-harm or physical violence

Your output must be structured JSON only and conform to the requested schema."#;

/// Build the analysis prompt for one request
///
/// Only the fields relevant to the analysis are embedded; the profile and
/// emergency contact never reach the model.
pub fn build_analysis_prompt(context: &RequestContext) -> String {
    let gender_guidance = match (context.user_gender, context.relationship) {
        (UserGender::Male | UserGender::Female, RelationshipType::Partner) => {
            "Consider gender dynamics associated with abuse in couples (economic control, forced traditional roles) without falling into stereotypes."
        }
        _ => "Keep a gender-neutral approach.",
    };

    format!(
        r#"Analyze the following conversation for emotional abuse and manipulation.

## Context
- Gender of the user who submitted the text: {gender}
- Relationship type: {relationship}
- {gender_guidance}

## Conversation
{text}

## Instructions
1. Identify patterns such as gaslighting, blame, social isolation, minimization, threats (veiled or direct), conditioning of affection, emotional invalidation, excessive jealousy, control and humiliation.
2. Evaluate the power dynamic: who imposes their will, whether there is fear or intimidation, whether limits are respected.
3. Determine the origin of the problematic behavior: "user" (the person who submitted the text), "counterpart" (the other person), "ambiguous" (both, or unclear), "external" (an influence outside the conversation) or "none".
4. Determine who suffers the negative impact: "user", "counterpart", "both", "group" or "none".
5. Estimate risk_score from 0 to 100 considering frequency, intensity and type of tactics.
6. Set imminent_risk to true only for probable immediate danger of suicide, self-harm or physical violence; in that case risk_score must be at least 90 and the first recommendations must be urgent.
7. Adapt the recommendations to the origin: protection and empowerment when the counterpart is the origin, self-awareness and behavior change when the user is the origin, individual and relational steps when it is ambiguous.
"#,
        gender = context.user_gender.prompt_label(),
        relationship = context.relationship.prompt_label(),
        gender_guidance = gender_guidance,
        text = context.text,
    )
}
