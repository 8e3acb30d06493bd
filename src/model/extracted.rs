use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Conversation analysis as returned by the LLM
///
/// Every field is required: a response missing any of them is malformed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedRiskAssessment {
    #[schemars(
        description = "Overall estimated risk of abuse or manipulation, from 0 (very low) to 100 (very high)"
    )]
    pub risk_score: i64,

    #[schemars(
        description = "True only when there is probable immediate danger of suicide, self-harm or physical violence. When true, risk_score must be at least 90"
    )]
    pub imminent_risk: bool,

    #[schemars(
        description = "One or two sentences explaining the nature of the detected risk. Required when risk_score is above 0"
    )]
    pub risk_summary: String,

    #[schemars(
        description = "Specific abuse or manipulation patterns detected (e.g. gaslighting, culpabilizacion, aislamiento, ideacion_suicida). Empty array if none"
    )]
    pub categories: Vec<String>,

    #[schemars(
        description = "Exact verbatim quotes from the conversation that exemplify the detected categories. Empty array if none"
    )]
    pub examples: Vec<String>,

    #[schemars(
        description = "Specific, actionable recommendations adapted to who the origin is. Urgent items first"
    )]
    pub recommendations: Vec<String>,

    pub origin: ExtractedOrigin,

    pub affected_party: ExtractedAffectedParty,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExtractedOrigin {
    /// The person who submitted the conversation
    #[serde(alias = "usuario")]
    User,
    /// The other person in the conversation
    #[serde(alias = "interlocutor")]
    Counterpart,
    /// Both show problematic behavior or it is unclear
    #[serde(alias = "ambiguo")]
    Ambiguous,
    /// No relevant abuse detected
    #[serde(alias = "ninguno")]
    None,
    /// An influence outside the conversation
    #[serde(alias = "externo")]
    External,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExtractedAffectedParty {
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
