//! Request context supplied by the caller for one analysis

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Gender of the user submitting the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserGender {
    #[serde(alias = "hombre")]
    Male,
    #[serde(alias = "mujer")]
    Female,
    #[serde(alias = "prefiero_no_decirlo")]
    Undisclosed,
}

impl UserGender {
    pub fn prompt_label(&self) -> &'static str {
        match self {
            UserGender::Male => "hombre",
            UserGender::Female => "mujer",
            UserGender::Undisclosed => "prefiero_no_decirlo",
        }
    }
}

/// Relationship between the people in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    #[serde(alias = "pareja")]
    Partner,
    #[serde(alias = "amistad")]
    Friendship,
    #[serde(alias = "familiar")]
    Family,
}

impl RelationshipType {
    pub fn prompt_label(&self) -> &'static str {
        match self {
            RelationshipType::Partner => "pareja",
            RelationshipType::Friendship => "amistad",
            RelationshipType::Family => "familiar",
        }
    }
}

/// Profile of the user requesting the analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub name: String,
    pub surname: String,
    pub age: u16,
    /// Address notified when imminent risk is detected
    #[serde(default)]
    pub emergency_contact_email: Option<String>,
}

impl UserProfile {
    /// Name shown to the emergency contact
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name.trim(), self.surname.trim())
            .trim()
            .to_string()
    }

    /// Emergency contact address, if it passes the loose syntactic check
    ///
    /// An address is usable when it is non-empty and contains an `@`.
    pub fn usable_contact_address(&self) -> Option<&str> {
        self.emergency_contact_email
            .as_deref()
            .map(str::trim)
            .filter(|address| !address.is_empty() && address.contains('@'))
    }
}

/// Everything needed to analyze one conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RequestContext {
    /// Conversation transcript
    pub text: String,
    pub user_gender: UserGender,
    pub relationship: RelationshipType,
    pub profile: UserProfile,
}
