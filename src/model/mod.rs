pub mod assessment;
pub mod config;
pub mod context;
pub mod extracted;

pub use assessment::{AffectedParty, Origin, RiskAssessment};
pub use config::{AnalysisBackend, AnalysisConfig, Config, NotifierConfig};
pub use context::{RelationshipType, RequestContext, UserGender, UserProfile};
pub use extracted::{ExtractedAffectedParty, ExtractedOrigin, ExtractedRiskAssessment};
