pub mod analysis;
pub mod guard;
pub mod heuristic;
#[cfg(test)]
mod log_capture;
pub mod notifier;
pub mod recommendations;

pub use analysis::{AssessmentModel, OpenAiAssessmentModel, RiskAssessmentService};
pub use heuristic::HeuristicModel;
pub use notifier::{EmergencyNotifier, SendGridConfig, SendGridNotifier};
