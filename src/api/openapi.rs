//! OpenAPI specification endpoints

use actix_web::{HttpResponse, Responder, get};
use utoipa::OpenApi;

use crate::api::error::ErrorResponse;
use crate::api::health::{DependencyHealth, HealthStatus, ReadinessStatus};
use crate::model::{
    AffectedParty, Origin, RelationshipType, RequestContext, RiskAssessment, UserGender,
    UserProfile,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Alumbra risk assessment API",
        description = "Emotional-abuse risk analysis of conversations with emergency escalation"
    ),
    paths(
        crate::api::analysis::analyze,
        crate::api::health::liveness,
        crate::api::health::readiness,
    ),
    components(schemas(
        RequestContext,
        UserProfile,
        UserGender,
        RelationshipType,
        RiskAssessment,
        Origin,
        AffectedParty,
        ErrorResponse,
        HealthStatus,
        ReadinessStatus,
        DependencyHealth,
    )),
    tags(
        (name = "analysis", description = "Conversation analysis"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
#[get("/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Serve OpenAPI YAML specification
#[get("/openapi.yaml")]
pub async fn openapi_yaml() -> impl Responder {
    match ApiDoc::openapi().to_yaml() {
        Ok(yaml) => HttpResponse::Ok().content_type("text/yaml").body(yaml),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render OpenAPI YAML");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(openapi_json).service(openapi_yaml);
}
