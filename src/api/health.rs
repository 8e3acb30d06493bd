//! Health check endpoints for Kubernetes liveness and readiness probes

use actix_web::{HttpResponse, Responder, get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::service::RiskAssessmentService;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadinessStatus {
    pub status: String,
    pub version: String,
    pub dependencies: DependencyHealth,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DependencyHealth {
    /// Analysis backend in use
    pub model: String,
    /// "configured" or "disabled"
    pub notifier: String,
}

/// Liveness probe endpoint
///
/// Always returns 200 OK if the service is running.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive", body = HealthStatus)
    ),
    tag = "health"
)]
#[get("/health/live")]
pub async fn liveness() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness probe endpoint
///
/// The service is ready as soon as it is built: a missing notifier only
/// degrades emergency notification, which is reported as a dependency.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessStatus)
    ),
    tag = "health"
)]
#[get("/health/ready")]
pub async fn readiness(service: web::Data<RiskAssessmentService>) -> impl Responder {
    let notifier_status = if service.notifier_configured() {
        "configured"
    } else {
        tracing::debug!("Emergency notifier not configured");
        "disabled"
    };

    HttpResponse::Ok().json(ReadinessStatus {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        dependencies: DependencyHealth {
            model: service.backend().to_string(),
            notifier: notifier_status.to_string(),
        },
    })
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(liveness).service(readiness);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{HeuristicModel, SendGridConfig, SendGridNotifier};
    use actix_web::{App, test};
    use std::sync::Arc;
    use std::time::Duration;

    #[actix_web::test]
    async fn test_readiness_reports_dependencies() {
        let notifier = SendGridNotifier::new(SendGridConfig {
            api_key: None,
            from_email: None,
            base_url: "http://127.0.0.1:9".to_string(),
        });
        let service = web::Data::new(RiskAssessmentService::new(
            Arc::new(HeuristicModel::new()),
            Arc::new(notifier),
            Duration::from_secs(1),
            Duration::from_secs(1),
        ));
        let app = test::init_service(App::new().app_data(service).configure(configure)).await;

        let req = test::TestRequest::get().uri("/health/ready").to_request();
        let status: ReadinessStatus = test::call_and_read_body_json(&app, req).await;

        assert_eq!(status.status, "ready");
        assert_eq!(status.dependencies.model, "heuristic");
        assert_eq!(status.dependencies.notifier, "disabled");

        let req = test::TestRequest::get().uri("/health/live").to_request();
        let live: HealthStatus = test::call_and_read_body_json(&app, req).await;
        assert_eq!(live.status, "ok");
    }
}
