//! REST API endpoint for conversation analysis

use actix_web::{HttpResponse, post, web};

use crate::api::error::ApiError;
use crate::model::{RequestContext, RiskAssessment};
use crate::service::RiskAssessmentService;

/// Analyze a conversation for emotional abuse and imminent risk
///
/// Always answers with an assessment once the request is valid: model or
/// notification failures are reflected in the assessment itself.
#[utoipa::path(
    post,
    path = "/v1/analyze",
    request_body = RequestContext,
    responses(
        (status = 200, description = "Conversation analyzed", body = RiskAssessment),
        (status = 400, description = "Invalid request", body = crate::api::error::ErrorResponse)
    ),
    tag = "analysis"
)]
#[post("/v1/analyze")]
pub async fn analyze(
    service: web::Data<RiskAssessmentService>,
    body: web::Json<RequestContext>,
) -> Result<HttpResponse, ApiError> {
    let context = body.into_inner();

    if context.text.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Conversation text must not be empty".to_string(),
        ));
    }

    let assessment = service.assess(&context).await;
    Ok(HttpResponse::Ok().json(assessment))
}

/// Configure analysis routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(analyze);
}
