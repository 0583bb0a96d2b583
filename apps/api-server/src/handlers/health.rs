//! Health check endpoint.

use actix_web::HttpResponse;
use nce_shared::dto::HealthResponse;

/// Name reported by the health check.
pub const SERVICE_NAME: &str = "NCE Error Management API";

/// Health check endpoint - returns server status.
///
/// GET /
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: SERVICE_NAME.to_string(),
    })
}
