//! HTTP handlers and route configuration.

mod errors;
mod health;

use actix_web::web;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PathConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "Rejected path parameter");
        AppError::NotFound.into()
    }))
    .route("/", web::get().to(health::health_check))
    .service(
        web::scope("/api/errors")
            .route("", web::get().to(errors::list_errors))
            .route("", web::post().to(errors::create_error))
            .route("/{id}", web::get().to(errors::get_error))
            .route("/{id}", web::put().to(errors::update_error))
            .route("/{id}", web::delete().to(errors::delete_error)),
    );
}
