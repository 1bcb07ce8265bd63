use crate::services::unsupported_method;
use actix_web::{web, HttpResponse, Resource};
use serde_json::json;

/// Liveness probe for uptime checks; does not touch the database.
pub fn configure_routes() -> Resource {
    web::resource("/health")
        .route(web::get().to(|| async {
            HttpResponse::Ok().json(json!({ "success": true, "status": "ok" }))
        }))
        .default_service(web::to(unsupported_method))
}
