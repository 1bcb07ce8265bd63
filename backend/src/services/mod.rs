//! HTTP surface of the farmsync backend.
//!
//! Each sub-module owns one path and exposes `configure_routes()`, mirroring
//! the endpoints the dashboard and device firmware call:
//!
//! - `farmers`: `GET /farmers`
//! - `readings`: `GET /readings`
//! - `sms_settings`: `GET|POST /sms_settings`
//! - `sync`: `POST /sync`
//! - `trigger_sync`: `GET|POST /trigger_sync`
//! - `health`: `GET /health`

pub mod farmers;
pub mod health;
pub mod readings;
pub mod sms_settings;
pub mod sync;
pub mod trigger_sync;

use crate::error::{json_error_handler, query_error_handler, AppError};
use crate::store::Store;
use actix_web::http::Method;
use actix_web::middleware::DefaultHeaders;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};

/// Registers the store, extractor limits and every API route.
pub fn configure(store: Store, json_limit: usize) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(store))
            .app_data(
                web::JsonConfig::default()
                    .limit(json_limit)
                    .error_handler(json_error_handler),
            )
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .service(farmers::configure_routes())
            .service(readings::configure_routes())
            .service(sms_settings::configure_routes())
            .service(sync::configure_routes())
            .service(trigger_sync::configure_routes())
            .service(health::configure_routes());
    }
}

/// CORS headers for the browser dashboard, which may be hosted elsewhere.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", "GET, POST, OPTIONS"))
        .add(("Access-Control-Allow-Headers", "Content-Type"))
}

/// Fallback for every API resource: answers CORS preflight, rejects the rest.
pub(crate) async fn unsupported_method(req: HttpRequest) -> HttpResponse {
    if req.method() == Method::OPTIONS {
        HttpResponse::Ok().finish()
    } else {
        AppError::MethodNotAllowed.error_response()
    }
}
