//! `GET /farmers?search=<substr>`: the farmer registry with per-farmer reading
//! counts, as shown on the dashboard's farmer table.

mod list;

use crate::services::unsupported_method;
use actix_web::{web, Resource};

pub fn configure_routes() -> Resource {
    web::resource("/farmers")
        .route(web::get().to(list::process))
        .default_service(web::to(unsupported_method))
}
