//! `GET /readings?farmer_id=&limit=&offset=`: newest-first pages of soil
//! readings with statistics over the whole filtered set.

mod list;

use crate::services::unsupported_method;
use actix_web::{web, Resource};

pub fn configure_routes() -> Resource {
    web::resource("/readings")
        .route(web::get().to(list::process))
        .default_service(web::to(unsupported_method))
}
