//! # SMS Settings Service
//!
//! The single configuration row the device applies after each sync: whether
//! it should text a report to the farmer, and the message template with
//! `{token}` placeholders it fills in from a reading.
//!
//! - `GET /sms_settings`: returns the row, creating the default one first if
//!   the database has never been configured.
//! - `POST /sms_settings`: replaces the row. The template must not be blank.

mod get;
pub(crate) mod save;
pub mod template;

pub use get::get_or_create_settings;

use crate::services::unsupported_method;
use actix_web::{web, Resource};

pub fn configure_routes() -> Resource {
    web::resource("/sms_settings")
        .route(web::get().to(get::process))
        .route(web::post().to(save::process))
        .default_service(web::to(unsupported_method))
}
