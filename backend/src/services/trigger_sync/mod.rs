//! # Sync Request Queue
//!
//! A polling handshake between the dashboard and a device:
//!
//! - `POST /trigger_sync`: the dashboard asks for a sync. At most one request
//!   is pending at a time; asking again while one is pending reuses it.
//! - `GET /trigger_sync`: the device (every few seconds) and the dashboard see
//!   whether a request is pending and how the last one ended.
//! - `GET /trigger_sync?action=complete&status=completed|failed`: the device
//!   settles every pending request. A successful `POST /sync` does the same
//!   as part of its transaction.
//!
//! Requests only move `pending -> completed | failed`; settled rows are kept
//! as history and never reopened.

mod complete;
mod poll;
mod request;

use crate::services::unsupported_method;
use actix_web::{web, Resource};

pub fn configure_routes() -> Resource {
    web::resource("/trigger_sync")
        .route(web::get().to(poll::process))
        .route(web::post().to(request::process))
        .default_service(web::to(unsupported_method))
}
