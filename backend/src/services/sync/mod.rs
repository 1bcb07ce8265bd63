//! # Device Sync Service
//!
//! `POST /sync` is the only write path for farmers and readings. A device
//! uploads its whole local backlog as two CSV documents embedded in a JSON
//! body; the server ingests both in a single transaction and answers with the
//! counts, the current SMS settings and its wall-clock time.
//!
//! Re-sending a payload is always safe: farmers are upserted and readings
//! already stored for the same farmer and timestamp are skipped, so a device
//! that never saw the acknowledgment can simply try again.

mod csv_rows;
pub(crate) mod ingest;

use crate::services::unsupported_method;
use actix_web::{web, Resource};

pub fn configure_routes() -> Resource {
    web::resource("/sync")
        .route(web::post().to(ingest::process))
        .default_service(web::to(unsupported_method))
}
