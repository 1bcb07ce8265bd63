//! Types shared between the farmsync backend and its clients (dashboard and
//! field devices). Everything here is plain serde data; no I/O.

pub mod model;
pub mod requests;
