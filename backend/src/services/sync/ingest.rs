//! # Bulk Sync Ingestion
//!
//! ## Workflow
//!
//! 1.  **Farmers**: every data line of `farmers_csv` with at least
//!     `farmer_id,phone_number,created_at` is upserted. An existing farmer
//!     keeps its `created_at`; phone number and `synced_at` are refreshed.
//!
//! 2.  **Readings**: every data line of `datalog_csv` with at least nine
//!     fields becomes a reading unless one already exists for the same
//!     `(farmer_id, reading_timestamp)`. Farmers go first so a reading may
//!     reference a farmer introduced in the same upload.
//!
//! 3.  **Handshake**: any pending sync request is marked completed, whichever
//!     request prompted this upload.
//!
//! 4.  **Reply data**: the SMS settings are read (created if missing) for the
//!     device to apply.
//!
//! All four steps share one transaction. Short or unparsable lines are skipped
//! and counted; any database error (for example a reading whose farmer is
//! unknown) rolls everything back and the caller gets no counts at all.

use crate::error::AppError;
use crate::services::sms_settings::get_or_create_settings;
use crate::services::sync::csv_rows::{data_rows, lenient_f64};
use crate::store::{format_timestamp, Store};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Datelike, Local, Timelike};
use common::model::sync::{IngestReport, ServerTime};
use common::requests::SyncPayload;
use log::{debug, error, info};
use rusqlite::{params, Connection, Transaction};
use serde_json::json;

const FARMER_FIELDS: usize = 3;
const READING_FIELDS: usize = 9;

/// Handler for `POST /sync`.
pub(crate) async fn process(
    store: web::Data<Store>,
    payload: web::Json<SyncPayload>,
) -> Result<HttpResponse, AppError> {
    let SyncPayload {
        farmers_csv,
        datalog_csv,
    } = payload.into_inner();
    let (Some(farmers_csv), Some(datalog_csv)) = (farmers_csv, datalog_csv) else {
        return Err(AppError::Validation(
            "Missing farmers_csv or datalog_csv in payload".to_string(),
        ));
    };

    let report = store
        .run(move |conn| ingest(conn, &farmers_csv, &datalog_csv))
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": format!(
            "Sync complete. Farmers: {}, Readings: {}",
            report.farmers_imported, report.readings_imported
        ),
        "farmers_imported": report.farmers_imported,
        "readings_imported": report.readings_imported,
        "readings_skipped": report.readings_skipped,
        "rows_malformed": report.rows_malformed,
        "sms_settings": report.sms_settings,
        "server_time": report.server_time,
    })))
}

/// Ingests both CSV documents atomically, stamping rows with the current time.
pub fn ingest(
    conn: &mut Connection,
    farmers_csv: &str,
    datalog_csv: &str,
) -> Result<IngestReport, AppError> {
    ingest_at(conn, farmers_csv, datalog_csv, Local::now())
}

fn ingest_at(
    conn: &mut Connection,
    farmers_csv: &str,
    datalog_csv: &str,
    now: DateTime<Local>,
) -> Result<IngestReport, AppError> {
    match ingest_in_transaction(conn, farmers_csv, datalog_csv, &now) {
        Ok(report) => {
            info!(
                "Sync committed: {} farmers, {} readings imported, {} duplicate readings skipped, {} malformed lines",
                report.farmers_imported,
                report.readings_imported,
                report.readings_skipped,
                report.rows_malformed
            );
            Ok(report)
        }
        Err(e) => {
            error!("Sync rolled back: {e}");
            Err(AppError::SyncFailed(e))
        }
    }
}

fn ingest_in_transaction(
    conn: &mut Connection,
    farmers_csv: &str,
    datalog_csv: &str,
    now: &DateTime<Local>,
) -> rusqlite::Result<IngestReport> {
    let synced_at = format_timestamp(now);
    // Dropping `tx` without commit rolls back.
    let tx = conn.transaction()?;

    let mut rows_malformed = 0;
    let farmers_imported = import_farmers(&tx, farmers_csv, &synced_at, &mut rows_malformed)?;
    let (readings_imported, readings_skipped) =
        import_readings(&tx, datalog_csv, &synced_at, &mut rows_malformed)?;

    let resolved = tx.execute(
        "UPDATE sync_requests SET status = 'completed', completed_at = ?1
         WHERE status = 'pending'",
        params![synced_at],
    )?;
    if resolved > 0 {
        info!("Sync resolved {resolved} pending request(s)");
    }

    let settings = get_or_create_settings(&tx)?;
    tx.commit()?;

    Ok(IngestReport {
        farmers_imported,
        readings_imported,
        readings_skipped,
        rows_malformed,
        sms_settings: settings.into(),
        server_time: server_time(now),
    })
}

fn import_farmers(
    tx: &Transaction<'_>,
    farmers_csv: &str,
    synced_at: &str,
    rows_malformed: &mut usize,
) -> rusqlite::Result<usize> {
    let mut upsert = tx.prepare_cached(
        "INSERT INTO farmers (farmer_id, phone_number, created_at, synced_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(farmer_id) DO UPDATE SET
            phone_number = excluded.phone_number,
            synced_at = excluded.synced_at",
    )?;

    let mut imported = 0;
    for (line, row) in data_rows(farmers_csv).enumerate() {
        let Some(fields) = row.filter(|f| f.len() >= FARMER_FIELDS) else {
            debug!("Skipping malformed farmer line {}", line + 1);
            *rows_malformed += 1;
            continue;
        };
        upsert.execute(params![fields[0], fields[1], fields[2], synced_at])?;
        imported += 1;
    }
    Ok(imported)
}

/// Returns `(inserted, skipped_as_duplicate)`.
fn import_readings(
    tx: &Transaction<'_>,
    datalog_csv: &str,
    synced_at: &str,
    rows_malformed: &mut usize,
) -> rusqlite::Result<(usize, usize)> {
    let mut exists = tx.prepare_cached(
        "SELECT EXISTS(
            SELECT 1 FROM soil_readings WHERE farmer_id = ?1 AND reading_timestamp = ?2
         )",
    )?;
    let mut insert = tx.prepare_cached(
        "INSERT INTO soil_readings
            (farmer_id, reading_timestamp, humidity, temperature, ec, ph,
             nitrogen, phosphorus, potassium, synced_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )?;

    let mut imported = 0;
    let mut skipped = 0;
    for (line, row) in data_rows(datalog_csv).enumerate() {
        let Some(fields) = row.filter(|f| f.len() >= READING_FIELDS) else {
            debug!("Skipping malformed datalog line {}", line + 1);
            *rows_malformed += 1;
            continue;
        };

        let farmer_id = &fields[0];
        let timestamp = &fields[1];
        let already_stored: bool =
            exists.query_row(params![farmer_id, timestamp], |row| row.get(0))?;
        if already_stored {
            skipped += 1;
            continue;
        }

        insert.execute(params![
            farmer_id,
            timestamp,
            lenient_f64(&fields[2]),
            lenient_f64(&fields[3]),
            lenient_f64(&fields[4]),
            lenient_f64(&fields[5]),
            lenient_f64(&fields[6]),
            lenient_f64(&fields[7]),
            lenient_f64(&fields[8]),
            synced_at,
        ])?;
        imported += 1;
    }
    Ok((imported, skipped))
}

fn server_time(now: &DateTime<Local>) -> ServerTime {
    ServerTime {
        year: now.year(),
        month: now.month(),
        day: now.day(),
        hour: now.hour(),
        minute: now.minute(),
        second: now.second(),
    }
}
