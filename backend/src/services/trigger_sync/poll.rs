use crate::error::AppError;
use crate::services::trigger_sync::complete::{complete_pending, parse_final_status};
use crate::store::Store;
use actix_web::{web, HttpResponse};
use common::model::sync::{LastSync, PendingRequest, SyncState, SyncStatus};
use common::requests::TriggerSyncQuery;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};
use serde_json::json;

/// `GET /trigger_sync`. With `action=complete` this settles pending requests,
/// otherwise it reports the queue state.
pub(crate) async fn process(
    store: web::Data<Store>,
    query: web::Query<TriggerSyncQuery>,
) -> Result<HttpResponse, AppError> {
    let TriggerSyncQuery { action, status } = query.into_inner();

    if action.as_deref() == Some("complete") {
        let status = parse_final_status(status.as_deref())?;
        let resolved = store
            .run(move |conn| complete_pending(conn, status))
            .await?;
        return Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": format!("Sync marked as {status}"),
            "resolved": resolved,
        })));
    }

    let state = store.run(|conn| Ok(poll_pending(conn)?)).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "sync_pending": state.sync_pending,
        "pending_request": state.pending_request,
        "last_sync": state.last_sync,
    })))
}

/// The newest pending request, if any, and the newest settled one.
pub fn poll_pending(conn: &Connection) -> rusqlite::Result<SyncState> {
    let pending_request = conn
        .query_row(
            "SELECT id, requested_at, status FROM sync_requests
             WHERE status = 'pending'
             ORDER BY requested_at DESC, id DESC LIMIT 1",
            [],
            |row| {
                Ok(PendingRequest {
                    id: row.get(0)?,
                    requested_at: row.get(1)?,
                    status: status_column(row, 2)?,
                })
            },
        )
        .optional()?;

    let last_sync = conn
        .query_row(
            "SELECT completed_at, status FROM sync_requests
             WHERE status IN ('completed', 'failed')
             ORDER BY completed_at DESC, id DESC LIMIT 1",
            [],
            |row| {
                Ok(LastSync {
                    completed_at: row.get(0)?,
                    status: status_column(row, 1)?,
                })
            },
        )
        .optional()?;

    Ok(SyncState {
        sync_pending: pending_request.is_some(),
        pending_request,
        last_sync,
    })
}

fn status_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<SyncStatus> {
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}
