use crate::error::AppError;
use crate::store::now_timestamp;
use common::model::sync::SyncStatus;
use log::info;
use rusqlite::{params, Connection};

/// Parses the `status` query parameter of a completion call. Absent means
/// `completed`; `pending` is not a settled state and is rejected.
pub fn parse_final_status(status: Option<&str>) -> Result<SyncStatus, AppError> {
    match status.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(SyncStatus::Completed),
        Some(raw) => match raw.parse::<SyncStatus>() {
            Ok(SyncStatus::Pending) | Err(_) => Err(AppError::Validation(format!(
                "Invalid status '{raw}': expected 'completed' or 'failed'"
            ))),
            Ok(status) => Ok(status),
        },
    }
}

/// Moves every pending request to `status`. Returns how many rows changed,
/// which is zero when nothing was pending.
pub fn complete_pending(conn: &Connection, status: SyncStatus) -> Result<usize, AppError> {
    if status == SyncStatus::Pending {
        return Err(AppError::Validation(
            "A sync request cannot be completed as pending".to_string(),
        ));
    }

    let resolved = conn.execute(
        "UPDATE sync_requests SET status = ?1, completed_at = ?2 WHERE status = 'pending'",
        params![status.as_str(), now_timestamp()],
    )?;
    info!("Marked {resolved} pending sync request(s) as {status}");
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::trigger_sync::request::request_sync;
    use crate::store::Store;

    #[test]
    fn status_parsing() {
        assert_eq!(parse_final_status(None).unwrap(), SyncStatus::Completed);
        assert_eq!(parse_final_status(Some("")).unwrap(), SyncStatus::Completed);
        assert_eq!(parse_final_status(Some("failed")).unwrap(), SyncStatus::Failed);
        assert_eq!(
            parse_final_status(Some("completed")).unwrap(),
            SyncStatus::Completed
        );
        assert!(matches!(
            parse_final_status(Some("pending")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            parse_final_status(Some("done")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn completes_the_pending_request() {
        let store = Store::open_in_memory().unwrap();
        let outcome = store.with_conn(|conn| Ok(request_sync(conn)?)).unwrap();

        let resolved = store
            .with_conn(|conn| complete_pending(conn, SyncStatus::Failed))
            .unwrap();
        assert_eq!(resolved, 1);

        let (status, completed_at): (String, Option<String>) = store
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT status, completed_at FROM sync_requests WHERE id = ?1",
                    params![outcome.request_id],
                    |r| Ok((r.get(0)?, r.get(1)?)),
                )?)
            })
            .unwrap();
        assert_eq!(status, "failed");
        assert!(completed_at.is_some());
    }

    #[test]
    fn nothing_pending_is_not_an_error() {
        let store = Store::open_in_memory().unwrap();
        let resolved = store
            .with_conn(|conn| complete_pending(conn, SyncStatus::Completed))
            .unwrap();
        assert_eq!(resolved, 0);
    }

    #[test]
    fn settled_rows_keep_their_status() {
        let store = Store::open_in_memory().unwrap();
        store.with_conn(|conn| Ok(request_sync(conn)?)).unwrap();
        store
            .with_conn(|conn| complete_pending(conn, SyncStatus::Completed))
            .unwrap();
        let resolved = store
            .with_conn(|conn| complete_pending(conn, SyncStatus::Failed))
            .unwrap();
        assert_eq!(resolved, 0);

        let status: String = store
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT status FROM sync_requests", [], |r| r.get(0))?)
            })
            .unwrap();
        assert_eq!(status, "completed");
    }
}
