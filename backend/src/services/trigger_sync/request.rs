use crate::error::AppError;
use crate::store::{now_timestamp, Store};
use actix_web::{web, HttpResponse};
use common::model::sync::SyncRequestOutcome;
use log::info;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use serde_json::json;

pub(crate) async fn process(store: web::Data<Store>) -> Result<HttpResponse, AppError> {
    let outcome = store.run(|conn| Ok(request_sync(conn)?)).await?;

    let message = if outcome.created {
        "Sync request created. Waiting for the device to connect and sync."
    } else {
        "Sync request already pending"
    };
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": message,
        "created": outcome.created,
        "request_id": outcome.request_id,
    })))
}

/// Creates a pending request unless one already exists, in which case that
/// one is returned with `created: false`.
pub fn request_sync(conn: &mut Connection) -> rusqlite::Result<SyncRequestOutcome> {
    // IMMEDIATE takes the write lock up front so check-then-insert cannot race
    // another writer on the same file.
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let existing: Option<i64> = tx
        .query_row(
            "SELECT id FROM sync_requests WHERE status = 'pending'
             ORDER BY requested_at DESC, id DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let outcome = match existing {
        Some(request_id) => SyncRequestOutcome {
            created: false,
            request_id,
        },
        None => {
            tx.execute(
                "INSERT INTO sync_requests (requested_at, status) VALUES (?1, 'pending')",
                params![now_timestamp()],
            )?;
            let request_id = tx.last_insert_rowid();
            info!("Sync request {request_id} created");
            SyncRequestOutcome {
                created: true,
                request_id,
            }
        }
    };

    tx.commit()?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_count(store: &Store) -> i64 {
        store
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM sync_requests WHERE status = 'pending'",
                    [],
                    |r| r.get(0),
                )?)
            })
            .unwrap()
    }

    #[test]
    fn second_request_reuses_the_pending_one() {
        let store = Store::open_in_memory().unwrap();
        let first = store.with_conn(|conn| Ok(request_sync(conn)?)).unwrap();
        let second = store.with_conn(|conn| Ok(request_sync(conn)?)).unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.request_id, second.request_id);
        assert_eq!(pending_count(&store), 1);
    }

    #[test]
    fn many_requests_leave_exactly_one_pending() {
        let store = Store::open_in_memory().unwrap();
        for _ in 0..10 {
            store.with_conn(|conn| Ok(request_sync(conn)?)).unwrap();
        }
        assert_eq!(pending_count(&store), 1);
    }

    #[test]
    fn settled_requests_are_not_reopened() {
        let store = Store::open_in_memory().unwrap();
        let first = store.with_conn(|conn| Ok(request_sync(conn)?)).unwrap();
        store
            .with_conn(|conn| {
                conn.execute(
                    "UPDATE sync_requests SET status = 'completed', completed_at = 'x'",
                    [],
                )?;
                Ok(())
            })
            .unwrap();

        let next = store.with_conn(|conn| Ok(request_sync(conn)?)).unwrap();
        assert!(next.created);
        assert_ne!(next.request_id, first.request_id);

        let first_status: String = store
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT status FROM sync_requests WHERE id = ?1",
                    params![first.request_id],
                    |r| r.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(first_status, "completed");
    }
}
