use crate::error::AppError;
use crate::store::{now_timestamp, Store};
use actix_web::{web, HttpResponse};
use common::model::settings::{SmsSettings, DEFAULT_MESSAGE_TEMPLATE};
use rusqlite::{params, Connection};
use serde_json::json;

pub(crate) async fn process(store: web::Data<Store>) -> Result<HttpResponse, AppError> {
    let settings = store
        .run(|conn| Ok(get_or_create_settings(conn)?))
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "settings": settings })))
}

/// Returns the settings row, inserting the disabled default first if absent.
///
/// Also used inside the sync transaction, so it only needs a `Connection`
/// (a `Transaction` derefs to one).
pub fn get_or_create_settings(conn: &Connection) -> rusqlite::Result<SmsSettings> {
    conn.execute(
        "INSERT OR IGNORE INTO sms_settings (id, sms_enabled, message_template, updated_at)
         VALUES (1, 0, ?1, ?2)",
        params![DEFAULT_MESSAGE_TEMPLATE, now_timestamp()],
    )?;

    conn.query_row(
        "SELECT sms_enabled, message_template, updated_at FROM sms_settings WHERE id = 1",
        [],
        |row| {
            Ok(SmsSettings {
                sms_enabled: row.get(0)?,
                message_template: row.get(1)?,
                updated_at: row.get(2)?,
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_read_creates_the_disabled_default() {
        let store = Store::open_in_memory().unwrap();
        let settings = store
            .with_conn(|conn| Ok(get_or_create_settings(conn)?))
            .unwrap();
        assert!(!settings.sms_enabled);
        assert_eq!(settings.message_template, DEFAULT_MESSAGE_TEMPLATE);

        let rows: i64 = store
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM sms_settings", [], |r| r.get(0))?)
            })
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn repeated_reads_do_not_reset_the_row() {
        let store = Store::open_in_memory().unwrap();
        store
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO sms_settings (id, sms_enabled, message_template, updated_at)
                     VALUES (1, 1, 'Hi {farmer_id}', '2024-01-01 00:00:00')",
                    [],
                )?;
                Ok(())
            })
            .unwrap();

        let settings = store
            .with_conn(|conn| Ok(get_or_create_settings(conn)?))
            .unwrap();
        assert!(settings.sms_enabled);
        assert_eq!(settings.message_template, "Hi {farmer_id}");
        assert_eq!(settings.updated_at, "2024-01-01 00:00:00");
    }
}
