use crate::error::AppError;
use crate::services::sms_settings::template::unknown_placeholders;
use crate::store::{now_timestamp, Store};
use actix_web::{web, HttpResponse};
use common::requests::SmsSettingsRequest;
use log::{info, warn};
use rusqlite::{params, Connection};
use serde_json::json;

pub(crate) async fn process(
    store: web::Data<Store>,
    payload: web::Json<SmsSettingsRequest>,
) -> Result<HttpResponse, AppError> {
    let SmsSettingsRequest {
        sms_enabled,
        message_template,
    } = payload.into_inner();
    let enabled = sms_enabled.unwrap_or(false);
    let template = message_template.unwrap_or_default();

    store
        .run(move |conn| save_settings(conn, enabled, &template))
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "SMS settings saved successfully",
    })))
}

/// Replaces the settings row. The template is stored trimmed; a blank one is
/// rejected before anything is written.
pub fn save_settings(conn: &Connection, enabled: bool, template: &str) -> Result<(), AppError> {
    let template = template.trim();
    if template.is_empty() {
        return Err(AppError::Validation(
            "Message template cannot be empty".to_string(),
        ));
    }

    match unknown_placeholders(template) {
        Ok(unknown) if !unknown.is_empty() => {
            warn!("SMS template uses unknown placeholders: {}", unknown.join(", "));
        }
        Ok(_) => {}
        Err(e) => warn!("Could not scan SMS template placeholders: {e}"),
    }

    conn.execute(
        "INSERT INTO sms_settings (id, sms_enabled, message_template, updated_at)
         VALUES (1, ?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET
            sms_enabled = excluded.sms_enabled,
            message_template = excluded.message_template,
            updated_at = excluded.updated_at",
        params![enabled, template, now_timestamp()],
    )?;

    info!("SMS settings updated (enabled: {enabled})");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::sms_settings::get_or_create_settings;

    #[test]
    fn blank_template_is_rejected_and_row_left_alone() {
        let store = Store::open_in_memory().unwrap();
        let before = store
            .with_conn(|conn| Ok(get_or_create_settings(conn)?))
            .unwrap();

        let result = store.with_conn(|conn| save_settings(conn, true, "   \n "));
        assert!(matches!(result, Err(AppError::Validation(_))));

        let after = store
            .with_conn(|conn| Ok(get_or_create_settings(conn)?))
            .unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn empty_template_on_a_fresh_store_writes_nothing() {
        let store = Store::open_in_memory().unwrap();
        let result = store.with_conn(|conn| save_settings(conn, true, ""));
        assert!(matches!(result, Err(AppError::Validation(_))));

        let rows: i64 = store
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM sms_settings", [], |r| r.get(0))?)
            })
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[test]
    fn save_replaces_the_single_row() {
        let store = Store::open_in_memory().unwrap();
        store
            .with_conn(|conn| save_settings(conn, true, "  Soil {ph} for {farmer_id}  "))
            .unwrap();
        store
            .with_conn(|conn| save_settings(conn, false, "Moisture {humidity}"))
            .unwrap();

        let settings = store
            .with_conn(|conn| Ok(get_or_create_settings(conn)?))
            .unwrap();
        assert!(!settings.sms_enabled);
        assert_eq!(settings.message_template, "Moisture {humidity}");

        let rows: i64 = store
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM sms_settings", [], |r| r.get(0))?)
            })
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn template_is_stored_trimmed() {
        let store = Store::open_in_memory().unwrap();
        store
            .with_conn(|conn| save_settings(conn, true, "\n  Soil {ph}\t"))
            .unwrap();
        let settings = store
            .with_conn(|conn| Ok(get_or_create_settings(conn)?))
            .unwrap();
        assert_eq!(settings.message_template, "Soil {ph}");
        assert!(settings.sms_enabled);
    }
}
