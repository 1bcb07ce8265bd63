use crate::error::AppError;
use crate::store::Store;
use actix_web::{web, HttpResponse};
use common::model::farmer::{Farmer, FarmerListing, FarmerSummary};
use common::requests::FarmersQuery;
use rusqlite::{params, Connection};
use serde_json::json;

pub(crate) async fn process(
    store: web::Data<Store>,
    query: web::Query<FarmersQuery>,
) -> Result<HttpResponse, AppError> {
    let search = query.into_inner().search;
    let listing = store
        .run(move |conn| Ok(list_farmers(conn, search.as_deref())?))
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "total": listing.total,
        "farmers": listing.farmers,
    })))
}

/// Lists farmers ordered by id, optionally restricted to those whose id or
/// phone number contains `search`.
///
/// `total` is always the size of the whole registry, not the number of
/// matches; the dashboard shows it as "registered farmers" next to the
/// filtered table.
pub fn list_farmers(conn: &Connection, search: Option<&str>) -> rusqlite::Result<FarmerListing> {
    let pattern = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", escape_like(s)));

    let mut stmt = conn.prepare(
        "SELECT f.farmer_id, f.phone_number, f.created_at, f.synced_at,
                COUNT(s.id) AS reading_count,
                MAX(s.reading_timestamp) AS last_reading
         FROM farmers f
         LEFT JOIN soil_readings s ON f.farmer_id = s.farmer_id
         WHERE ?1 IS NULL
            OR f.farmer_id LIKE ?1 ESCAPE '\\'
            OR f.phone_number LIKE ?1 ESCAPE '\\'
         GROUP BY f.farmer_id
         ORDER BY f.farmer_id",
    )?;
    let farmers = stmt
        .query_map(params![pattern], |row| {
            Ok(FarmerSummary {
                farmer: Farmer {
                    farmer_id: row.get(0)?,
                    phone_number: row.get(1)?,
                    created_at: row.get(2)?,
                    synced_at: row.get(3)?,
                },
                reading_count: row.get(4)?,
                last_reading: row.get(5)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let total = conn.query_row("SELECT COUNT(*) FROM farmers", [], |row| row.get(0))?;

    Ok(FarmerListing { total, farmers })
}

/// Makes `%` and `_` in user input match literally.
fn escape_like(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for ch in s.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
