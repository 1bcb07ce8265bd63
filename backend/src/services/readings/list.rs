use crate::error::AppError;
use crate::store::Store;
use actix_web::{web, HttpResponse};
use common::model::reading::{ReadingPage, ReadingStats, SoilReading};
use common::requests::ReadingsQuery;
use rusqlite::{params, Connection};
use serde_json::json;

pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 500;

/// Limit and offset after clamping; always bound as SQL parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub fn clamped(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(0, MAX_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

pub(crate) async fn process(
    store: web::Data<Store>,
    query: web::Query<ReadingsQuery>,
) -> Result<HttpResponse, AppError> {
    let ReadingsQuery {
        farmer_id,
        limit,
        offset,
    } = query.into_inner();
    let page = Page::clamped(limit, offset);

    let result = store
        .run(move |conn| Ok(list_readings(conn, farmer_id.as_deref(), page)?))
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "total": result.total,
        "stats": result.stats,
        "readings": result.readings,
    })))
}

/// Returns one page of readings, most recently inserted first.
///
/// Ordering is by surrogate id rather than `reading_timestamp` because device
/// clocks drift. `stats` and `total` cover every reading matching the filter,
/// not just the page.
pub fn list_readings(
    conn: &Connection,
    farmer_id: Option<&str>,
    page: Page,
) -> rusqlite::Result<ReadingPage> {
    let farmer_id = farmer_id.map(str::trim).filter(|id| !id.is_empty());

    let mut stmt = conn.prepare(
        "SELECT s.id, s.farmer_id, s.reading_timestamp, s.humidity, s.temperature,
                s.ec, s.ph, s.nitrogen, s.phosphorus, s.potassium, s.synced_at,
                f.phone_number
         FROM soil_readings s
         JOIN farmers f ON s.farmer_id = f.farmer_id
         WHERE ?1 IS NULL OR s.farmer_id = ?1
         ORDER BY s.id DESC
         LIMIT ?2 OFFSET ?3",
    )?;
    let readings = stmt
        .query_map(params![farmer_id, page.limit, page.offset], |row| {
            Ok(SoilReading {
                id: row.get(0)?,
                farmer_id: row.get(1)?,
                reading_timestamp: row.get(2)?,
                humidity: row.get(3)?,
                temperature: row.get(4)?,
                ec: row.get(5)?,
                ph: row.get(6)?,
                nitrogen: row.get(7)?,
                phosphorus: row.get(8)?,
                potassium: row.get(9)?,
                synced_at: row.get(10)?,
                phone_number: row.get(11)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let stats = conn.query_row(
        "SELECT COUNT(*), COUNT(DISTINCT s.farmer_id),
                AVG(s.humidity), AVG(s.temperature), AVG(s.ec), AVG(s.ph),
                AVG(s.nitrogen), AVG(s.phosphorus), AVG(s.potassium)
         FROM soil_readings s
         JOIN farmers f ON s.farmer_id = f.farmer_id
         WHERE ?1 IS NULL OR s.farmer_id = ?1",
        params![farmer_id],
        |row| {
            Ok(ReadingStats {
                total_readings: row.get(0)?,
                unique_farmers: row.get(1)?,
                avg_humidity: row.get(2)?,
                avg_temperature: row.get(3)?,
                avg_ec: row.get(4)?,
                avg_ph: row.get(5)?,
                avg_nitrogen: row.get(6)?,
                avg_phosphorus: row.get(7)?,
                avg_potassium: row.get(8)?,
            })
        },
    )?;

    Ok(ReadingPage {
        total: stats.total_readings,
        stats,
        readings,
    })
}
