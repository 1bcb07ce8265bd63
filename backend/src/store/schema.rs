use rusqlite::Connection;

/// Bumped whenever a new block is appended to `migrate`.
pub const SCHEMA_VERSION: i64 = 1;

/// Creates the tables on a fresh database. Safe to run on every start.
pub fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version < 1 {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(
            "CREATE TABLE IF NOT EXISTS farmers (
                farmer_id TEXT PRIMARY KEY,
                phone_number TEXT NOT NULL,
                created_at TEXT NOT NULL,
                synced_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS soil_readings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                farmer_id TEXT NOT NULL REFERENCES farmers(farmer_id),
                reading_timestamp TEXT NOT NULL,
                humidity REAL NOT NULL,
                temperature REAL NOT NULL,
                ec REAL NOT NULL,
                ph REAL NOT NULL,
                nitrogen REAL NOT NULL,
                phosphorus REAL NOT NULL,
                potassium REAL NOT NULL,
                synced_at TEXT NOT NULL,
                UNIQUE (farmer_id, reading_timestamp)
            );

            CREATE TABLE IF NOT EXISTS sync_requests (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                requested_at TEXT NOT NULL,
                status TEXT NOT NULL CHECK (status IN ('pending', 'completed', 'failed')),
                completed_at TEXT
            );

            -- At most one pending request at any time.
            CREATE UNIQUE INDEX IF NOT EXISTS idx_sync_requests_single_pending
                ON sync_requests(status) WHERE status = 'pending';

            CREATE TABLE IF NOT EXISTS sms_settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                sms_enabled INTEGER NOT NULL DEFAULT 0,
                message_template TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );",
        )?;
        tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        tx.commit()?;
    }

    Ok(())
}
