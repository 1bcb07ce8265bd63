//! Owns the SQLite connection used by every service.
//!
//! `Store` is built once by `main` (or by a test) and handed to actix as
//! `web::Data<Store>`. Handlers never open connections themselves; they pass a
//! closure to [`Store::run`], which executes it on the blocking pool while
//! holding the connection lock. SQLite's own transactions are the only
//! coordination between requests.

pub mod schema;

use crate::error::AppError;
use actix_web::web;
use chrono::{DateTime, Local};
use log::info;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Format of every timestamp the server writes.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Opens (or creates) the database file and applies the schema.
    pub fn open(path: &Path) -> rusqlite::Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self::init(conn)?;
        info!("Database opened at {}", path.display());
        Ok(store)
    }

    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> rusqlite::Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        schema::migrate(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `f` with exclusive access to the connection on the calling thread.
    pub fn with_conn<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Connection) -> Result<T, AppError>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| AppError::Internal("Database lock poisoned".to_string()))?;
        f(&mut conn)
    }

    /// Runs `f` on actix's blocking thread pool so SQLite I/O never stalls a
    /// worker.
    pub async fn run<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Connection) -> Result<T, AppError> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.clone();
        web::block(move || store.with_conn(f)).await?
    }
}

pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub fn now_timestamp() -> String {
    format_timestamp(&Local::now())
}
