//! Storage gateway over SQLite.
//!
//! `Database` is a cheap, cloneable handle. Components receive a clone at
//! construction time; nothing reaches the connection through a global.

mod schema;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use directories::ProjectDirs;
use rusqlite::{Connection, OptionalExtension, Params, Row};

use crate::error::Result;

pub use schema::SCHEMA;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const DB_FILE_NAME: &str = "pokeserve.db";

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        tracing::debug!(path = %path.display(), "opening database");
        Self::configure(Connection::open(path)?)
    }

    /// Opens the database in the platform data directory.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn open_memory() -> Result<Self> {
        Self::configure(Connection::open_in_memory()?)
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "pokeserve", "pokeserve").ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "could not determine a home directory",
            )
        })?;
        Ok(dirs.data_dir().join(DB_FILE_NAME))
    }

    fn configure(conn: Connection) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })?;
        tracing::info!("database schema is up to date");
        Ok(())
    }

    /// Runs `f` with exclusive access to the connection.
    pub fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        // A panic while holding the lock cannot leave SQLite itself inconsistent.
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        f(&conn)
    }

    /// Reads at most one row; `Ok(None)` when nothing matches.
    pub fn query_one<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Option<T>>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.with_connection(|conn| Ok(conn.query_row(sql, params, map).optional()?))
    }

    pub fn query_all<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt.query_map(params, map)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }

    /// Runs a write and returns the number of affected rows.
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        self.with_connection(|conn| Ok(conn.execute(sql, params)?))
    }

    /// Runs an insert and returns the generated row id.
    pub fn insert<P: Params>(&self, sql: &str, params: P) -> Result<i64> {
        self.with_connection(|conn| {
            conn.execute(sql, params)?;
            Ok(conn.last_insert_rowid())
        })
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}
