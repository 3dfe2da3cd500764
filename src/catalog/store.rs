//! SQLite implementation of the catalog lookups.

use super::CatalogStore;
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Catalog store backed by the media server's SQLite database.
///
/// The database is opened read-only in spirit: this store never writes,
/// it only runs existence queries against `cc_files` and `cc_track_types`.
pub struct SqliteCatalogStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCatalogStore {
    /// Open an existing catalog database.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open catalog database: {:?}", path))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory database (for testing).
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    #[cfg(test)]
    fn execute_batch(&self, sql: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(sql)?;
        Ok(())
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn file_exists_by_hash(&self, md5: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM cc_files WHERE md5 = ?1)",
            params![md5],
            |row| row.get(0),
        )
        .with_context(|| format!("Failed to query file catalog for md5 {}", md5))
    }

    fn track_type_exists(&self, code: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM cc_track_types WHERE code = ?1)",
            params![code],
            |row| row.get(0),
        )
        .with_context(|| format!("Failed to query track types for code {}", code))
    }
}
