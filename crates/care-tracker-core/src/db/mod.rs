//! Database layer for the care tracker.
//!
//! Executes the mutation intents produced by [`crate::schedule`] against
//! SQLite. Slot uniqueness for medication logs is enforced by a unique index,
//! so concurrent duplicate submissions converge to one row.

mod schema;
mod medications;
mod logs;
mod checkins;
mod tasks;
mod activities;
mod contacts;
mod changes;

pub use schema::*;
pub use changes::*;

use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "Opened care tracker database");
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction.
    pub fn transaction(&mut self) -> DbResult<rusqlite::Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }
}

/// Map a stored enum string back to its variant.
fn parse_column<T>(column: &str, value: &str) -> DbResult<T>
where
    T: std::str::FromStr<Err = crate::models::ValidationError>,
{
    value
        .parse()
        .map_err(|e| DbError::Constraint(format!("{}: {}", column, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();

        let tables: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"medications".to_string()));
        assert!(tables.contains(&"medication_logs".to_string()));
        assert!(tables.contains(&"feeling_checkins".to_string()));
        assert!(tables.contains(&"care_tasks".to_string()));
        assert!(tables.contains(&"care_activities".to_string()));
        assert!(tables.contains(&"doctor_contacts".to_string()));
        assert!(tables.contains(&"sync_log".to_string()));
    }

    #[test]
    fn test_reopen_file_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("care.db");

        let med = crate::models::Medication::as_needed("Zofran", Some(8.0));
        {
            let db = Database::open(&path).unwrap();
            db.insert_medication(&med).unwrap();
        }

        let db = Database::open(&path).unwrap();
        let loaded = db.get_medication(&med.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Zofran");
    }
}
