// src/db/mod.rs

//! SQLite storage for the cookbook
//!
//! Every request opens its own connection; connections are cheap and SQLite
//! serializes writers. Multi-statement writes go through [`transaction`].

pub mod migrations;
pub mod models;
pub mod schema;

use crate::error::{Error, Result};
use rusqlite::{Connection, Transaction};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// How long a connection waits on a locked database before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Create (or upgrade) the database at `db_path`
pub fn init(db_path: impl AsRef<Path>) -> Result<()> {
    let db_path = db_path.as_ref();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    info!("Initializing database at {}", db_path.display());
    let conn = open_raw(db_path)?;
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
    schema::migrate(&conn)?;
    Ok(())
}

/// Open an existing, initialized database
pub fn open(db_path: impl AsRef<Path>) -> Result<Connection> {
    let db_path = db_path.as_ref();
    if !db_path.exists() {
        return Err(Error::InitError(format!(
            "Database not found at {}; run `cookbook init` first",
            db_path.display()
        )));
    }
    open_raw(db_path)
}

fn open_raw(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(conn)
}

/// Run `f` inside a transaction, committing on `Ok` and rolling back on `Err`
pub fn transaction<T, F>(conn: &mut Connection, f: F) -> Result<T>
where
    F: FnOnce(&Transaction) -> Result<T>,
{
    let tx = conn.transaction()?;
    let value = f(&tx)?;
    tx.commit()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_parent_and_schema() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("nested").join("cookbook.db");

        init(&db_path).unwrap();
        let conn = open(&db_path).unwrap();
        assert_eq!(
            schema::get_schema_version(&conn).unwrap(),
            schema::SCHEMA_VERSION
        );
    }

    #[test]
    fn test_open_missing_database_fails() {
        let dir = TempDir::new().unwrap();
        let result = open(dir.path().join("missing.db"));
        assert!(matches!(result, Err(Error::InitError(_))));
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("cookbook.db");
        init(&db_path).unwrap();
        let mut conn = open(&db_path).unwrap();

        let result: Result<()> = transaction(&mut conn, |tx| {
            tx.execute(
                "INSERT INTO ingredients (name, measurement_unit) VALUES ('salt', 'g')",
                [],
            )?;
            Err(Error::InitError("abort".to_string()))
        });
        assert!(result.is_err());

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM ingredients", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
