//! Database connection management
//!
//! Provides SQLite connection pooling. Each retrieval checks out one
//! connection and hands it back to the pool when it is dropped.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use thiserror::Error;

/// Connection descriptor that selects an in-memory store
pub const MEMORY_DESCRIPTOR: &str = ":memory:";

/// Database error types
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] r2d2::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;

/// Where the pool gets its connections from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    File(PathBuf),
    Memory,
}

impl Location {
    /// Interpret a connection descriptor (`:memory:` or a file path)
    pub fn from_descriptor(descriptor: &str) -> Self {
        let trimmed = descriptor.trim();
        if trimmed == MEMORY_DESCRIPTOR || trimmed.eq_ignore_ascii_case("memory") {
            Location::Memory
        } else {
            Location::File(PathBuf::from(trimmed.strip_prefix("sqlite://").unwrap_or(trimmed)))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Location::File(path) => path.display().to_string(),
            Location::Memory => MEMORY_DESCRIPTOR.to_string(),
        }
    }
}

/// Database connection pool wrapper
#[derive(Clone)]
pub struct Database {
    pool: Arc<Pool<SqliteConnectionManager>>,
    location: Location,
}

impl Database {
    /// Create a connection pool backed by a SQLite file
    pub fn new<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let manager = SqliteConnectionManager::file(path.as_ref())
            .with_flags(
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI,
            )
            .with_init(|conn| {
                conn.execute_batch(
                    "PRAGMA journal_mode = WAL;
                     PRAGMA synchronous = NORMAL;
                     PRAGMA cache_size = -64000;
                     PRAGMA temp_store = MEMORY;",
                )?;
                Ok(())
            });

        let pool = Pool::builder()
            .max_size(4)
            .connection_timeout(Duration::from_secs(10))
            .build(manager)?;

        Ok(Self {
            pool: Arc::new(pool),
            location: Location::File(path.as_ref().to_path_buf()),
        })
    }

    /// Create an in-memory database.
    ///
    /// Every SQLite in-memory connection is its own database, so the pool
    /// holds exactly one connection that is reused by every checkout.
    pub fn in_memory() -> DbResult<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .min_idle(Some(1))
            .idle_timeout(None)
            .max_lifetime(None)
            .build(manager)?;

        Ok(Self {
            pool: Arc::new(pool),
            location: Location::Memory,
        })
    }

    /// Open a database from a connection descriptor
    pub fn open(descriptor: &str) -> DbResult<Self> {
        match Location::from_descriptor(descriptor) {
            Location::Memory => Self::in_memory(),
            Location::File(path) => Self::new(path),
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Get a connection from the pool
    pub fn get_conn(&self) -> DbResult<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    /// Execute a closure with a database connection
    pub fn with_conn<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> DbResult<T>,
    {
        let conn = self.get_conn()?;
        f(&conn)
    }

    /// Check that the store answers a trivial query
    pub fn ping(&self) -> DbResult<()> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_from_descriptor() {
        assert_eq!(Location::from_descriptor(":memory:"), Location::Memory);
        assert_eq!(Location::from_descriptor(" memory "), Location::Memory);
        assert_eq!(
            Location::from_descriptor("sqlite://data/sweat.db"),
            Location::File(PathBuf::from("data/sweat.db"))
        );
        assert_eq!(
            Location::from_descriptor("/tmp/sweat.db"),
            Location::File(PathBuf::from("/tmp/sweat.db"))
        );
    }

    #[test]
    fn test_in_memory_ping() {
        let db = Database::in_memory().unwrap();
        assert!(db.ping().is_ok());
        assert_eq!(db.location().describe(), ":memory:");
    }

    #[test]
    fn test_in_memory_state_survives_checkouts() {
        let db = Database::open(MEMORY_DESCRIPTOR).unwrap();
        db.with_conn(|conn| {
            conn.execute("CREATE TABLE t (x INTEGER)", [])?;
            conn.execute("INSERT INTO t (x) VALUES (7)", [])?;
            Ok(())
        })
        .unwrap();

        let x: i64 = db
            .with_conn(|conn| Ok(conn.query_row("SELECT x FROM t", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(x, 7);
    }
}
