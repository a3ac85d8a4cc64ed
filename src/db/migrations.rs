//! Database migrations
//!
//! Creates the workout log schema for local and test stores. Production
//! stores that already carry a workout table are only read from.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Latest schema version known to this build
pub fn latest_schema_version() -> i32 {
    SCHEMA_VERSION
}

/// Migration v1: workout summary table
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS workout_summary (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            workout_date TEXT NOT NULL,          -- 'YYYY-MM-DD HH:MM:SS'
            activity_type TEXT NOT NULL DEFAULT '',

            distance_mi REAL,
            duration_sec REAL,
            kcal_burned REAL,
            avg_pace REAL,                       -- minutes per mile
            max_pace REAL,
            steps INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_workout_summary_date ON workout_summary(workout_date);
        "#,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), latest_schema_version());

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM workout_summary", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[test]
    fn test_schema_version_reports_store_errors() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(matches!(
            get_schema_version(&conn),
            Err(crate::db::DbError::Sqlite(_))
        ));

        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), 1);
    }
}
