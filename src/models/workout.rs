//! Workout model
//!
//! Read-only view over the workout summary table: one row per workout with
//! its date, activity label, and the value of a single requested metric.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::db::{Database, DbResult};
use crate::error::{WorkoutError, WorkoutResult};
use crate::models::Metric;

/// Default workout table name
pub const DEFAULT_TABLE: &str = "workout_summary";

/// A table identifier that is safe to interpolate into SQL.
///
/// Accepts `name` or `schema.name`, where each part starts with a letter or
/// underscore and continues with letters, digits or underscores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableName(String);

impl TableName {
    pub fn parse(s: &str) -> WorkoutResult<Self> {
        let valid_part = |part: &str| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        };

        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() > 2 || !parts.iter().all(|p| valid_part(p)) {
            return Err(WorkoutError::InvalidTableName(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TableName {
    fn default() -> Self {
        Self(DEFAULT_TABLE.to_string())
    }
}

/// One workout row with the value of the requested metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutRecord {
    pub workout_date: NaiveDateTime,
    pub activity_type: String,
    pub value: f64,
}

/// The rows returned for one metric over one date range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutFrame {
    pub metric: Metric,
    pub records: Vec<WorkoutRecord>,
}

impl WorkoutFrame {
    pub fn new(metric: Metric, records: Vec<WorkoutRecord>) -> Self {
        Self { metric, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// An empty frame is a valid result, not a failure
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.value).collect()
    }

    /// Earliest and latest workout timestamps
    pub fn date_span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.records.iter().map(|r| r.workout_date).min()?;
        let last = self.records.iter().map(|r| r.workout_date).max()?;
        Some((first, last))
    }

    /// Rows keyed by column name, with the metric under its own column name
    pub fn to_rows(&self) -> Vec<Value> {
        self.records
            .iter()
            .map(|r| {
                let mut row = Map::new();
                row.insert(
                    "workout_date".to_string(),
                    Value::String(r.workout_date.format("%Y-%m-%d %H:%M:%S").to_string()),
                );
                row.insert("activity_type".to_string(), Value::String(r.activity_type.clone()));
                row.insert(self.metric.column().to_string(), serde_json::json!(r.value));
                Value::Object(row)
            })
            .collect()
    }
}

/// Parse a stored workout timestamp.
///
/// SQLite has no native datetime type, so rows may hold `YYYY-MM-DD`,
/// `YYYY-MM-DD HH:MM[:SS[.f]]`, the `T`-separated variants, or RFC 3339.
/// Offset timestamps are normalized to UTC, matching SQLite's `date()`
/// so a row lands on the same day in the range filter and in bucketing.
pub fn parse_workout_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];

    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse a `YYYY-MM-DD` date argument
pub fn parse_date_arg(s: &str) -> WorkoutResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| WorkoutError::InvalidDate(s.to_string()))
}

impl WorkoutRecord {
    /// Create from a row of the aliased retrieval query
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let raw_date: String = row.get("workout_date")?;
        let workout_date = parse_workout_date(&raw_date).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                Type::Text,
                format!("unrecognized workout_date '{}'", raw_date).into(),
            )
        })?;
        let activity_type: Option<String> = row.get("activity_type")?;

        Ok(Self {
            workout_date,
            activity_type: activity_type.unwrap_or_default(),
            value: row.get("metric")?,
        })
    }

    /// List workouts whose calendar date lies in `[start, end]`.
    ///
    /// Rows with a NULL metric value are skipped.
    pub fn list_by_date_range(
        conn: &Connection,
        table: &TableName,
        start: NaiveDate,
        end: NaiveDate,
        metric: Metric,
    ) -> DbResult<Vec<Self>> {
        let column = metric.column();
        let sql = format!(
            "SELECT workout_date, activity_type, {column} AS metric
             FROM {table}
             WHERE date(workout_date) BETWEEN ?1 AND ?2
               AND {column} IS NOT NULL
             ORDER BY datetime(workout_date), workout_date",
            column = column,
            table = table.as_str(),
        );

        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(
                params![
                    start.format("%Y-%m-%d").to_string(),
                    end.format("%Y-%m-%d").to_string()
                ],
                Self::from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }
}

/// Fetch one metric over an inclusive date range.
///
/// Checks out a single pooled connection for the duration of the query. Any
/// pool or SQLite failure comes back as [`WorkoutError::Database`].
pub fn fetch(
    db: &Database,
    table: &TableName,
    start: NaiveDate,
    end: NaiveDate,
    metric: Metric,
) -> WorkoutResult<WorkoutFrame> {
    tracing::debug!(%metric, table = table.as_str(), %start, %end, "fetching workouts");

    let records = db
        .with_conn(|conn| WorkoutRecord::list_by_date_range(conn, table, start, end, metric))
        .map_err(|e| {
            tracing::warn!(error = %e, table = table.as_str(), "workout query failed");
            WorkoutError::Database(e)
        })?;

    tracing::info!(%metric, rows = records.len(), "fetched workouts");
    Ok(WorkoutFrame::new(metric, records))
}

/// Parse the metric first, so unknown names never reach the store
pub fn fetch_by_name(
    db: &Database,
    table: &TableName,
    start: NaiveDate,
    end: NaiveDate,
    metric: &str,
) -> WorkoutResult<WorkoutFrame> {
    let metric: Metric = metric.parse()?;
    fetch(db, table, start, end, metric)
}


#[cfg(test)]
mod tests {
    use super::test_support::{date, seeded_db};
    use super::*;
    use crate::db::migrations::run_migrations;

    #[test]
    fn test_table_name_validation() {
        assert!(TableName::parse("workout_summary").is_ok());
        assert!(TableName::parse("sweat.workout_summary").is_ok());
        assert!(TableName::parse("_t1").is_ok());
        for bad in ["", "1table", "a.b.c", "workout_summary; DROP TABLE x", "a b", "a."] {
            assert!(
                matches!(TableName::parse(bad), Err(WorkoutError::InvalidTableName(_))),
                "accepted {:?}",
                bad
            );
        }
        assert_eq!(TableName::default().as_str(), DEFAULT_TABLE);
    }

    #[test]
    fn test_parse_workout_date_formats() {
        let expected = date("2024-01-05").and_hms_opt(7, 30, 0).unwrap();
        assert_eq!(parse_workout_date("2024-01-05 07:30:00"), Some(expected));
        assert_eq!(parse_workout_date("2024-01-05T07:30:00"), Some(expected));
        assert_eq!(parse_workout_date("2024-01-05 07:30"), Some(expected));
        assert_eq!(parse_workout_date("2024-01-05T07:30:00.000"), Some(expected));
        assert_eq!(parse_workout_date("2024-01-05T07:30:00+00:00"), Some(expected));
        assert_eq!(
            parse_workout_date("2024-01-05"),
            date("2024-01-05").and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_workout_date("01/05/2024"), None);
        assert_eq!(
            parse_workout_date("2024-01-05T23:30:00-05:00"),
            date("2024-01-06").and_hms_opt(4, 30, 0)
        );
    }

    #[test]
    fn test_offset_timestamp_filter_and_date_agree() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            run_migrations(conn)?;
            conn.execute(
                "INSERT INTO workout_summary (workout_date, activity_type, distance_mi)
                 VALUES ('2024-01-05T23:30:00-05:00', 'run', 4.0)",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        let fetch_day = |day: &str| {
            fetch(&db, &TableName::default(), date(day), date(day), Metric::DistanceMi).unwrap()
        };

        assert!(fetch_day("2024-01-05").is_empty());
        let frame = fetch_day("2024-01-06");
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.records[0].workout_date.date(), date("2024-01-06"));
    }

    #[test]
    fn test_fetch_date_range() {
        let db = seeded_db();
        let frame = fetch(
            &db,
            &TableName::default(),
            date("2024-01-01"),
            date("2024-01-03"),
            Metric::DistanceMi,
        )
        .unwrap();

        assert_eq!(frame.len(), 2);
        assert_eq!(frame.metric, Metric::DistanceMi);
        let total: f64 = frame.values().iter().sum();
        assert!((total - 8.1).abs() < 1e-9);
        assert_eq!(frame.records[0].activity_type, "run");
    }

    #[test]
    fn test_fetch_single_day_for_every_metric() {
        let db = seeded_db();
        for metric in Metric::ALL {
            let frame = fetch(
                &db,
                &TableName::default(),
                date("2024-01-05"),
                date("2024-01-05"),
                metric,
            )
            .unwrap();
            assert_eq!(frame.len(), 1, "metric {}", metric);
            assert_eq!(frame.records[0].workout_date.date(), date("2024-01-05"));
            assert_eq!(frame.records[0].activity_type, "walk");
        }
    }

    #[test]
    fn test_fetch_skips_null_metric_values() {
        let db = seeded_db();
        let day = date("2024-01-09");
        let distance = fetch(&db, &TableName::default(), day, day, Metric::DistanceMi).unwrap();
        assert!(distance.is_empty());

        let steps = fetch(&db, &TableName::default(), day, day, Metric::Steps).unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps.records[0].value, 3000.0);
    }

    #[test]
    fn test_fetch_inverted_range_is_empty() {
        let db = seeded_db();
        let frame = fetch(
            &db,
            &TableName::default(),
            date("2024-01-10"),
            date("2024-01-01"),
            Metric::Steps,
        )
        .unwrap();
        assert!(frame.is_empty());
        assert_eq!(frame.date_span(), None);
    }

    #[test]
    fn test_fetch_unknown_metric_never_queries() {
        // No schema at all: any query would fail with a database error
        let db = Database::in_memory().unwrap();
        let err = fetch_by_name(
            &db,
            &TableName::default(),
            date("2024-01-01"),
            date("2024-01-31"),
            "heart_rate",
        )
        .unwrap_err();
        assert!(matches!(err, WorkoutError::InvalidMetric(ref m) if m == "heart_rate"));
    }

    #[test]
    fn test_fetch_wraps_store_errors() {
        let db = Database::in_memory().unwrap();
        let err = fetch(
            &db,
            &TableName::parse("missing_table").unwrap(),
            date("2024-01-01"),
            date("2024-01-31"),
            Metric::DistanceMi,
        )
        .unwrap_err();
        assert!(matches!(err, WorkoutError::Database(_)));
        assert!(err.to_string().contains("missing_table"));
    }

    #[test]
    fn test_rows_use_metric_column_name() {
        let db = seeded_db();
        let frame = fetch(
            &db,
            &TableName::default(),
            date("2024-01-01"),
            date("2024-01-01"),
            Metric::KcalBurned,
        )
        .unwrap();
        let rows = frame.to_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["kcal_burned"], serde_json::json!(310.0));
        assert_eq!(rows[0]["workout_date"], "2024-01-01 10:00:00");
        assert!(rows[0].get("metric").is_none());
    }

    #[test]
    fn test_date_span() {
        let db = seeded_db();
        let frame = fetch(
            &db,
            &TableName::default(),
            date("2024-01-01"),
            date("2024-01-31"),
            Metric::Steps,
        )
        .unwrap();
        let (first, last) = frame.date_span().unwrap();
        assert_eq!(first.date(), date("2024-01-01"));
        assert_eq!(last.date(), date("2024-01-09"));
    }
}
