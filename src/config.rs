//! Dashboard configuration
//!
//! Read from `SWEATSTATS_*` environment variables, with defaults for
//! everything. The connection descriptor and the default selection are passed
//! into the core as values; nothing here holds global state.

use std::path::PathBuf;

use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;

use crate::analytics::{AggType, Period};
use crate::error::{WorkoutError, WorkoutResult};
use crate::models::{parse_date_arg, Metric, TableName};

pub const ENV_DATABASE_PATH: &str = "SWEATSTATS_DATABASE_PATH";
pub const ENV_TABLE: &str = "SWEATSTATS_TABLE";
pub const ENV_METRIC: &str = "SWEATSTATS_METRIC";
pub const ENV_PERIOD: &str = "SWEATSTATS_PERIOD";
pub const ENV_AGG_TYPE: &str = "SWEATSTATS_AGG_TYPE";
pub const ENV_LOOKBACK_DAYS: &str = "SWEATSTATS_LOOKBACK_DAYS";
pub const ENV_END_OFFSET_DAYS: &str = "SWEATSTATS_END_OFFSET_DAYS";

const DEFAULT_LOOKBACK_DAYS: i64 = 365;

/// Upper bound for the lookback and end offset, a little under 274 years
pub const MAX_WINDOW_DAYS: i64 = 100_000;

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Explicit bounds win over the configured default window.
    ///
    /// Ordering is not checked: an inverted range just selects nothing.
    pub fn resolve(
        start: Option<&str>,
        end: Option<&str>,
        default: DateRange,
    ) -> WorkoutResult<Self> {
        let start = start.map(parse_date_arg).transpose()?.unwrap_or(default.start);
        let end = end.map(parse_date_arg).transpose()?.unwrap_or(default.end);
        Ok(Self { start, end })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardConfig {
    /// Connection descriptor: a SQLite file path or `:memory:`
    pub database: String,
    pub table: TableName,
    pub metric: Metric,
    pub period: Period,
    pub agg_type: AggType,
    pub lookback_days: i64,
    /// Days between today and the end of the default window
    pub end_offset_days: i64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            database: default_database_path().display().to_string(),
            table: TableName::default(),
            metric: Metric::DistanceMi,
            period: Period::Week,
            agg_type: AggType::Sum,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            end_offset_days: 0,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> WorkoutResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> WorkoutResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get(ENV_DATABASE_PATH) {
            config.database = path;
        }
        if let Some(table) = get(ENV_TABLE) {
            config.table = TableName::parse(table.trim())?;
        }
        if let Some(metric) = get(ENV_METRIC) {
            config.metric = metric.parse()?;
        }
        if let Some(period) = get(ENV_PERIOD) {
            config.period = period.parse()?;
        }
        if let Some(agg) = get(ENV_AGG_TYPE) {
            config.agg_type = agg.parse()?;
        }
        if let Some(days) = get(ENV_LOOKBACK_DAYS) {
            config.lookback_days = parse_days(ENV_LOOKBACK_DAYS, &days)?;
        }
        if let Some(days) = get(ENV_END_OFFSET_DAYS) {
            config.end_offset_days = parse_days(ENV_END_OFFSET_DAYS, &days)?;
        }

        Ok(config)
    }

    /// The default window relative to `today`
    pub fn default_range_from(&self, today: NaiveDate) -> WorkoutResult<DateRange> {
        let end = days_before(today, self.end_offset_days, ENV_END_OFFSET_DAYS)?;
        let start = days_before(end, self.lookback_days, ENV_LOOKBACK_DAYS)?;
        Ok(DateRange { start, end })
    }

    pub fn default_range(&self) -> WorkoutResult<DateRange> {
        self.default_range_from(Local::now().date_naive())
    }
}

fn days_before(date: NaiveDate, days: i64, key: &'static str) -> WorkoutResult<NaiveDate> {
    Duration::try_days(days)
        .and_then(|d| date.checked_sub_signed(d))
        .ok_or_else(|| WorkoutError::InvalidConfig {
            key,
            message: format!("{} days before {} is outside the supported calendar", days, date),
        })
}

fn parse_days(key: &'static str, value: &str) -> WorkoutResult<i64> {
    match value.trim().parse::<i64>() {
        Ok(days) if (0..=MAX_WINDOW_DAYS).contains(&days) => Ok(days),
        _ => Err(WorkoutError::InvalidConfig {
            key,
            message: format!(
                "expected a number of days between 0 and {}, got '{}'",
                MAX_WINDOW_DAYS, value
            ),
        }),
    }
}

/// `data/sweat.db` next to the project root when running from `target/`,
/// otherwise next to the executable
pub fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("sweat.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.metric, Metric::DistanceMi);
        assert_eq!(config.period, Period::Week);
        assert_eq!(config.agg_type, AggType::Sum);
        assert_eq!(config.table.as_str(), "workout_summary");
        assert!(config.database.ends_with("sweat.db"));
    }

    #[test]
    fn test_overrides() {
        let config = DashboardConfig::from_lookup(lookup(&[
            (ENV_DATABASE_PATH, ":memory:"),
            (ENV_TABLE, "sweat.workout_summary"),
            (ENV_METRIC, "kcal_burned"),
            (ENV_PERIOD, "Monthly"),
            (ENV_AGG_TYPE, "Standard Deviation"),
            (ENV_LOOKBACK_DAYS, "30"),
            (ENV_END_OFFSET_DAYS, " "),
        ]))
        .unwrap();
        assert_eq!(config.database, ":memory:");
        assert_eq!(config.table.as_str(), "sweat.workout_summary");
        assert_eq!(config.metric, Metric::KcalBurned);
        assert_eq!(config.period, Period::Month);
        assert_eq!(config.agg_type, AggType::Std);
        assert_eq!(config.lookback_days, 30);
        assert_eq!(config.end_offset_days, 0);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            DashboardConfig::from_lookup(lookup(&[(ENV_METRIC, "vo2max")])),
            Err(WorkoutError::InvalidMetric(_))
        ));
        assert!(matches!(
            DashboardConfig::from_lookup(lookup(&[(ENV_AGG_TYPE, "mode")])),
            Err(WorkoutError::InvalidAggregationType(_))
        ));
        assert!(matches!(
            DashboardConfig::from_lookup(lookup(&[(ENV_TABLE, "x; DROP TABLE y")])),
            Err(WorkoutError::InvalidTableName(_))
        ));
        assert!(matches!(
            DashboardConfig::from_lookup(lookup(&[(ENV_LOOKBACK_DAYS, "-3")])),
            Err(WorkoutError::InvalidConfig { key: ENV_LOOKBACK_DAYS, .. })
        ));
    }

    #[test]
    fn test_default_range() {
        let config = DashboardConfig::from_lookup(lookup(&[
            (ENV_LOOKBACK_DAYS, "365"),
            (ENV_END_OFFSET_DAYS, "1461"),
        ]))
        .unwrap();
        let range = config.default_range_from(date("2028-01-01")).unwrap();
        assert_eq!(range.end, date("2024-01-01"));
        assert_eq!(range.start, date("2023-01-01"));
    }

    #[test]
    fn test_oversized_window_rejected() {
        assert!(matches!(
            DashboardConfig::from_lookup(lookup(&[(ENV_LOOKBACK_DAYS, "100000000")])),
            Err(WorkoutError::InvalidConfig { key: ENV_LOOKBACK_DAYS, .. })
        ));
        assert!(matches!(
            DashboardConfig::from_lookup(lookup(&[(ENV_END_OFFSET_DAYS, "100001")])),
            Err(WorkoutError::InvalidConfig { key: ENV_END_OFFSET_DAYS, .. })
        ));

        let widest = DashboardConfig::from_lookup(lookup(&[
            (ENV_LOOKBACK_DAYS, "100000"),
            (ENV_END_OFFSET_DAYS, "100000"),
        ]))
        .unwrap();
        assert!(widest.default_range().is_ok());

        // Fields set directly skip the parser; the window is still checked
        let direct = DashboardConfig {
            lookback_days: i64::MAX,
            ..DashboardConfig::default()
        };
        assert!(matches!(
            direct.default_range_from(date("2024-01-01")),
            Err(WorkoutError::InvalidConfig { key: ENV_LOOKBACK_DAYS, .. })
        ));
    }

    #[test]
    fn test_resolve_range() {
        let default = DateRange {
            start: date("2024-01-01"),
            end: date("2024-12-31"),
        };
        let range = DateRange::resolve(Some("2024-03-01"), None, default).unwrap();
        assert_eq!(range.start, date("2024-03-01"));
        assert_eq!(range.end, date("2024-12-31"));

        assert!(matches!(
            DateRange::resolve(Some("03/01/2024"), None, default),
            Err(WorkoutError::InvalidDate(_))
        ));
    }
}
