//! SweatStats Status Tool
//!
//! Provides runtime status information about the SweatStats service.

use serde::Serialize;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::{Database, Location};

/// Dashboard usage instructions for AI assistants
pub const DASHBOARD_INSTRUCTIONS: &str = r#"
# SweatStats Workout Dashboard Instructions

SweatStats reads workout summaries from a SQLite table and aggregates one
metric at a time.

## Metrics

Call `list_metrics` for the full list. Valid names:
- `distance_mi` - Distance (miles)
- `duration_sec` - Duration (seconds)
- `kcal_burned` - Calories burned
- `avg_pace` - Average pace (min/mile)
- `max_pace` - Max pace (min/mile)
- `steps` - Steps

Any other metric name is rejected before the database is touched.

## Date Ranges

- Dates use ISO format: YYYY-MM-DD
- Both bounds are inclusive calendar days
- Omitted bounds fall back to the configured default window

## Aggregation

`aggregate_workouts` groups rows into buckets:
- `period`: `week` (ISO weeks, labelled like `2024-W01`) or `month` (`2024-01`)
- `agg_type`: `sum`, `mean`, `std`, `min`, `max`, `count`, `skew`, `median`, `kurt`

Statistics that are undefined for a bucket (std with one value, skew with
fewer than three, kurtosis with fewer than four, anything but sum/count on
an empty set) are returned as `null`.

## Dashboard

`workout_dashboard` returns everything at once: the period buckets, the
summary statistics over the whole range, the earliest and latest workout,
a 15-bin histogram and the per-weekday distribution. When the range holds
no workouts, `empty` is true and `message` explains why.

## Tips

- Use `get_workout_data` to inspect the raw rows behind an aggregate
- Use `workout_histogram` with `bins` (1 to 1000) for a finer or coarser distribution
- Use `sweatstats_status` to confirm the database is reachable
"#;

/// Runtime status of the SweatStats service
#[derive(Debug, Clone, Serialize)]
pub struct SweatStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub build_profile: &'static str,
    pub version: &'static str,
    pub version_line: String,

    /// Database information
    pub database: String,
    pub database_size_bytes: Option<u64>,
    pub database_reachable: bool,
    pub database_error: Option<String>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database: Database,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database: Database) -> Self {
        Self {
            start_time: Instant::now(),
            database,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> SweatStatus {
        let build_info = BuildInfo::current();

        let location = self.database.location();
        let database_size_bytes = match location {
            Location::File(path) => std::fs::metadata(path).ok().map(|m| m.len()),
            Location::Memory => None,
        };

        let database_error = self.database.ping().err().map(|e| e.to_string());

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        SweatStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            build_profile: build_info.profile,
            version: build_info.version,
            version_line: build_info.version_line(),
            database: location.describe(),
            database_size_bytes,
            database_reachable: database_error.is_none(),
            database_error,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_in_memory() {
        let tracker = StatusTracker::new(Database::in_memory().unwrap());
        let status = tracker.get_status();
        assert_eq!(status.database, ":memory:");
        assert!(status.database_reachable);
        assert!(status.database_error.is_none());
        assert!(status.database_size_bytes.is_none());
        assert_eq!(status.process_id, std::process::id());
        assert!(status.version_line.starts_with("sweatstats "));
    }

    #[test]
    fn test_instructions_name_every_metric() {
        for metric in crate::models::Metric::ALL {
            assert!(DASHBOARD_INSTRUCTIONS.contains(metric.column()));
        }
    }
}
