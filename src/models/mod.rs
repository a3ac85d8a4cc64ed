//! Data models
//!
//! Rust structs representing the workout table and its metrics.

mod metric;
mod workout;

pub use metric::Metric;
pub use workout::{
    fetch, fetch_by_name, parse_date_arg, parse_workout_date, TableName, WorkoutFrame,
    WorkoutRecord, DEFAULT_TABLE,
};

#[cfg(test)]
pub(crate) use workout::test_support;
