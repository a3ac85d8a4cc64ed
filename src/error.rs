//! Error taxonomy for retrieval and aggregation

use thiserror::Error;

use crate::db::DbError;

#[derive(Debug, Error)]
pub enum WorkoutError {
    #[error("Invalid metric '{0}'. Must be one of: distance_mi, duration_sec, kcal_burned, avg_pace, max_pace, steps")]
    InvalidMetric(String),

    #[error("Invalid aggregation type '{0}'. Must be one of: sum, mean, std, min, max, count, skew, median, kurt")]
    InvalidAggregationType(String),

    #[error("Invalid aggregation period '{0}'. Must be one of: week, month")]
    InvalidPeriod(String),

    #[error("Invalid table name '{0}'")]
    InvalidTableName(String),

    #[error("Invalid histogram bin count {0}. Must be between 1 and {max}", max = crate::analytics::MAX_BINS)]
    InvalidBinCount(usize),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid configuration for {key}: {message}")]
    InvalidConfig { key: &'static str, message: String },

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl WorkoutError {
    /// Whether the error was caused by caller input rather than the store
    pub fn is_validation(&self) -> bool {
        !matches!(self, WorkoutError::Database(_))
    }
}

impl From<rusqlite::Error> for WorkoutError {
    fn from(e: rusqlite::Error) -> Self {
        WorkoutError::Database(DbError::Sqlite(e))
    }
}

/// Result type for retrieval and aggregation
pub type WorkoutResult<T> = Result<T, WorkoutError>;
