//! Workout analytics
//!
//! Period bucketing, summary statistics, histograms and the day-of-week
//! distribution. Everything here is pure computation over a fetched frame.

pub mod aggregate;
pub mod distribution;
pub mod histogram;
pub mod period;
pub mod stats;

pub use aggregate::{aggregate_by_period, AggregationResult, PeriodBucket};
pub use distribution::{day_of_week_distribution, WeekdayDistribution, WEEKDAY_BINS};
pub use histogram::{histogram, Histogram, DEFAULT_BINS, MAX_BINS};
pub use period::{Period, PeriodKey};
pub use stats::{AggType, SummaryStats};
