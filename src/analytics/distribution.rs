//! Day-of-week distribution
//!
//! Splits a frame by weekday (Monday first) and bins each day's values.

use chrono::{Datelike, Weekday};
use serde::Serialize;

use super::histogram::{histogram, Histogram};
use crate::error::WorkoutResult;
use crate::models::WorkoutFrame;

/// Bins used for each weekday's histogram
pub const WEEKDAY_BINS: usize = 10;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayDistribution {
    pub day: &'static str,
    pub count: usize,
    pub mean: f64,
    pub histogram: Histogram,
}

fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Distribution for every weekday that has at least one record
pub fn day_of_week_distribution(frame: &WorkoutFrame, bins: usize) -> WorkoutResult<Vec<WeekdayDistribution>> {
    let mut result = Vec::new();

    for day in WEEKDAYS {
        let values: Vec<f64> = frame
            .records
            .iter()
            .filter(|r| r.workout_date.weekday() == day)
            .map(|r| r.value)
            .collect();

        if values.is_empty() {
            continue;
        }

        result.push(WeekdayDistribution {
            day: day_name(day),
            count: values.len(),
            mean: super::stats::mean(&values),
            histogram: histogram(&values, bins)?,
        });
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkoutError;
    use crate::models::{Metric, WorkoutRecord};
    use chrono::NaiveDate;

    fn record(date: &str, value: f64) -> WorkoutRecord {
        WorkoutRecord {
            workout_date: NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .unwrap()
                .and_hms_opt(6, 30, 0)
                .unwrap(),
            activity_type: "run".to_string(),
            value,
        }
    }

    #[test]
    fn test_days_in_weekday_order() {
        let frame = WorkoutFrame::new(
            Metric::DistanceMi,
            vec![
                record("2024-01-07", 10.0), // Sunday
                record("2024-01-01", 3.0),  // Monday
                record("2024-01-08", 5.0),  // Monday
                record("2024-01-03", 4.0),  // Wednesday
            ],
        );

        let dist = day_of_week_distribution(&frame, WEEKDAY_BINS).unwrap();
        let days: Vec<&str> = dist.iter().map(|d| d.day).collect();
        assert_eq!(days, vec!["Monday", "Wednesday", "Sunday"]);

        assert_eq!(dist[0].count, 2);
        assert_eq!(dist[0].mean, 4.0);
        assert_eq!(dist[0].histogram.total(), 2);
        assert_eq!(dist[0].histogram.bins(), WEEKDAY_BINS);

        let total: usize = dist.iter().map(|d| d.count).sum();
        assert_eq!(total, frame.len());
    }

    #[test]
    fn test_empty_frame_has_no_days() {
        let frame = WorkoutFrame::new(Metric::Steps, Vec::new());
        assert!(day_of_week_distribution(&frame, WEEKDAY_BINS).unwrap().is_empty());
    }

    #[test]
    fn test_zero_bins_rejected() {
        let frame = WorkoutFrame::new(Metric::Steps, vec![record("2024-01-01", 1.0)]);
        assert!(matches!(
            day_of_week_distribution(&frame, 0),
            Err(WorkoutError::InvalidBinCount(0))
        ));
    }
}
