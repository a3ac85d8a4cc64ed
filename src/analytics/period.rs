//! Aggregation periods
//!
//! Weeks are ISO weeks (Monday start, ISO week-numbering year), so dates on
//! either side of a year boundary that share an ISO week share a bucket.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::WorkoutError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Week,
    Month,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Period::Week => "Weekly",
            Period::Month => "Monthly",
        }
    }

    /// Bucket key for a date
    pub fn key_for(&self, date: NaiveDate) -> PeriodKey {
        match self {
            Period::Week => {
                let iso = date.iso_week();
                PeriodKey::Week {
                    year: iso.year(),
                    week: iso.week(),
                }
            }
            Period::Month => PeriodKey::Month {
                year: date.year(),
                month: date.month(),
            },
        }
    }
}

impl FromStr for Period {
    type Err = WorkoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" | "weekly" | "w" => Ok(Period::Week),
            "month" | "monthly" | "m" => Ok(Period::Month),
            _ => Err(WorkoutError::InvalidPeriod(s.to_string())),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one bucket. Ordering is chronological within a period kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PeriodKey {
    Week { year: i32, week: u32 },
    Month { year: i32, month: u32 },
}

impl PeriodKey {
    /// First calendar day of the bucket
    pub fn start_date(&self) -> Option<NaiveDate> {
        match *self {
            PeriodKey::Week { year, week } => NaiveDate::from_isoywd_opt(year, week, Weekday::Mon),
            PeriodKey::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1),
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKey::Week { year, week } => write!(f, "{}-W{:02}", year, week),
            PeriodKey::Month { year, month } => write!(f, "{}-{:02}", year, month),
        }
    }
}

impl Serialize for PeriodKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_period() {
        assert_eq!("week".parse::<Period>().unwrap(), Period::Week);
        assert_eq!("Weekly".parse::<Period>().unwrap(), Period::Week);
        assert_eq!("M".parse::<Period>().unwrap(), Period::Month);
        assert!(matches!("quarter".parse::<Period>(), Err(WorkoutError::InvalidPeriod(_))));
    }

    #[test]
    fn test_week_key_across_year_boundary() {
        // 2024-12-30 (Mon) through 2025-01-05 (Sun) are all ISO week 2025-W01
        let a = Period::Week.key_for(date("2024-12-30"));
        let b = Period::Week.key_for(date("2025-01-05"));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "2025-W01");
        assert_eq!(a.start_date(), Some(date("2024-12-30")));

        // ...but they fall in different months
        assert_ne!(
            Period::Month.key_for(date("2024-12-30")),
            Period::Month.key_for(date("2025-01-05"))
        );
    }

    #[test]
    fn test_week_starts_monday() {
        assert_ne!(
            Period::Week.key_for(date("2024-01-07")),
            Period::Week.key_for(date("2024-01-08"))
        );
        assert_eq!(
            Period::Week.key_for(date("2024-01-08")).start_date(),
            Some(date("2024-01-08"))
        );
    }

    #[test]
    fn test_month_key() {
        let key = Period::Month.key_for(date("2024-02-29"));
        assert_eq!(key.to_string(), "2024-02");
        assert_eq!(key.start_date(), Some(date("2024-02-01")));
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-02\"");
    }

    #[test]
    fn test_key_ordering_is_chronological() {
        let mut keys = vec![
            Period::Week.key_for(date("2025-01-06")),
            Period::Week.key_for(date("2024-03-01")),
            Period::Week.key_for(date("2024-12-31")),
        ];
        keys.sort();
        let labels: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(labels, vec!["2024-W09", "2025-W01", "2025-W02"]);
    }
}
