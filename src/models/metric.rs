//! Metric model
//!
//! The closed set of numeric workout columns that may be queried. Column
//! names cannot be bound as SQL parameters, so a metric only ever reaches a
//! query through [`Metric::column`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WorkoutError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    DistanceMi,
    DurationSec,
    KcalBurned,
    AvgPace,
    MaxPace,
    Steps,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::DistanceMi,
        Metric::DurationSec,
        Metric::KcalBurned,
        Metric::AvgPace,
        Metric::MaxPace,
        Metric::Steps,
    ];

    /// Column name in the workout table
    pub fn column(&self) -> &'static str {
        match self {
            Metric::DistanceMi => "distance_mi",
            Metric::DurationSec => "duration_sec",
            Metric::KcalBurned => "kcal_burned",
            Metric::AvgPace => "avg_pace",
            Metric::MaxPace => "max_pace",
            Metric::Steps => "steps",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Metric::DistanceMi => "Distance (miles)",
            Metric::DurationSec => "Duration (seconds)",
            Metric::KcalBurned => "Calories Burned",
            Metric::AvgPace => "Average Pace",
            Metric::MaxPace => "Max Pace",
            Metric::Steps => "Steps",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::DistanceMi => "mi",
            Metric::DurationSec => "s",
            Metric::KcalBurned => "kcal",
            Metric::AvgPace | Metric::MaxPace => "min/mi",
            Metric::Steps => "steps",
        }
    }
}

impl FromStr for Metric {
    type Err = WorkoutError;

    /// Accepts the column name or the dashboard label, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.column() == normalized || m.display_name().to_lowercase() == normalized)
            .ok_or_else(|| WorkoutError::InvalidMetric(s.to_string()))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}
