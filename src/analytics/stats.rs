//! Descriptive statistics
//!
//! Undefined statistics (mean of nothing, std of one value, skew below three
//! values, kurtosis below four) are `f64::NAN`, which serializes to JSON
//! `null`. Sum of nothing is 0 and count of nothing is 0.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WorkoutError;

/// Single aggregate applied to each period bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggType {
    Sum,
    Mean,
    Std,
    Min,
    Max,
    Count,
    Skew,
    Median,
    Kurt,
}

impl AggType {
    pub const ALL: [AggType; 9] = [
        AggType::Sum,
        AggType::Mean,
        AggType::Std,
        AggType::Min,
        AggType::Max,
        AggType::Count,
        AggType::Skew,
        AggType::Median,
        AggType::Kurt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AggType::Sum => "sum",
            AggType::Mean => "mean",
            AggType::Std => "std",
            AggType::Min => "min",
            AggType::Max => "max",
            AggType::Count => "count",
            AggType::Skew => "skew",
            AggType::Median => "median",
            AggType::Kurt => "kurt",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AggType::Sum => "Total",
            AggType::Mean => "Average",
            AggType::Std => "Standard Deviation",
            AggType::Min => "Minimum",
            AggType::Max => "Maximum",
            AggType::Count => "Count",
            AggType::Skew => "Skew",
            AggType::Median => "Median",
            AggType::Kurt => "Kurtosis",
        }
    }

    pub fn apply(&self, values: &[f64]) -> f64 {
        match self {
            AggType::Sum => sum(values),
            AggType::Mean => mean(values),
            AggType::Std => std_dev(values),
            AggType::Min => min(values),
            AggType::Max => max(values),
            AggType::Count => values.len() as f64,
            AggType::Skew => skew(values),
            AggType::Median => median(values),
            AggType::Kurt => kurtosis(values),
        }
    }
}

impl FromStr for AggType {
    type Err = WorkoutError;

    /// Accepts the short names plus the dashboard labels
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sum" | "total" => Ok(AggType::Sum),
            "mean" | "average" | "avg" => Ok(AggType::Mean),
            "std" | "standard deviation" | "stddev" => Ok(AggType::Std),
            "min" | "minimum" => Ok(AggType::Min),
            "max" | "maximum" => Ok(AggType::Max),
            "count" => Ok(AggType::Count),
            "skew" => Ok(AggType::Skew),
            "median" => Ok(AggType::Median),
            "kurt" | "kurtosis" => Ok(AggType::Kurt),
            _ => Err(WorkoutError::InvalidAggregationType(s.to_string())),
        }
    }
}

impl fmt::Display for AggType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whole-range statistics, independent of the bucketed view
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total: f64,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
    pub skew: f64,
    pub median: f64,
    pub kurt: f64,
}

impl SummaryStats {
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            total: sum(values),
            mean: mean(values),
            std: std_dev(values),
            min: min(values),
            max: max(values),
            count: values.len(),
            skew: skew(values),
            median: median(values),
            kurt: kurtosis(values),
        }
    }
}

pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    sum(values) / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator)
pub fn std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let avg = mean(values);
    let sum_sq_diff: f64 = values.iter().map(|v| (v - avg).powi(2)).sum();
    (sum_sq_diff / (n - 1) as f64).sqrt()
}

pub fn min(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::min).unwrap_or(f64::NAN)
}

pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(f64::NAN)
}

pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Sums of squared, cubed and fourth-power deviations from the mean
fn central_sums(values: &[f64]) -> (f64, f64, f64) {
    let avg = mean(values);
    values.iter().fold((0.0, 0.0, 0.0), |(m2, m3, m4), v| {
        let d = v - avg;
        let d2 = d * d;
        (m2 + d2, m3 + d2 * d, m4 + d2 * d2)
    })
}

/// Relative threshold below which the second central sum counts as zero
fn is_zero_variance(m2: f64, values: &[f64]) -> bool {
    let scale = values.iter().map(|v| v * v).sum::<f64>().max(f64::MIN_POSITIVE);
    m2 <= scale * 1e-14
}

/// Adjusted Fisher-Pearson sample skewness (G1)
pub fn skew(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 3 {
        return f64::NAN;
    }
    let (m2, m3, _) = central_sums(values);
    if is_zero_variance(m2, values) {
        return 0.0;
    }
    let n = n as f64;
    (n * (n - 1.0).sqrt() / (n - 2.0)) * (m3 / m2.powf(1.5))
}

/// Bias-corrected sample excess kurtosis (G2)
pub fn kurtosis(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 4 {
        return f64::NAN;
    }
    let (m2, _, m4) = central_sums(values);
    if is_zero_variance(m2, values) {
        return 0.0;
    }
    let n = n as f64;
    let adj = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
    let numerator = n * (n + 1.0) * (n - 1.0) * m4;
    let denominator = (n - 2.0) * (n - 3.0) * m2 * m2;
    numerator / denominator - adj
}
