//! Period bucketing
//!
//! Groups a workout frame into week or month buckets, applies one aggregate
//! per bucket, and computes the whole-range summary alongside.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::period::{Period, PeriodKey};
use super::stats::{AggType, SummaryStats};
use crate::models::{Metric, WorkoutFrame};

/// One bucket of the aggregated view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodBucket {
    pub period: PeriodKey,
    pub period_start: Option<NaiveDate>,
    pub record_count: usize,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub metric: Metric,
    pub agg_type: AggType,
    pub period: Period,
    /// One bucket per distinct period present in the input, ascending
    pub buckets: Vec<PeriodBucket>,
    pub summary: SummaryStats,
}

impl AggregationResult {
    pub fn bucket_values(&self) -> Vec<f64> {
        self.buckets.iter().map(|b| b.value).collect()
    }
}

pub fn aggregate_by_period(frame: &WorkoutFrame, agg_type: AggType, period: Period) -> AggregationResult {
    let mut grouped: BTreeMap<PeriodKey, Vec<f64>> = BTreeMap::new();
    for record in &frame.records {
        grouped
            .entry(period.key_for(record.workout_date.date()))
            .or_default()
            .push(record.value);
    }

    let buckets = grouped
        .into_iter()
        .map(|(key, values)| PeriodBucket {
            period: key,
            period_start: key.start_date(),
            record_count: values.len(),
            value: agg_type.apply(&values),
        })
        .collect();

    AggregationResult {
        metric: frame.metric,
        agg_type,
        period,
        buckets,
        summary: SummaryStats::from_values(&frame.values()),
    }
}
