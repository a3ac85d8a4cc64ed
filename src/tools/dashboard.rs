//! Dashboard tools
//!
//! Request-level operations: resolve the caller's selection against the
//! configured defaults, fetch once, then aggregate. Selection errors are
//! raised before any connection is checked out.

use std::fmt::Write as _;

use serde::Serialize;
use serde_json::Value;

use crate::analytics::{
    aggregate_by_period, day_of_week_distribution, histogram, AggType, Histogram, Period,
    PeriodBucket, SummaryStats, WeekdayDistribution, DEFAULT_BINS, MAX_BINS, WEEKDAY_BINS,
};
use crate::config::{DashboardConfig, DateRange};
use crate::db::Database;
use crate::error::WorkoutResult;
use crate::models::{fetch, Metric, WorkoutFrame};

/// Message used when a date range selects no workouts
pub const EMPTY_MESSAGE: &str = "No data available for the selected date range.";

/// Raw caller selection; `None` falls back to the configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct Selection<'a> {
    pub metric: Option<&'a str>,
    pub agg_type: Option<&'a str>,
    pub period: Option<&'a str>,
    pub start_date: Option<&'a str>,
    pub end_date: Option<&'a str>,
}

/// Validated selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub metric: Metric,
    pub agg_type: AggType,
    pub period: Period,
    pub range: DateRange,
}

impl Selection<'_> {
    pub fn resolve(&self, config: &DashboardConfig) -> WorkoutResult<Resolved> {
        let metric = match self.metric {
            Some(m) => m.parse()?,
            None => config.metric,
        };
        let agg_type = match self.agg_type {
            Some(a) => a.parse()?,
            None => config.agg_type,
        };
        let period = match self.period {
            Some(p) => p.parse()?,
            None => config.period,
        };
        let range = DateRange::resolve(self.start_date, self.end_date, config.default_range()?)?;

        Ok(Resolved {
            metric,
            agg_type,
            period,
            range,
        })
    }
}

fn fetch_resolved(db: &Database, config: &DashboardConfig, resolved: &Resolved) -> WorkoutResult<WorkoutFrame> {
    fetch(
        db,
        &config.table,
        resolved.range.start,
        resolved.range.end,
        resolved.metric,
    )
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct MetricInfo {
    pub name: &'static str,
    pub display_name: &'static str,
    pub unit: &'static str,
}

#[derive(Debug, Serialize)]
pub struct WorkoutDataResponse {
    pub metric: Metric,
    pub date_range: DateRange,
    pub total: usize,
    pub rows: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct AggregateResponse {
    pub metric: Metric,
    pub agg_type: AggType,
    pub period: Period,
    pub date_range: DateRange,
    pub empty: bool,
    pub buckets: Vec<PeriodBucket>,
    pub summary: SummaryStats,
}

#[derive(Debug, Serialize)]
pub struct HistogramResponse {
    pub metric: Metric,
    pub date_range: DateRange,
    pub workouts: usize,
    pub histogram: Histogram,
}

#[derive(Debug, Serialize)]
pub struct DayOfWeekResponse {
    pub metric: Metric,
    pub date_range: DateRange,
    pub days: Vec<WeekdayDistribution>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub metric: Metric,
    pub metric_display: &'static str,
    pub unit: &'static str,
    pub agg_type: AggType,
    pub agg_display: &'static str,
    pub period: Period,
    pub date_range: DateRange,
    pub empty: bool,
    pub message: Option<String>,
    pub workouts: usize,
    pub earliest_workout: Option<String>,
    pub latest_workout: Option<String>,
    pub summary: SummaryStats,
    pub buckets: Vec<PeriodBucket>,
    pub histogram: Option<Histogram>,
    pub day_of_week: Vec<WeekdayDistribution>,
}

// ============================================================================
// Tool Functions
// ============================================================================

pub fn list_metrics() -> Vec<MetricInfo> {
    Metric::ALL
        .iter()
        .map(|m| MetricInfo {
            name: m.column(),
            display_name: m.display_name(),
            unit: m.unit(),
        })
        .collect()
}

/// Raw rows for one metric
pub fn get_workout_data(
    db: &Database,
    config: &DashboardConfig,
    selection: &Selection,
) -> WorkoutResult<WorkoutDataResponse> {
    let resolved = selection.resolve(config)?;
    let frame = fetch_resolved(db, config, &resolved)?;

    Ok(WorkoutDataResponse {
        metric: frame.metric,
        date_range: resolved.range,
        total: frame.len(),
        rows: frame.to_rows(),
    })
}

/// Bucketed aggregate plus whole-range summary
pub fn aggregate_workouts(
    db: &Database,
    config: &DashboardConfig,
    selection: &Selection,
) -> WorkoutResult<AggregateResponse> {
    let resolved = selection.resolve(config)?;
    let frame = fetch_resolved(db, config, &resolved)?;
    let result = aggregate_by_period(&frame, resolved.agg_type, resolved.period);

    Ok(AggregateResponse {
        metric: result.metric,
        agg_type: result.agg_type,
        period: result.period,
        date_range: resolved.range,
        empty: frame.is_empty(),
        buckets: result.buckets,
        summary: result.summary,
    })
}

pub fn workout_histogram(
    db: &Database,
    config: &DashboardConfig,
    selection: &Selection,
    bins: Option<usize>,
) -> WorkoutResult<HistogramResponse> {
    let resolved = selection.resolve(config)?;
    let bins = bins.unwrap_or(DEFAULT_BINS);
    if bins == 0 || bins > MAX_BINS {
        return Err(crate::error::WorkoutError::InvalidBinCount(bins));
    }
    let frame = fetch_resolved(db, config, &resolved)?;

    Ok(HistogramResponse {
        metric: frame.metric,
        date_range: resolved.range,
        workouts: frame.len(),
        histogram: histogram(&frame.values(), bins)?,
    })
}

pub fn day_of_week(
    db: &Database,
    config: &DashboardConfig,
    selection: &Selection,
) -> WorkoutResult<DayOfWeekResponse> {
    let resolved = selection.resolve(config)?;
    let frame = fetch_resolved(db, config, &resolved)?;

    Ok(DayOfWeekResponse {
        metric: frame.metric,
        date_range: resolved.range,
        days: day_of_week_distribution(&frame, WEEKDAY_BINS)?,
    })
}

/// Everything the dashboard page shows, from a single fetch
pub fn workout_dashboard(
    db: &Database,
    config: &DashboardConfig,
    selection: &Selection,
) -> WorkoutResult<DashboardResponse> {
    let resolved = selection.resolve(config)?;
    let frame = fetch_resolved(db, config, &resolved)?;
    let result = aggregate_by_period(&frame, resolved.agg_type, resolved.period);

    let empty = frame.is_empty();
    if empty {
        tracing::info!(
            metric = %resolved.metric,
            start = %resolved.range.start,
            end = %resolved.range.end,
            "dashboard range has no workouts"
        );
    }

    let span = frame.date_span();
    let histogram = if empty {
        None
    } else {
        Some(histogram(&frame.values(), DEFAULT_BINS)?)
    };

    Ok(DashboardResponse {
        metric: resolved.metric,
        metric_display: resolved.metric.display_name(),
        unit: resolved.metric.unit(),
        agg_type: resolved.agg_type,
        agg_display: resolved.agg_type.display_name(),
        period: resolved.period,
        date_range: resolved.range,
        empty,
        message: empty.then(|| EMPTY_MESSAGE.to_string()),
        workouts: frame.len(),
        earliest_workout: span.map(|(first, _)| first.format("%m-%d-%Y").to_string()),
        latest_workout: span.map(|(_, last)| last.format("%m-%d-%Y").to_string()),
        summary: result.summary,
        buckets: result.buckets,
        histogram,
        day_of_week: day_of_week_distribution(&frame, WEEKDAY_BINS)?,
    })
}

fn fmt_stat(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}", value)
    } else {
        "n/a".to_string()
    }
}

/// Plain-text rendering of a dashboard response
pub fn format_dashboard(d: &DashboardResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} Summary Statistics", d.metric_display);
    let _ = writeln!(out, "Range: {} to {}", d.date_range.start, d.date_range.end);

    if let Some(message) = &d.message {
        let _ = writeln!(out, "{}", message);
        return out;
    }

    let s = &d.summary;
    let _ = writeln!(out, "  Average:            {}", fmt_stat(s.mean));
    let _ = writeln!(out, "  Median:             {}", fmt_stat(s.median));
    let _ = writeln!(out, "  Standard Deviation: {}", fmt_stat(s.std));
    let _ = writeln!(out, "  Skew:               {}", fmt_stat(s.skew));
    let _ = writeln!(out, "  Kurtosis:           {}", fmt_stat(s.kurt));
    let _ = writeln!(out, "  Total:              {}", fmt_stat(s.total));
    let _ = writeln!(out, "  Min / Max:          {} / {}", fmt_stat(s.min), fmt_stat(s.max));
    if let (Some(first), Some(last)) = (&d.earliest_workout, &d.latest_workout) {
        let _ = writeln!(out, "  Earliest Workout:   {}", first);
        let _ = writeln!(out, "  Latest Workout:     {}", last);
    }
    let _ = writeln!(out, "  # workouts:         {}", s.count);

    let _ = writeln!(out);
    let _ = writeln!(out, "{} {}", d.period.display_name(), d.agg_display);
    for bucket in &d.buckets {
        let _ = writeln!(out, "  {:<10} {:>12}", bucket.period.to_string(), fmt_stat(bucket.value));
    }

    if !d.day_of_week.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Day of Week");
        for day in &d.day_of_week {
            let _ = writeln!(out, "  {:<10} {:>4} workouts, mean {}", day.day, day.count, fmt_stat(day.mean));
        }
    }

    out
}
