//! Equal-width histograms
//!
//! Bins are half-open `[edge[i], edge[i + 1])` except the last, which also
//! includes the maximum. When every value is identical the range is widened
//! to `[v - 0.5, v + 0.5]` so the value lands in the middle bin. An empty
//! input uses the range `[0, 1]` with all counts zero.

use serde::Serialize;

use crate::error::{WorkoutError, WorkoutResult};

/// Bins used for the dashboard distribution chart
pub const DEFAULT_BINS: usize = 15;

/// Largest bin count a caller may request
pub const MAX_BINS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// `bins + 1` ascending edges
    pub bin_edges: Vec<f64>,
    /// `bins` counts
    pub counts: Vec<u64>,
}

impl Histogram {
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn bin_width(&self) -> f64 {
        match (self.bin_edges.first(), self.bin_edges.get(1)) {
            (Some(a), Some(b)) => b - a,
            _ => 0.0,
        }
    }
}

pub fn histogram(values: &[f64], bins: usize) -> WorkoutResult<Histogram> {
    if bins == 0 || bins > MAX_BINS {
        return Err(WorkoutError::InvalidBinCount(bins));
    }

    let (mut lo, mut hi) = match (super::stats::min(values), super::stats::max(values)) {
        (lo, hi) if lo.is_nan() || hi.is_nan() => (0.0, 1.0),
        (lo, hi) => (lo, hi),
    };
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = hi - lo;
    let mut bin_edges: Vec<f64> = (0..=bins)
        .map(|i| lo + width * i as f64 / bins as f64)
        .collect();
    bin_edges[bins] = hi;

    let mut counts = vec![0u64; bins];
    for &v in values {
        let scaled = ((v - lo) / width * bins as f64).floor();
        let mut idx = if scaled < 0.0 {
            0
        } else {
            (scaled as usize).min(bins - 1)
        };

        // Rounding in the scaled index can land one bin off the edges
        if idx > 0 && v < bin_edges[idx] {
            idx -= 1;
        } else if idx + 1 < bins && v >= bin_edges[idx + 1] {
            idx += 1;
        }
        counts[idx] += 1;
    }

    Ok(Histogram { bin_edges, counts })
}
