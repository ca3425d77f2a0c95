//! Core data structures for station aggregation.
//!
//! Defines the parsed measurement, the per-station running statistics
//! with their accumulation step, and the per-run processing counters.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One `(station, temperature)` observation parsed from a single input line
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub station: String,
    pub temperature: f64,
}

impl Measurement {
    pub fn new(station: impl Into<String>, temperature: f64) -> Self {
        Self {
            station: station.into(),
            temperature,
        }
    }
}

/// Running aggregate for one station
///
/// Holds `min <= mean <= max` and `count >= 1` for every value produced by
/// [`Stats::first`] or [`Stats::accumulate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub count: u64,
}

impl Stats {
    /// Stats for a station seen for the first time
    pub fn first(temperature: f64) -> Self {
        Self {
            min: temperature,
            max: temperature,
            mean: temperature,
            count: 1,
        }
    }

    /// Fold one temperature into an optional prior aggregate
    ///
    /// The mean is `(mean * (n - 1) + t) / n`. When the running sum would
    /// overflow (magnitudes near `f64::MAX`) the same weighted average is
    /// taken term by term instead.
    pub fn accumulate(prior: Option<&Stats>, temperature: f64) -> Self {
        let Some(prior) = prior else {
            return Self::first(temperature);
        };

        let count = prior.count + 1;
        let min = prior.min.min(temperature);
        let max = prior.max.max(temperature);

        let n = count as f64;
        let mean = (prior.mean * prior.count as f64 + temperature) / n;
        let mean = if mean.is_finite() {
            mean
        } else {
            prior.mean * (prior.count as f64 / n) + temperature / n
        };

        // rounding can push the mean a hair past an extreme
        let mean = if mean < min {
            min
        } else if mean > max {
            max
        } else {
            mean
        };

        Self {
            min,
            max,
            mean,
            count,
        }
    }
}

/// Counters and timing for one aggregation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessingStats {
    /// Lines pulled from the input file
    pub lines_read: u64,
    /// Lines successfully folded into the map
    pub measurements_aggregated: u64,
    /// Lines skipped under the skip-malformed policy
    pub malformed_skipped: u64,
    /// Distinct stations in the final report
    pub station_count: usize,
    /// Wall-clock time of the run
    pub elapsed: Duration,
}

impl ProcessingStats {
    /// Measurements folded per second of wall-clock time
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.measurements_aggregated as f64 / secs
        }
    }
}
