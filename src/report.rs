//! Rendering of the final per-station summary.
//!
//! The report owns the sorted entries drained from the aggregation map and
//! renders them as `{name=min/mean/max, ...}` with one decimal place.

use crate::models::Stats;
use crate::station_map::StationMap;
use std::fmt;
use std::io::{self, Write};

const WHOLE_NUMBERS_ONLY: f64 = 4_503_599_627_370_496.0 / 10.0;

/// Round to one decimal place, ties away from zero
///
/// `12.35` rounds to `12.4` and `-12.35` to `-12.4`. A result of negative
/// zero is normalized to `0.0` so `-0.04` prints as `0.0`.
pub fn round_to_tenth(value: f64) -> f64 {
    // past this magnitude an f64 has no fractional digits, and scaling
    // values near f64::MAX would overflow
    if value.abs() >= WHOLE_NUMBERS_ONLY {
        return value;
    }

    let rounded = (value * 10.0).round() / 10.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Final sorted summary of one run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    stations: Vec<(String, Stats)>,
}

impl Report {
    /// Drain a finished aggregation map into a report
    pub fn from_map(map: StationMap) -> Self {
        Self {
            stations: map.into_sorted(),
        }
    }

    /// Entries in ascending station order
    pub fn stations(&self) -> &[(String, Stats)] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Write the rendered report followed by a newline
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "{}", self)?;
        writer.flush()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, stats)) in self.stations.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(
                f,
                "{}={:.1}/{:.1}/{:.1}",
                name,
                round_to_tenth(stats.min),
                round_to_tenth(stats.mean),
                round_to_tenth(stats.max)
            )?;
        }
        f.write_str("}")
    }
}
