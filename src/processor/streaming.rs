//! Parallel streaming ingestion
//!
//! Bridges the sequential line source onto a rayon worker pool. Each worker
//! parses its line and upserts straight into the shared station map; there
//! is no queue between reading and aggregation beyond rayon's own hand-off.

use crate::config::{MalformedPolicy, ProcessorConfig};
use crate::error::{Result, StatsError};
use crate::processor::parser::parse_line;
use crate::processor::source::LineSource;
use crate::station_map::StationMap;

use rayon::iter::{ParallelBridge, ParallelIterator};
use std::ops::Add;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// Per-worker counters, summed once all workers finish
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestCounts {
    pub aggregated: u64,
    pub skipped: u64,
}

impl IngestCounts {
    pub fn lines(&self) -> u64 {
        self.aggregated + self.skipped
    }
}

impl Add for IngestCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            aggregated: self.aggregated + other.aggregated,
            skipped: self.skipped + other.skipped,
        }
    }
}

/// Fatal error with the lowest line position seen by any worker
#[derive(Debug, Default)]
struct FirstError {
    slot: Mutex<Option<(u64, StatsError)>>,
}

impl FirstError {
    fn record(&self, position: u64, error: StatsError) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_none_or(|(seen, _)| position < *seen) {
            *slot = Some((position, error));
        }
    }

    fn into_inner(self) -> Option<StatsError> {
        self.slot
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .map(|(_, error)| error)
    }
}

/// Drives a [`LineSource`] through the parser into a [`StationMap`]
#[derive(Debug)]
pub struct StreamingAggregator {
    workers: usize,
    malformed_policy: MalformedPolicy,
}

impl StreamingAggregator {
    pub fn new(config: &ProcessorConfig) -> Self {
        Self {
            workers: config.effective_workers(),
            malformed_policy: config.malformed_policy,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Consume `source`, folding every record into `map`
    ///
    /// Returns only after every worker has finished, so the caller may treat
    /// the map as complete. A read error, or a malformed record under
    /// [`MalformedPolicy::Abort`], stops the run. Lines are handed out in
    /// file order and every line handed out is processed, so the error
    /// returned is always the earliest failing line in the file.
    pub fn ingest(&self, source: LineSource, map: &StationMap) -> Result<IngestCounts> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("station-worker-{}", i))
            .build()
            .map_err(|e| StatsError::TaskFailed {
                reason: format!("failed to build worker pool: {}", e),
            })?;

        debug!(
            "Ingesting {} with {} workers",
            source.path().display(),
            self.workers
        );

        let policy = self.malformed_policy;
        let first_error = FirstError::default();
        let result = pool.install(|| {
            (1u64..)
                .zip(source)
                .par_bridge()
                .try_fold(IngestCounts::default, |mut counts, (position, item)| {
                    let parsed = item.and_then(|(line_number, line)| parse_line(line, line_number));
                    match parsed {
                        Ok(measurement) => {
                            map.upsert(&measurement.station, measurement.temperature);
                            counts.aggregated += 1;
                        }
                        Err(e) if policy == MalformedPolicy::Skip && e.is_malformed_record() => {
                            debug!("Skipping {}", e);
                            counts.skipped += 1;
                        }
                        Err(e) => {
                            first_error.record(position, e);
                            return Err(());
                        }
                    }
                    Ok(counts)
                })
                .try_reduce(IngestCounts::default, |a, b| Ok(a + b))
        });

        let Ok(counts) = result else {
            return Err(first_error.into_inner().unwrap_or_else(|| StatsError::TaskFailed {
                reason: "ingestion stopped without recording an error".to_string(),
            }));
        };

        if counts.skipped > 0 {
            warn!(
                "Skipped {} malformed lines out of {}",
                counts.skipped,
                counts.lines()
            );
        }

        Ok(counts)
    }
}
