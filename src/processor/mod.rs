//! Main processing engine.
//!
//! Orchestrates one aggregation run: opening the line source, parallel
//! ingestion into the station map, the barrier that ends ingestion, and
//! hand-off of the drained map to the report.

pub mod parser;
pub mod source;
pub mod streaming;

#[cfg(test)]
pub mod tests;

use self::{source::LineSource, streaming::StreamingAggregator};

use crate::config::ProcessorConfig;
use crate::constants::{PROGRESS_CHARS, PROGRESS_TEMPLATE};
use crate::error::{Result, StatsError};
use crate::models::ProcessingStats;
use crate::report::Report;
use crate::station_map::StationMap;

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use tokio::task;
use tracing::{debug, info};

/// Report and counters produced by a successful run
#[derive(Debug, Clone)]
pub struct ProcessingOutcome {
    pub report: Report,
    pub stats: ProcessingStats,
}

/// Main processor for a measurements file
#[derive(Debug, Clone)]
pub struct StationProcessor {
    config: ProcessorConfig,
}

impl StationProcessor {
    /// Create a processor, rejecting invalid configuration up front
    pub fn new(config: ProcessorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Main processing entry point
    ///
    /// Ingestion is CPU-bound and blocking, so it runs on tokio's blocking
    /// pool and this future resolves once the report is built.
    pub async fn process(&self) -> Result<ProcessingOutcome> {
        let config = self.config.clone();

        task::spawn_blocking(move || aggregate_file(&config))
            .await
            .map_err(|e| StatsError::TaskFailed {
                reason: format!("ingestion task did not complete: {}", e),
            })?
    }
}

/// Run the whole pipeline synchronously on the calling thread
pub fn aggregate_file(config: &ProcessorConfig) -> Result<ProcessingOutcome> {
    let start_time = Instant::now();
    info!("Starting aggregation of {}", config.input_path.display());

    let progress = config.show_progress.then(create_progress_bar);
    let source = LineSource::open(
        &config.input_path,
        config.read_buffer_size,
        progress.as_ref(),
    )?;

    let map = StationMap::with_shards(config.shard_count);
    let aggregator = StreamingAggregator::new(config);
    let result = aggregator.ingest(source, &map);

    if let Some(pb) = &progress {
        match &result {
            Ok(_) => pb.finish_with_message("input consumed"),
            Err(_) => pb.abandon_with_message("aborted"),
        }
    }
    let counts = result?;

    // ingest has returned, every worker is done with the map
    let report = Report::from_map(map);

    let stats = ProcessingStats {
        lines_read: counts.lines(),
        measurements_aggregated: counts.aggregated,
        malformed_skipped: counts.skipped,
        station_count: report.len(),
        elapsed: start_time.elapsed(),
    };

    debug!("Processing stats: {:?}", stats);
    info!(
        "Finished: {} measurements from {} stations in {}ms",
        stats.measurements_aggregated,
        stats.station_count,
        stats.elapsed.as_millis()
    );

    Ok(ProcessingOutcome { report, stats })
}

fn create_progress_bar() -> ProgressBar {
    let style = ProgressStyle::with_template(PROGRESS_TEMPLATE)
        .map(|style| style.progress_chars(PROGRESS_CHARS))
        .unwrap_or_else(|_| ProgressStyle::default_bar());

    let pb = ProgressBar::new(0);
    pb.set_style(style);
    pb
}
