//! Command-line interface components.

use crate::config::ProcessorConfig;
use crate::constants::{
    DEFAULT_INPUT_FILE, DEFAULT_READ_BUFFER_SIZE, DEFAULT_SHARD_COUNT, LOG_TARGET,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "station-stats")]
#[command(about = "Compute per-station min/mean/max temperatures from a measurements file")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Path to the `station;temperature` measurements file
    #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT_FILE)]
    pub input: PathBuf,

    /// Worker threads for parsing and aggregation (0 = one per logical core)
    #[arg(short, long, default_value_t = 0)]
    pub workers: usize,

    /// Lock shards in the aggregation map (power of two)
    #[arg(long, default_value_t = DEFAULT_SHARD_COUNT)]
    pub shards: usize,

    /// Read buffer capacity in bytes
    #[arg(long, default_value_t = DEFAULT_READ_BUFFER_SIZE)]
    pub buffer_size: usize,

    /// Skip and count malformed lines instead of aborting the run
    #[arg(long)]
    pub skip_malformed: bool,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Enable verbose logging (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only show errors. Overrides verbose settings.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Log level derived from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.no_progress
    }

    /// Build the processing configuration from command-line overrides
    pub fn to_config(&self) -> ProcessorConfig {
        let config = ProcessorConfig::new(&self.input)
            .with_workers(self.workers)
            .with_shard_count(self.shards)
            .with_read_buffer_size(self.buffer_size)
            .with_progress(self.show_progress());

        if self.skip_malformed {
            config.with_skip_malformed()
        } else {
            config
        }
    }
}

/// Command execution: logging setup, the run itself, and console summaries
pub mod commands {
    use super::*;
    use crate::models::ProcessingStats;
    use crate::processor::{ProcessingOutcome, StationProcessor};
    use anyhow::{Context, Result};
    use colored::*;
    use std::io;
    use tracing::{debug, info};

    /// Main command runner
    ///
    /// 1. Set up logging
    /// 2. Build and validate configuration
    /// 3. Aggregate the input file
    /// 4. Print the report to stdout and the summary to stderr
    pub async fn run(args: Args) -> Result<ProcessingStats> {
        setup_logging(&args)?;
        debug!("Command line arguments: {:?}", args);

        let config = args.to_config();
        let processor = StationProcessor::new(config).context("Invalid configuration")?;
        let input = processor.config().input_path.display();

        if !args.quiet {
            eprintln!(
                "{} {}",
                "Starting station aggregation:".bright_green().bold(),
                input
            );
        }
        info!("===== Start =====");

        let ProcessingOutcome { report, stats } = processor
            .process()
            .await
            .with_context(|| format!("Failed to aggregate {}", input))?;

        report
            .write_to(io::stdout().lock())
            .context("Failed to write report to stdout")?;

        info!(
            "Time taken to compute {} lines: {:.3}s",
            stats.lines_read,
            stats.elapsed.as_secs_f64()
        );
        info!("===== End =====");

        if !args.quiet {
            print_summary(&stats);
        }

        Ok(stats)
    }

    /// Set up structured logging based on CLI arguments
    pub fn setup_logging(args: &Args) -> Result<()> {
        use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

        let log_level = args.get_log_level();

        // Create filter
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", LOG_TARGET, log_level)));

        // Set up subscriber based on output format preference
        let result = if args.quiet {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_level(true)
                        .with_writer(std::io::stderr)
                        .compact(),
                )
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_level(true)
                        .with_timer(fmt::time::uptime())
                        .with_writer(std::io::stderr),
                )
                .try_init()
        };
        result.context("Failed to initialize logging")?;

        debug!("Logging initialized at level: {}", log_level);
        Ok(())
    }

    /// Print a colored run summary to stderr
    pub fn print_summary(stats: &ProcessingStats) {
        eprintln!("\n{}", "Aggregation Summary".bright_green().bold());
        eprintln!(
            "  {} {}ms",
            "Time elapsed:".bright_cyan(),
            stats.elapsed.as_millis().to_string().bright_white()
        );
        eprintln!(
            "  {} {}",
            "Measurements:".bright_cyan(),
            stats.measurements_aggregated.to_string().bright_white().bold()
        );
        eprintln!(
            "  {} {}",
            "Stations:".bright_cyan(),
            stats.station_count.to_string().bright_white().bold()
        );
        if stats.malformed_skipped > 0 {
            eprintln!(
                "  {} {}",
                "Malformed lines skipped:".bright_red(),
                stats.malformed_skipped.to_string().bright_red().bold()
            );
        }
        eprintln!(
            "  {} {:.0} lines/s",
            "Throughput:".bright_cyan(),
            stats.throughput()
        );
    }
}
