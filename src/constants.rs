//! Application constants for the station aggregator
//!
//! Default values, record format markers and console templates used
//! throughout the crate.

// =============================================================================
// Input Format
// =============================================================================

/// Input file read when no path is given on the command line
pub const DEFAULT_INPUT_FILE: &str = "measurements.txt";

/// Separator between the station name and the temperature
pub const FIELD_DELIMITER: char = ';';

// =============================================================================
// Aggregation Defaults
// =============================================================================

/// Number of lock shards in the aggregation map (must be a power of two)
pub const DEFAULT_SHARD_COUNT: usize = 64;

/// Upper bound on shard count accepted by configuration validation
pub const MAX_SHARD_COUNT: usize = 1 << 16;

/// Capacity of the buffered line reader in bytes
pub const DEFAULT_READ_BUFFER_SIZE: usize = 1024 * 1024;

/// Expected number of distinct stations, used to pre-size shards
pub const EXPECTED_STATION_COUNT: usize = 10_000;

// =============================================================================
// Console Output
// =============================================================================

/// Log target used by the default `EnvFilter`
pub const LOG_TARGET: &str = "station_stats";

/// Progress bar template for bytes read from the input file
pub const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

/// Progress bar fill characters
pub const PROGRESS_CHARS: &str = "#>-";
