//! Configuration management and validation.
//!
//! Provides the processing configuration for one aggregation run,
//! the malformed-record policy, and system profiling used to pick a
//! default worker count.

use crate::constants::{
    DEFAULT_INPUT_FILE, DEFAULT_READ_BUFFER_SIZE, DEFAULT_SHARD_COUNT, MAX_SHARD_COUNT,
};
use crate::error::{Result, StatsError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// What to do with a line that does not parse as `station;temperature`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MalformedPolicy {
    /// Abort the whole run with a `MalformedRecord` error
    #[default]
    Abort,
    /// Log and count the line, then continue
    Skip,
}

/// System profiling information for sizing the worker pool
#[derive(Debug, Clone)]
pub struct SystemProfile {
    /// Number of logical CPU cores available
    pub cpu_cores: usize,
}

impl SystemProfile {
    /// Auto-detect system capabilities
    pub fn detect() -> Self {
        Self {
            cpu_cores: num_cpus::get(),
        }
    }
}

/// Configuration for one aggregation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Measurements file to read
    pub input_path: PathBuf,

    /// Worker threads for parsing and aggregation (0 = one per logical core)
    pub workers: usize,

    /// Lock shards in the aggregation map (power of two)
    pub shard_count: usize,

    /// Capacity of the buffered reader in bytes
    pub read_buffer_size: usize,

    /// Policy for unparsable lines
    pub malformed_policy: MalformedPolicy,

    /// Show a byte progress bar on stderr while reading
    pub show_progress: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_FILE),
            workers: 0,
            shard_count: DEFAULT_SHARD_COUNT,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            malformed_policy: MalformedPolicy::Abort,
            show_progress: false,
        }
    }
}

impl ProcessorConfig {
    /// Create configuration for a specific input file
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            ..Default::default()
        }
    }

    /// Create configuration with custom worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Create configuration with custom shard count
    pub fn with_shard_count(mut self, shard_count: usize) -> Self {
        self.shard_count = shard_count;
        self
    }

    /// Set reader buffer capacity
    pub fn with_read_buffer_size(mut self, read_buffer_size: usize) -> Self {
        self.read_buffer_size = read_buffer_size;
        self
    }

    /// Skip and count malformed lines instead of aborting
    pub fn with_skip_malformed(mut self) -> Self {
        self.malformed_policy = MalformedPolicy::Skip;
        self
    }

    /// Enable the byte progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Worker count after resolving `0` against the detected CPU count
    pub fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }

        let profile = SystemProfile::detect();
        debug!("Auto-selected {} workers", profile.cpu_cores);
        profile.cpu_cores.max(1)
    }

    /// Check the configuration for values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.shard_count == 0 || !self.shard_count.is_power_of_two() {
            return Err(StatsError::configuration(format!(
                "shard count must be a power of two, got {}",
                self.shard_count
            )));
        }

        if self.shard_count > MAX_SHARD_COUNT {
            return Err(StatsError::configuration(format!(
                "shard count {} exceeds maximum of {}",
                self.shard_count, MAX_SHARD_COUNT
            )));
        }

        if self.read_buffer_size == 0 {
            return Err(StatsError::configuration(
                "read buffer size must be greater than zero",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProcessorConfig::default();

        assert_eq!(config.input_path, PathBuf::from("measurements.txt"));
        assert_eq!(config.workers, 0);
        assert_eq!(config.shard_count, DEFAULT_SHARD_COUNT);
        assert_eq!(config.malformed_policy, MalformedPolicy::Abort);
        assert!(!config.show_progress);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = ProcessorConfig::new("data/weather.txt")
            .with_workers(3)
            .with_shard_count(16)
            .with_read_buffer_size(4096)
            .with_skip_malformed()
            .with_progress(true);

        assert_eq!(config.input_path, PathBuf::from("data/weather.txt"));
        assert_eq!(config.workers, 3);
        assert_eq!(config.effective_workers(), 3);
        assert_eq!(config.shard_count, 16);
        assert_eq!(config.read_buffer_size, 4096);
        assert_eq!(config.malformed_policy, MalformedPolicy::Skip);
        assert!(config.show_progress);
    }

    #[test]
    fn test_effective_workers_auto_detects() {
        let config = ProcessorConfig::default();
        assert!(config.effective_workers() >= 1);
    }

    #[test]
    fn test_validate_rejects_bad_shard_counts() {
        for shard_count in [0, 3, 100, MAX_SHARD_COUNT * 2] {
            let config = ProcessorConfig::default().with_shard_count(shard_count);
            assert!(
                matches!(config.validate(), Err(StatsError::Configuration { .. })),
                "shard count {} should be rejected",
                shard_count
            );
        }
    }

    #[test]
    fn test_validate_rejects_zero_buffer() {
        let config = ProcessorConfig::default().with_read_buffer_size(0);
        assert!(matches!(
            config.validate(),
            Err(StatsError::Configuration { .. })
        ));
    }
}
