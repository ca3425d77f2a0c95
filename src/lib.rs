//! Station Stats Library
//!
//! Computes per-station minimum, mean and maximum temperatures from large
//! `station;temperature` measurement files in a single parallel pass.
//!
//! This library provides tools for:
//! - Streaming lines from the input file with a buffered, single-pass reader
//! - Parsing `station;temperature` records
//! - Aggregating into a sharded concurrent map with atomic per-station upserts
//! - Rendering the sorted `{name=min/mean/max, ...}` report

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod processor;
pub mod report;
pub mod station_map;

// Re-export commonly used types
pub use config::{MalformedPolicy, ProcessorConfig};
pub use error::{Result, StatsError};
pub use models::{Measurement, ProcessingStats, Stats};
pub use processor::{ProcessingOutcome, StationProcessor, aggregate_file};
pub use report::Report;
pub use station_map::StationMap;
