//! Integration tests for the processor module
//!
//! Tests the complete pipeline against measurement files written to a
//! temporary directory.


use crate::config::ProcessorConfig;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Write `content` to a measurements file and return a config pointing at it
pub fn write_measurements(temp_dir: &TempDir, content: &str) -> ProcessorConfig {
    let path: PathBuf = temp_dir.path().join("measurements.txt");
    fs::write(&path, content).unwrap();
    ProcessorConfig::new(path).with_workers(4)
}
