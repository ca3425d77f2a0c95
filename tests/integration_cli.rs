//! Integration tests for the `station-stats` binary
//!
//! Runs the compiled binary against temporary input files and checks the
//! stdout contract and exit codes.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn station_stats() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_station-stats"));
    command.env_remove("RUST_LOG");
    command
}

#[test]
fn test_cli_prints_sorted_report_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("measurements.txt");
    fs::write(&input, "Reykjavik;3.0\nAkureyri;5.0\nAkureyri;7.0\n").unwrap();

    let output = station_stats()
        .arg(&input)
        .arg("--no-progress")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "{Akureyri=5.0/6.0/7.0, Reykjavik=3.0/3.0/3.0}\n"
    );
}

#[test]
fn test_cli_empty_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("measurements.txt");
    fs::write(&input, "").unwrap();

    let output = station_stats().arg(&input).arg("-q").output().unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "{}\n");
}

#[test]
fn test_cli_malformed_input_fails_without_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("measurements.txt");
    fs::write(&input, "Akureyri;5.0\nNoDelimiterHere\n").unwrap();

    let output = station_stats().arg(&input).arg("-q").output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Malformed record at line 2"));
}

#[test]
fn test_cli_skip_malformed_flag() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("measurements.txt");
    fs::write(&input, "Akureyri;5.0\nNoDelimiterHere\nAkureyri;7.0\n").unwrap();

    let output = station_stats()
        .arg(&input)
        .args(["-q", "--skip-malformed"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "{Akureyri=5.0/6.0/7.0}\n"
    );
}

#[test]
fn test_cli_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("missing.txt");

    let output = station_stats().arg(&input).arg("-q").output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8(output.stderr).unwrap().contains("IO error"));
}

#[test]
fn test_cli_rejects_bad_shard_count() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("measurements.txt");
    fs::write(&input, "Akureyri;5.0\n").unwrap();

    let output = station_stats()
        .arg(&input)
        .args(["-q", "--shards", "3"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}
