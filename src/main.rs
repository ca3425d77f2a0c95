use clap::Parser;
use station_stats::cli::{Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Create async runtime and run the main command logic
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    match runtime.block_on(commands::run(args)) {
        Ok(_stats) => {
            // Success - report and summary have already been printed
            process::exit(0);
        }
        Err(error) => {
            // No partial report is printed on failure
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
