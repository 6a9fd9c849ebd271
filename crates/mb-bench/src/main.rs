use std::process::ExitCode;

use clap::Parser;
use mb_bench::{run, BenchConfig};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries only the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = BenchConfig::parse();
    match run(&config) {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "benchmark failed");
            ExitCode::FAILURE
        }
    }
}
