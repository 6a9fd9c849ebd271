//! `mb-bench` - Benchmark driver for matbench.
//!
//! Times noisy signal synthesis, operand generation, and the sequential and
//! data-parallel square matrix products, and reports wall-clock durations.

pub mod config;
pub mod driver;
pub mod error;
pub mod report;

pub use config::BenchConfig;
pub use driver::{run, run_with, time_multiply};
pub use error::{BenchError, Result};
pub use report::{BenchReport, StepTiming};
