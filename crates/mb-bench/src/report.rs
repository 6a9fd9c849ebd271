use std::fmt;
use std::time::Duration;

use mb_signal::{NoiseKind, Precision};

pub const SIGNAL_STEP: &str = "signal synthesis";
pub const OPERANDS_STEP: &str = "operand generation";
pub const SEQUENTIAL_STEP: &str = "sequential multiply";
pub const PARALLEL_STEP: &str = "parallel multiply";

/// Wall-clock samples of one benchmark step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepTiming {
    label: String,
    samples: Vec<Duration>,
}

impl StepTiming {
    pub fn new(label: impl Into<String>) -> Self {
        StepTiming {
            label: label.into(),
            samples: Vec::new(),
        }
    }

    pub fn record(&mut self, elapsed: Duration) {
        self.samples.push(elapsed);
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn samples(&self) -> &[Duration] {
        &self.samples
    }

    pub fn total(&self) -> Duration {
        self.samples.iter().sum()
    }

    /// Mean sample, zero when nothing was recorded.
    pub fn mean(&self) -> Duration {
        match u32::try_from(self.samples.len()) {
            Ok(0) => Duration::ZERO,
            Ok(n) => self.total() / n,
            Err(_) => {
                Duration::from_secs_f64(self.total().as_secs_f64() / self.samples.len() as f64)
            }
        }
    }

    pub fn min(&self) -> Duration {
        self.samples.iter().min().copied().unwrap_or(Duration::ZERO)
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1e3
}

impl fmt::Display for StepTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.3} ms (min {:.3} ms, n={})",
            self.label,
            millis(self.mean()),
            millis(self.min()),
            self.samples.len()
        )
    }
}

/// Result of one benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchReport {
    pub precision: Precision,
    pub noise: NoiseKind,
    pub backend: String,
    pub size: usize,
    steps: Vec<StepTiming>,
}

impl BenchReport {
    pub fn new(
        precision: Precision,
        noise: NoiseKind,
        backend: impl Into<String>,
        size: usize,
    ) -> Self {
        BenchReport {
            precision,
            noise,
            backend: backend.into(),
            size,
            steps: Vec::new(),
        }
    }

    pub fn push(&mut self, step: StepTiming) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    /// Step by label.
    pub fn step(&self, label: &str) -> Option<&StepTiming> {
        self.steps.iter().find(|s| s.label == label)
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "matbench: {n}x{n} {} matrices, {} noise, parallel backend {}",
            self.precision,
            self.noise,
            self.backend,
            n = self.size
        )?;
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {}", step)?;
        }
        Ok(())
    }
}
