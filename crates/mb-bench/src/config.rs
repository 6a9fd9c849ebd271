use clap::Parser;
use mb_signal::{NoiseKind, Precision, Scalar};
use mb_tensor::{BackendKind, BackendOptions, Partition};

use crate::error::{BenchError, Result};

/// Benchmark configuration, parsed from the command line.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    name = "mb-bench",
    version,
    about = "Times noisy signal synthesis and sequential vs data-parallel square matmul"
)]
pub struct BenchConfig {
    /// Number of samples in the synthesized signal.
    #[arg(long, default_value_t = 100)]
    pub signal_length: usize,

    /// Amplitude of the sine wave.
    #[arg(long, default_value_t = 1.0)]
    pub amplitude: f64,

    /// Noise spread added to the signal.
    #[arg(long, default_value_t = 0.1, allow_negative_numbers = true)]
    pub signal_noise: f64,

    /// Dimension n of the n x n operand matrices.
    #[arg(short = 'n', long, default_value_t = 5)]
    pub size: usize,

    /// Noise spread of the operand entries.
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub matrix_noise: f64,

    /// Numeric precision: f32 or f64.
    #[arg(short, long, default_value_t = Precision::F64)]
    pub precision: Precision,

    /// Noise family: gaussian or uniform [default: uniform for f32, gaussian for f64].
    #[arg(long)]
    pub noise: Option<NoiseKind>,

    /// Parallel strategy timed against the sequential baseline: thread-pool or metal.
    #[arg(short, long, default_value_t = BackendKind::ThreadPool)]
    pub backend: BackendKind,

    /// Thread pool work item: one output row or one output cell.
    #[arg(long, default_value_t = Partition::Row)]
    pub partition: Partition,

    /// Thread pool size (0 = one per CPU).
    #[arg(short, long, default_value_t = 0)]
    pub threads: usize,

    /// Timed repetitions of each multiplication.
    #[arg(short, long, default_value_t = 1)]
    pub iterations: usize,

    /// Master seed for reproducible noise.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            signal_length: 100,
            amplitude: 1.0,
            signal_noise: 0.1,
            size: 5,
            matrix_noise: 1.0,
            precision: Precision::F64,
            noise: None,
            backend: BackendKind::ThreadPool,
            partition: Partition::Row,
            threads: 0,
            iterations: 1,
            seed: None,
        }
    }
}

impl BenchConfig {
    /// Check the configuration before any work is done, in the configured
    /// precision.
    pub fn validate(&self) -> Result<()> {
        match self.precision {
            Precision::F32 => self.validate_for::<f32>(),
            Precision::F64 => self.validate_for::<f64>(),
        }
    }

    /// Check the configuration for a run with `T` elements.
    ///
    /// # Errors
    /// Returns `InvalidConfig` for a zero matrix size or iteration count,
    /// a non-parallel backend in the parallel slot, or an amplitude or
    /// spread that is not finite once converted to `T`.
    pub fn validate_for<T: Scalar>(&self) -> Result<()> {
        if self.size == 0 {
            return Err(BenchError::InvalidConfig(
                "matrix size must be > 0".to_string(),
            ));
        }
        if self.iterations == 0 {
            return Err(BenchError::InvalidConfig(
                "iterations must be > 0".to_string(),
            ));
        }
        if !self.backend.is_parallel() {
            return Err(BenchError::InvalidConfig(format!(
                "backend '{}' is not a parallel strategy",
                self.backend
            )));
        }
        for (name, value) in [
            ("amplitude", self.amplitude),
            ("signal noise", self.signal_noise),
            ("matrix noise", self.matrix_noise),
        ] {
            if !T::from_real(value).is_finite() {
                return Err(BenchError::InvalidConfig(format!(
                    "{} must be finite in {}, got {}",
                    name,
                    T::PRECISION,
                    value
                )));
            }
        }
        Ok(())
    }

    /// Noise family for the `T` variant.
    pub fn noise_kind<T: Scalar>(&self) -> NoiseKind {
        self.noise.unwrap_or(T::DEFAULT_NOISE)
    }

    pub fn backend_options(&self) -> BackendOptions {
        BackendOptions {
            threads: self.threads,
            partition: self.partition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_cli_defaults() {
        let parsed = BenchConfig::try_parse_from(["mb-bench"]).unwrap();
        assert_eq!(parsed, BenchConfig::default());
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_parse_flags() {
        let config = BenchConfig::try_parse_from([
            "mb-bench",
            "-n",
            "64",
            "--precision",
            "f32",
            "--noise",
            "gaussian",
            "--partition",
            "cell",
            "--threads",
            "2",
            "--iterations",
            "3",
            "--seed",
            "7",
            "--matrix-noise",
            "-2.5",
        ])
        .unwrap();
        assert_eq!(config.size, 64);
        assert_eq!(config.precision, Precision::F32);
        assert_eq!(config.noise, Some(NoiseKind::Gaussian));
        assert_eq!(config.partition, Partition::Cell);
        assert_eq!(config.iterations, 3);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.matrix_noise, -2.5);
        assert_eq!(
            config.backend_options(),
            BackendOptions {
                threads: 2,
                partition: Partition::Cell
            }
        );
    }

    #[test]
    fn test_unknown_values_rejected() {
        assert!(BenchConfig::try_parse_from(["mb-bench", "--precision", "f16"]).is_err());
        assert!(BenchConfig::try_parse_from(["mb-bench", "--backend", "cuda"]).is_err());
    }

    #[test]
    fn test_validate_rejects() {
        let bad = [
            BenchConfig {
                size: 0,
                ..BenchConfig::default()
            },
            BenchConfig {
                iterations: 0,
                ..BenchConfig::default()
            },
            BenchConfig {
                backend: BackendKind::Sequential,
                ..BenchConfig::default()
            },
            BenchConfig {
                signal_noise: f64::NAN,
                ..BenchConfig::default()
            },
            BenchConfig {
                amplitude: f64::INFINITY,
                ..BenchConfig::default()
            },
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(BenchError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_values_checked_in_target_precision() {
        let config = BenchConfig {
            amplitude: 1e39,
            precision: Precision::F32,
            ..BenchConfig::default()
        };
        assert!(matches!(config.validate(), Err(BenchError::InvalidConfig(_))));
        assert!(config.validate_for::<f64>().is_ok());

        let spread = BenchConfig {
            matrix_noise: -1e39,
            ..BenchConfig::default()
        };
        assert!(spread.validate().is_ok());
        assert!(spread.validate_for::<f32>().is_err());
    }

    #[test]
    fn test_noise_kind_defaults() {
        let config = BenchConfig::default();
        assert_eq!(config.noise_kind::<f32>(), NoiseKind::Uniform);
        assert_eq!(config.noise_kind::<f64>(), NoiseKind::Gaussian);
        let forced = BenchConfig {
            noise: Some(NoiseKind::Uniform),
            ..BenchConfig::default()
        };
        assert_eq!(forced.noise_kind::<f64>(), NoiseKind::Uniform);
    }
}
