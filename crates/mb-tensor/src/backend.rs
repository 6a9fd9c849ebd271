use std::fmt::{self, Debug};
use std::str::FromStr;

use mb_signal::{Precision, Scalar};
use tracing::debug;

use crate::cpu::matmul::shape_dimension;
use crate::cpu::SequentialBackend;
use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;
use crate::parallel::{Partition, ThreadPoolBackend};
use crate::shape::MatrixShape;

/// Trait for pluggable matrix multiplication backends (sequential, thread
/// pool, Metal).
///
/// Operands are flat row-major square buffers of equal length; the shared
/// dimension `n` is inferred as `sqrt(len)`. Every call is synchronous: the
/// returned buffer is complete and no work is left running.
pub trait MatMulBackend<T: Scalar>: Send + Sync + Debug {
    /// Returns the name of this backend (e.g., "sequential", "metal").
    fn name(&self) -> &str;

    /// Matrix multiplication: C = A @ B.
    ///
    /// - `a`, `b`: row-major data of shape [n, n]
    /// - Returns: row-major data of shape [n, n]
    ///
    /// # Errors
    /// `DimensionMismatch` if the lengths differ, `NotSquare` if the length
    /// is not a perfect square, or a backend failure.
    fn matmul(&self, a: &[T], b: &[T]) -> Result<Vec<T>>;

    /// Shape-checked product of two square matrices of equal dimension.
    fn multiply(&self, a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>> {
        let n = shape_dimension(a.shape(), b.shape())?;
        let data = self.matmul(a.as_slice(), b.as_slice())?;
        Matrix::with_shape(MatrixShape::square(n)?, data)
    }
}

/// Backend selection, made once at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Single-threaded triple loop.
    Sequential,
    /// Fork-join over a rayon thread pool.
    ThreadPool,
    /// Metal GPU compute (macOS, `metal` feature).
    Metal,
}

impl BackendKind {
    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::Sequential => "sequential",
            BackendKind::ThreadPool => "thread-pool",
            BackendKind::Metal => "metal",
        }
    }

    /// True for the data-parallel strategies.
    pub fn is_parallel(&self) -> bool {
        !matches!(self, BackendKind::Sequential)
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" | "cpu" => Ok(BackendKind::Sequential),
            "thread-pool" | "threadpool" | "rayon" => Ok(BackendKind::ThreadPool),
            "metal" | "gpu" => Ok(BackendKind::Metal),
            other => Err(format!(
                "unknown backend '{}' (expected sequential, thread-pool or metal)",
                other
            )),
        }
    }
}

/// Tuning knobs for backend construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendOptions {
    /// Thread pool size; 0 lets rayon choose.
    pub threads: usize,
    /// Thread pool work item granularity.
    pub partition: Partition,
}

/// Create the backend for `kind`.
///
/// A backend that cannot be brought up is reported as
/// `CapabilityUnavailable` (or `UnsupportedPrecision`); no other backend is
/// substituted.
pub fn create_backend<T: Scalar>(
    kind: BackendKind,
    options: &BackendOptions,
) -> Result<Box<dyn MatMulBackend<T>>> {
    debug!(backend = %kind, precision = %T::PRECISION, ?options, "creating backend");
    match kind {
        BackendKind::Sequential => Ok(Box::new(SequentialBackend::new())),
        BackendKind::ThreadPool => Ok(Box::new(ThreadPoolBackend::new(
            options.threads,
            options.partition,
        )?)),
        BackendKind::Metal => create_metal::<T>(),
    }
}

#[cfg(all(feature = "metal", target_os = "macos"))]
fn create_metal<T: Scalar>() -> Result<Box<dyn MatMulBackend<T>>> {
    require_precision::<T>(BackendKind::Metal.name(), crate::metal::SUPPORTED)?;
    Ok(Box::new(crate::metal::MetalBackend::new()?))
}

#[cfg(not(all(feature = "metal", target_os = "macos")))]
fn create_metal<T: Scalar>() -> Result<Box<dyn MatMulBackend<T>>> {
    let reason = if cfg!(feature = "metal") {
        "Metal is only available on macOS"
    } else {
        "built without the `metal` feature"
    };
    debug!(precision = %T::PRECISION, reason, "metal backend unavailable");
    Err(MatrixError::unavailable(BackendKind::Metal.name(), reason))
}

/// Rejects precisions a backend cannot run.
pub fn require_precision<T: Scalar>(backend: &str, supported: &[Precision]) -> Result<()> {
    if supported.contains(&T::PRECISION) {
        Ok(())
    } else {
        Err(MatrixError::UnsupportedPrecision {
            backend: backend.to_string(),
            precision: T::PRECISION,
        })
    }
}
