pub mod matmul;

use mb_signal::Scalar;
use tracing::debug;

use crate::backend::MatMulBackend;
use crate::error::Result;

/// Single-threaded reference backend.
///
/// Runs the classic triple loop on the calling thread. This is the baseline
/// the parallel backends are timed against.
#[derive(Debug, Clone)]
pub struct SequentialBackend;

impl SequentialBackend {
    pub fn new() -> Self {
        SequentialBackend
    }
}

impl Default for SequentialBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> MatMulBackend<T> for SequentialBackend {
    fn name(&self) -> &str {
        "sequential"
    }

    fn matmul(&self, a: &[T], b: &[T]) -> Result<Vec<T>> {
        let n = matmul::square_dimension(a, b)?;
        debug!(n, precision = %T::PRECISION, "sequential matmul");
        Ok(matmul::sequential(a, b, n))
    }
}
