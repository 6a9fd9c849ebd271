use std::fmt;
use std::str::FromStr;

use mb_signal::Scalar;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::backend::MatMulBackend;
use crate::cpu::matmul;
use crate::error::{MatrixError, Result};

/// How the output matrix is split into parallel work items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Partition {
    /// One work item per output row.
    #[default]
    Row,
    /// One work item per output cell.
    Cell,
}

impl Partition {
    pub fn name(&self) -> &'static str {
        match self {
            Partition::Row => "row",
            Partition::Cell => "cell",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Partition {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "row" | "rows" => Ok(Partition::Row),
            "cell" | "cells" => Ok(Partition::Cell),
            other => Err(format!("unknown partition '{}' (expected row or cell)", other)),
        }
    }
}

/// Fork-join backend running on a dedicated rayon thread pool.
///
/// The output buffer is split into disjoint mutable chunks (rows or single
/// cells) handed to independent work items; operands are shared read-only.
/// `matmul` returns only after the pool has joined every item.
#[derive(Debug)]
pub struct ThreadPoolBackend {
    pool: ThreadPool,
    partition: Partition,
}

impl ThreadPoolBackend {
    /// Build a pool of `threads` workers (0 = rayon default).
    ///
    /// # Errors
    /// Returns `CapabilityUnavailable` if the pool cannot be created.
    pub fn new(threads: usize, partition: Partition) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("mb-matmul-{}", i))
            .build()
            .map_err(|e| MatrixError::unavailable("thread-pool", e.to_string()))?;
        debug!(
            threads = pool.current_num_threads(),
            %partition,
            "thread pool backend ready"
        );
        Ok(ThreadPoolBackend { pool, partition })
    }

    /// Number of worker threads in the pool.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn partition(&self) -> Partition {
        self.partition
    }
}

impl<T: Scalar> MatMulBackend<T> for ThreadPoolBackend {
    fn name(&self) -> &str {
        "thread-pool"
    }

    fn matmul(&self, a: &[T], b: &[T]) -> Result<Vec<T>> {
        let n = matmul::square_dimension(a, b)?;
        debug!(n, partition = %self.partition, precision = %T::PRECISION, "parallel matmul");

        let mut product = vec![T::zero(); n * n];
        self.pool.install(|| match self.partition {
            Partition::Row => product
                .par_chunks_mut(n)
                .enumerate()
                .for_each(|(row, out)| matmul::multiply_row(a, b, n, row, out)),
            Partition::Cell => product
                .par_iter_mut()
                .enumerate()
                .for_each(|(idx, cell)| *cell = matmul::dot_cell(a, b, n, idx / n, idx % n)),
        });
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matmul_basic_both_partitions() {
        for partition in [Partition::Row, Partition::Cell] {
            let backend = ThreadPoolBackend::new(2, partition).unwrap();
            let c = backend
                .matmul(&[1.0f64, 2.0, 3.0, 4.0], &[5.0, 6.0, 7.0, 8.0])
                .unwrap();
            assert_eq!(c, vec![19.0, 22.0, 43.0, 50.0], "{}", partition);
        }
    }

    #[test]
    fn test_single_element() {
        let backend = ThreadPoolBackend::new(1, Partition::Cell).unwrap();
        assert_eq!(backend.matmul(&[3.0f32], &[-2.0f32]).unwrap(), vec![-6.0]);
    }

    #[test]
    fn test_pool_size() {
        let backend = ThreadPoolBackend::new(3, Partition::Row).unwrap();
        assert_eq!(backend.threads(), 3);
        assert_eq!(backend.partition(), Partition::Row);
    }

    #[test]
    fn test_mismatch_rejected() {
        let backend = ThreadPoolBackend::new(2, Partition::Row).unwrap();
        let err = backend.matmul(&[1.0f32; 4], &[1.0f32; 9]).unwrap_err();
        assert!(matches!(err, MatrixError::DimensionMismatch { left: 4, right: 9 }));
    }

    #[test]
    fn test_partition_parse() {
        assert_eq!("row".parse::<Partition>().unwrap(), Partition::Row);
        assert_eq!("Cells".parse::<Partition>().unwrap(), Partition::Cell);
        assert!("tile".parse::<Partition>().is_err());
        assert_eq!(Partition::default(), Partition::Row);
    }
}
