use mb_signal::Scalar;

use crate::backend::MatMulBackend;
use crate::error::{MatrixError, Result};
use crate::shape::MatrixShape;

/// A dense matrix stored as one contiguous row-major buffer.
///
/// Invariant: `data.len() == shape.numel()` with both dimensions non-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T: Scalar> {
    data: Vec<T>,
    shape: MatrixShape,
}

impl<T: Scalar> Matrix<T> {
    /// Wrap row-major `data` as a `rows × columns` matrix.
    ///
    /// # Errors
    /// Returns `InvalidDimensions` for a zero dimension and `DataLength` if
    /// `data` does not hold exactly `rows * columns` elements.
    pub fn from_vec(rows: usize, columns: usize, data: Vec<T>) -> Result<Self> {
        let shape = MatrixShape::new(rows, columns)?;
        Self::with_shape(shape, data)
    }

    /// Wrap a flat buffer as an `n × n` matrix, inferring `n` from its length.
    pub fn square(data: Vec<T>) -> Result<Self> {
        let shape = MatrixShape::from_square_len(data.len())?;
        Self::with_shape(shape, data)
    }

    pub fn with_shape(shape: MatrixShape, data: Vec<T>) -> Result<Self> {
        if data.len() != shape.numel() {
            return Err(MatrixError::DataLength {
                expected: shape.numel(),
                got: data.len(),
            });
        }
        Ok(Matrix { data, shape })
    }

    /// Zero-filled `rows × columns` matrix.
    ///
    /// # Errors
    /// Returns `InvalidDimensions` for a zero dimension and `TooLarge` when
    /// the buffer would exceed `isize::MAX` bytes.
    pub fn zeros(rows: usize, columns: usize) -> Result<Self> {
        let shape = MatrixShape::new(rows, columns)?;
        let bytes = shape.numel().checked_mul(T::PRECISION.size_in_bytes());
        if bytes.map_or(true, |b| b > isize::MAX as usize) {
            return Err(MatrixError::TooLarge { rows, columns });
        }
        Ok(Matrix {
            data: vec![T::zero(); shape.numel()],
            shape,
        })
    }

    /// `n × n` identity matrix.
    pub fn identity(n: usize) -> Result<Self> {
        let mut m = Self::zeros(n, n)?;
        for i in 0..n {
            m.data[i * n + i] = T::one();
        }
        Ok(m)
    }

    pub fn shape(&self) -> MatrixShape {
        self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.rows()
    }

    pub fn columns(&self) -> usize {
        self.shape.columns()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false: a matrix has at least one element.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_square(&self) -> bool {
        self.shape.is_square()
    }

    /// Element at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row >= self.rows() || col >= self.columns() {
            return None;
        }
        Some(self.data[self.shape.index(row, col)])
    }

    /// One row as a slice, or `None` when out of bounds.
    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row >= self.rows() {
            return None;
        }
        let start = row * self.columns();
        Some(&self.data[start..start + self.columns()])
    }

    /// Row-major element slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Largest absolute element-wise difference to `other`.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the shapes differ.
    pub fn max_abs_diff(&self, other: &Matrix<T>) -> Result<T> {
        if self.shape != other.shape {
            return Err(MatrixError::DimensionMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        Ok(self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| (*a - *b).abs())
            .fold(T::zero(), T::max))
    }

    /// Matrix product `self × other` computed by `backend`.
    pub fn matmul(&self, other: &Matrix<T>, backend: &dyn MatMulBackend<T>) -> Result<Matrix<T>> {
        backend.multiply(self, other)
    }
}
