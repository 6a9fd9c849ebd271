// Square matmul kernels shared by the CPU backends.
//
// All kernels take flat row-major `n × n` operands and accumulate each
// output cell over `k` in ascending order starting from zero, so every
// backend built on them produces bit-identical results.

use mb_signal::Scalar;

use crate::error::{MatrixError, Result};
use crate::shape::MatrixShape;

/// Validates two flat operands and returns their shared dimension `n`.
///
/// The operands must have equal length and that length must be a perfect
/// square `n * n` with `n > 0`.
pub fn square_dimension<T>(a: &[T], b: &[T]) -> Result<usize> {
    if a.len() != b.len() {
        return Err(MatrixError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(MatrixShape::from_square_len(a.len())?.rows())
}

/// Validates two operand shapes: both square and of equal dimension.
pub fn shape_dimension(a: MatrixShape, b: MatrixShape) -> Result<usize> {
    if !a.is_square() {
        return Err(MatrixError::NotSquare { len: a.numel() });
    }
    if !b.is_square() {
        return Err(MatrixError::NotSquare { len: b.numel() });
    }
    if a != b {
        return Err(MatrixError::DimensionMismatch {
            left: a.numel(),
            right: b.numel(),
        });
    }
    Ok(a.rows())
}

/// One output cell: `sum_k a[row, k] * b[k, col]`.
#[inline]
pub fn dot_cell<T: Scalar>(a: &[T], b: &[T], n: usize, row: usize, col: usize) -> T {
    let a_row = &a[row * n..(row + 1) * n];
    let mut sum = T::zero();
    for (k, &a_rk) in a_row.iter().enumerate() {
        sum += a_rk * b[k * n + col];
    }
    sum
}

/// One output row written into `out` (length `n`).
#[inline]
pub fn multiply_row<T: Scalar>(a: &[T], b: &[T], n: usize, row: usize, out: &mut [T]) {
    for (col, cell) in out.iter_mut().enumerate() {
        *cell = dot_cell(a, b, n, row, col);
    }
}

/// Classic triple loop over rows, columns and the inner dimension.
pub fn sequential<T: Scalar>(a: &[T], b: &[T], n: usize) -> Vec<T> {
    let mut product = vec![T::zero(); n * n];
    for row in 0..n {
        for col in 0..n {
            for inner in 0..n {
                product[row * n + col] += a[row * n + inner] * b[inner * n + col];
            }
        }
    }
    product
}
