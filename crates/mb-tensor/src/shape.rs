use crate::error::{MatrixError, Result};
use std::fmt;

/// Dimensions of a row-major matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatrixShape {
    rows: usize,
    columns: usize,
}

impl MatrixShape {
    /// Create a shape of `rows × columns`.
    ///
    /// # Errors
    /// Returns `InvalidDimensions` if either dimension is zero, or
    /// `TooLarge` if `rows * columns` does not fit in a `usize`.
    pub fn new(rows: usize, columns: usize) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(MatrixError::InvalidDimensions { rows, columns });
        }
        if rows.checked_mul(columns).is_none() {
            return Err(MatrixError::TooLarge { rows, columns });
        }
        Ok(MatrixShape { rows, columns })
    }

    /// Create an `n × n` shape.
    pub fn square(n: usize) -> Result<Self> {
        Self::new(n, n)
    }

    /// Infer an `n × n` shape from a flat buffer length.
    ///
    /// # Errors
    /// Returns `NotSquare` if `len` is zero or not a perfect square.
    pub fn from_square_len(len: usize) -> Result<Self> {
        let n = isqrt(len);
        if n == 0 || n * n != len {
            return Err(MatrixError::NotSquare { len });
        }
        Ok(MatrixShape { rows: n, columns: n })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of elements. Never overflows, `new` checks the product.
    pub fn numel(&self) -> usize {
        self.rows * self.columns
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.columns
    }

    /// Row-major flat index of `(row, col)`.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.columns + col
    }
}

/// Integer square root, rounding down.
fn isqrt(len: usize) -> usize {
    let mut n = (len as f64).sqrt() as usize;
    // Correct for float rounding on large inputs.
    while n.checked_mul(n).map_or(true, |sq| sq > len) {
        n -= 1;
    }
    while (n + 1).checked_mul(n + 1).is_some_and(|sq| sq <= len) {
        n += 1;
    }
    n
}

impl fmt::Display for MatrixShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}x{}]", self.rows, self.columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_shape() {
        let s = MatrixShape::new(2, 3).unwrap();
        assert_eq!(s.rows(), 2);
        assert_eq!(s.columns(), 3);
        assert_eq!(s.numel(), 6);
        assert!(!s.is_square());
        assert_eq!(s.to_string(), "[2x3]");
    }

    #[test]
    fn test_index() {
        let s = MatrixShape::new(3, 4).unwrap();
        assert_eq!(s.index(0, 3), 3);
        assert_eq!(s.index(2, 1), 9);
    }

    #[test]
    fn test_overflowing_shape_rejected() {
        let half = 1usize << (usize::BITS / 2);
        assert!(matches!(
            MatrixShape::new(half, half),
            Err(MatrixError::TooLarge { .. })
        ));
        assert!(MatrixShape::new(usize::MAX, 2).is_err());
        assert!(MatrixShape::square(half).unwrap_err().is_precondition());
        assert_eq!(MatrixShape::new(usize::MAX, 1).unwrap().numel(), usize::MAX);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(
            MatrixShape::new(0, 3),
            Err(MatrixError::InvalidDimensions { rows: 0, columns: 3 })
        ));
        assert!(MatrixShape::new(3, 0).is_err());
        assert!(MatrixShape::square(0).is_err());
    }

    #[test]
    fn test_from_square_len() {
        assert_eq!(MatrixShape::from_square_len(9).unwrap(), MatrixShape::square(3).unwrap());
        assert_eq!(MatrixShape::from_square_len(1).unwrap().rows(), 1);
        assert!(matches!(
            MatrixShape::from_square_len(8),
            Err(MatrixError::NotSquare { len: 8 })
        ));
        assert!(MatrixShape::from_square_len(0).is_err());
    }

    #[test]
    fn test_isqrt_large() {
        let n = 1usize << 26;
        assert_eq!(isqrt(n * n), n);
        assert_eq!(isqrt(n * n - 1), n - 1);
        let max_root = (1usize << (usize::BITS / 2)) - 1;
        assert_eq!(isqrt(usize::MAX), max_root);
        assert!(MatrixShape::from_square_len(usize::MAX).is_err());
    }
}
