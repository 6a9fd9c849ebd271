use mb_signal::{NoiseKind, NoiseSeeder, NoiseSource, Scalar};
use tracing::debug;

use crate::error::Result;
use crate::matrix::Matrix;
use crate::shape::MatrixShape;

/// Creates operand and result matrices.
///
/// Noise-filled matrices draw from a fresh noise source per matrix, handed
/// out by the factory's own [`NoiseSeeder`].
#[derive(Debug, Clone, Default)]
pub struct MatrixFactory {
    kind: Option<NoiseKind>,
    seeder: NoiseSeeder,
}

impl MatrixFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a noise family instead of the precision default.
    pub fn with_noise_kind(mut self, kind: NoiseKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_seeder(mut self, seeder: NoiseSeeder) -> Self {
        self.seeder = seeder;
        self
    }

    /// The noise family used for `T` matrices.
    pub fn noise_kind<T: Scalar>(&self) -> NoiseKind {
        self.kind.unwrap_or(T::DEFAULT_NOISE)
    }

    /// Zero-filled `rows × columns` matrix.
    ///
    /// # Errors
    /// Returns `InvalidDimensions` if either dimension is zero and
    /// `TooLarge` if the buffer cannot be addressed.
    pub fn allocate<T: Scalar>(&self, rows: usize, columns: usize) -> Result<Matrix<T>> {
        debug!(rows, columns, precision = %T::PRECISION, "allocating matrix");
        Matrix::zeros(rows, columns)
    }

    /// `n × n` identity matrix.
    pub fn identity<T: Scalar>(&self, n: usize) -> Result<Matrix<T>> {
        Matrix::identity(n)
    }

    /// Matrix whose entries are consecutive samples of `noise`.
    pub fn fill_with<T, N>(&self, rows: usize, columns: usize, noise: &mut N) -> Result<Matrix<T>>
    where
        T: Scalar,
        N: NoiseSource<T> + ?Sized,
    {
        let mut matrix = self.allocate(rows, columns)?;
        noise.fill(matrix.as_mut_slice());
        Ok(matrix)
    }

    /// Matrix of independent samples from a fresh noise source of `spread`.
    ///
    /// # Errors
    /// Returns `InvalidDimensions` or `TooLarge` for a bad shape (checked
    /// before any noise is drawn) and `Noise` for an unusable spread.
    pub fn fill_with_noise<T: Scalar>(
        &mut self,
        rows: usize,
        columns: usize,
        spread: T,
    ) -> Result<Matrix<T>> {
        MatrixShape::new(rows, columns)?;
        let kind = self.noise_kind::<T>();
        let mut noise = self.seeder.source(kind, spread)?;
        self.fill_with(rows, columns, &mut noise)
    }
}
