use mb_signal::{NoiseError, Precision};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("invalid matrix dimensions {rows}x{columns}: both must be > 0")]
    InvalidDimensions { rows: usize, columns: usize },
    #[error("matrix dimensions {rows}x{columns} exceed the addressable size")]
    TooLarge { rows: usize, columns: usize },
    #[error("data length mismatch: expected {expected}, got {got}")]
    DataLength { expected: usize, got: usize },
    #[error("buffer of length {len} is not a square matrix")]
    NotSquare { len: usize },
    #[error("operand dimension mismatch: {left} vs {right} elements")]
    DimensionMismatch { left: usize, right: usize },
    #[error("{backend} backend unavailable: {reason}")]
    CapabilityUnavailable { backend: String, reason: String },
    #[error("{backend} backend does not support {precision}")]
    UnsupportedPrecision {
        backend: String,
        precision: Precision,
    },
    #[error("noise error: {0}")]
    Noise(#[from] NoiseError),
    #[error("{0}")]
    Backend(String),
}

impl MatrixError {
    /// Shorthand for a `CapabilityUnavailable` error.
    pub fn unavailable(backend: &str, reason: impl Into<String>) -> Self {
        MatrixError::CapabilityUnavailable {
            backend: backend.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns true for precondition violations on the caller's inputs.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            MatrixError::InvalidDimensions { .. }
                | MatrixError::TooLarge { .. }
                | MatrixError::DataLength { .. }
                | MatrixError::NotSquare { .. }
                | MatrixError::DimensionMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MatrixError>;
