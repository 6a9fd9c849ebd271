use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NoiseError {
    #[error("noise spread must be finite and in range, got {spread}")]
    InvalidSpread { spread: f64 },
}

pub type Result<T> = std::result::Result<T, NoiseError>;
