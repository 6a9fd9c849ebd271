use mb_signal::NoiseError;
use mb_tensor::MatrixError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("matrix error: {0}")]
    Matrix(#[from] MatrixError),
    #[error("noise error: {0}")]
    Noise(#[from] NoiseError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, BenchError>;
