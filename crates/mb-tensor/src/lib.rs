//! `mb-tensor` - Square matrices with pluggable multiplication backends for matbench.
//!
//! This crate provides:
//! - A row-major `Matrix<T>` generic over `mb_signal::Scalar`
//! - `MatrixFactory` for zero-filled and noise-filled matrices
//! - A `MatMulBackend` trait for pluggable matrix multiplication
//! - A reference `SequentialBackend`, a rayon `ThreadPoolBackend` and,
//!   behind the `metal` feature on macOS, a `MetalBackend`

pub mod backend;
pub mod cpu;
pub mod error;
pub mod factory;
pub mod matrix;
#[cfg(all(feature = "metal", target_os = "macos"))]
pub mod metal;
pub mod parallel;
pub mod shape;

// Re-export primary types at the crate root for convenience.
pub use backend::{create_backend, BackendKind, BackendOptions, MatMulBackend};
pub use cpu::SequentialBackend;
pub use error::{MatrixError, Result};
pub use factory::MatrixFactory;
pub use matrix::Matrix;
#[cfg(all(feature = "metal", target_os = "macos"))]
pub use metal::MetalBackend;
pub use parallel::{Partition, ThreadPoolBackend};
pub use shape::MatrixShape;
