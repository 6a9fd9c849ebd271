//! `mb-signal` - Noise sources and signal synthesis for matbench.
//!
//! This crate provides:
//! - The `Scalar` trait the numeric core is generic over (`f32`, `f64`)
//! - A `NoiseSource` trait and the `StdRng`-backed `RandomNoise` sampler
//! - `NoiseSeeder` for handing out independent, optionally seeded sources
//! - `SignalSynthesizer`, a sampled sine wave with additive noise

pub mod error;
pub mod noise;
pub mod scalar;
pub mod signal;

pub use error::{NoiseError, Result};
pub use noise::{NoiseKind, NoiseSeeder, NoiseSource, RandomNoise};
pub use scalar::{Precision, Scalar};
pub use signal::SignalSynthesizer;
