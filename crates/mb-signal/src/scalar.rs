use std::fmt::{self, Debug, Display};
use std::iter::Sum;
use std::ops::AddAssign;
use std::str::FromStr;

use num_traits::Float;
use rand::distributions::uniform::SampleUniform;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::noise::NoiseKind;

/// Floating point precision a benchmark variant runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    /// 32-bit floating point.
    F32,
    /// 64-bit floating point.
    F64,
}

impl Precision {
    /// Size in bytes of a single element.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            Precision::F32 => 4,
            Precision::F64 => 8,
        }
    }

    /// Lower-case name, as accepted by `FromStr`.
    pub fn name(&self) -> &'static str {
        match self {
            Precision::F32 => "f32",
            Precision::F64 => "f64",
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Precision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "f32" | "single" => Ok(Precision::F32),
            "f64" | "double" => Ok(Precision::F64),
            other => Err(format!("unknown precision '{}' (expected f32 or f64)", other)),
        }
    }
}

/// Real-number type the numeric core is generic over.
///
/// Implemented for `f32` and `f64` only. Each implementation fixes its
/// [`Precision`] tag and the noise family it uses when none is configured:
/// the single precision variant draws uniform noise, the double precision
/// variant Gaussian noise.
pub trait Scalar:
    Float + Default + Debug + Display + Sum + AddAssign + SampleUniform + Send + Sync + 'static
{
    const PRECISION: Precision;
    const DEFAULT_NOISE: NoiseKind;

    /// Converts an `f64` constant into this type (rounding for `f32`).
    fn from_real(v: f64) -> Self;

    /// Widens this value to `f64`. Lossless for both implementations.
    fn to_real(self) -> f64;

    /// Converts an index or count into this type.
    fn from_index(i: usize) -> Self;

    /// Draws one sample from the standard normal distribution N(0, 1).
    fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

macro_rules! impl_scalar {
    ($ty:ty, $precision:expr, $noise:expr) => {
        impl Scalar for $ty {
            const PRECISION: Precision = $precision;
            const DEFAULT_NOISE: NoiseKind = $noise;

            #[inline]
            fn from_real(v: f64) -> Self {
                v as $ty
            }

            #[inline]
            fn to_real(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_index(i: usize) -> Self {
                i as $ty
            }

            #[inline]
            fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> Self {
                rng.sample::<$ty, _>(StandardNormal)
            }
        }
    };
}

impl_scalar!(f32, Precision::F32, NoiseKind::Uniform);
impl_scalar!(f64, Precision::F64, NoiseKind::Gaussian);
