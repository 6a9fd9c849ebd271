use std::fmt;
use std::str::FromStr;

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{NoiseError, Result};
use crate::scalar::Scalar;

/// Distribution family a noise source draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoiseKind {
    /// Zero-mean normal distribution with the spread as standard deviation.
    Gaussian,
    /// Uniform distribution over `[0, spread]`.
    Uniform,
}

impl NoiseKind {
    /// The family used by the `T` variant when none is configured.
    pub fn default_for<T: Scalar>() -> Self {
        T::DEFAULT_NOISE
    }

    pub fn name(&self) -> &'static str {
        match self {
            NoiseKind::Gaussian => "gaussian",
            NoiseKind::Uniform => "uniform",
        }
    }
}

impl fmt::Display for NoiseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for NoiseKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gaussian" | "normal" => Ok(NoiseKind::Gaussian),
            "uniform" => Ok(NoiseKind::Uniform),
            other => Err(format!(
                "unknown noise kind '{}' (expected gaussian or uniform)",
                other
            )),
        }
    }
}

/// A stateful producer of noise samples.
///
/// Components that consume noise take `&mut impl NoiseSource<T>` so callers
/// decide which engine (and which seed) feeds them. Any `FnMut() -> T`
/// closure is a noise source.
pub trait NoiseSource<T> {
    /// Draws the next sample. Advances the source's internal state.
    fn sample(&mut self) -> T;

    /// Overwrites every element of `out` with a fresh sample.
    fn fill(&mut self, out: &mut [T]) {
        for slot in out.iter_mut() {
            *slot = self.sample();
        }
    }
}

impl<T, F> NoiseSource<T> for F
where
    F: FnMut() -> T,
{
    fn sample(&mut self) -> T {
        self()
    }
}

enum Spread<T: Scalar> {
    /// Zero spread: every sample is exactly zero.
    Constant,
    Gaussian { std_dev: T },
    Uniform(Uniform<T>),
}

/// Upper bound on |z| for a `StandardNormal` draw. The ziggurat tail never
/// exceeds ~14 for a 53-bit uniform.
const STANDARD_NORMAL_BOUND: f64 = 64.0;

/// Largest spread whose samples of `kind` are always finite in `T`.
fn max_spread<T: Scalar>(kind: NoiseKind) -> T {
    match kind {
        NoiseKind::Gaussian => T::max_value() / T::from_real(STANDARD_NORMAL_BOUND),
        // `Uniform::new_inclusive` scales the range by 1 / (1 - EPSILON).
        NoiseKind::Uniform => T::max_value() * (T::one() - T::epsilon()),
    }
}

/// Random noise generator owning its own `StdRng` engine.
///
/// Not meant to be shared across threads; give every consumer its own
/// instance, e.g. through a [`NoiseSeeder`].
pub struct RandomNoise<T: Scalar> {
    rng: StdRng,
    kind: NoiseKind,
    spread: T,
    dist: Spread<T>,
}

impl<T: Scalar> RandomNoise<T> {
    /// Create a noise source driving the given engine.
    ///
    /// A negative `spread` is treated as its absolute value. A zero spread is
    /// valid and yields a constant-zero source for either family.
    ///
    /// # Errors
    /// Returns `NoiseError::InvalidSpread` if `spread` is NaN or infinite, or
    /// so large that samples of `kind` could overflow `T`.
    pub fn from_rng(rng: StdRng, kind: NoiseKind, spread: T) -> Result<Self> {
        if !spread.is_finite() || spread.abs() > max_spread::<T>(kind) {
            return Err(NoiseError::InvalidSpread {
                spread: spread.to_real(),
            });
        }
        let spread = spread.abs();

        let dist = if spread == T::zero() {
            Spread::Constant
        } else {
            match kind {
                NoiseKind::Gaussian => Spread::Gaussian { std_dev: spread },
                NoiseKind::Uniform => Spread::Uniform(Uniform::new_inclusive(T::zero(), spread)),
            }
        };

        Ok(Self {
            rng,
            kind,
            spread,
            dist,
        })
    }

    /// Create a reproducible noise source from a fixed seed.
    pub fn with_seed(kind: NoiseKind, spread: T, seed: u64) -> Result<Self> {
        Self::from_rng(StdRng::seed_from_u64(seed), kind, spread)
    }

    /// Create a noise source seeded from operating system entropy.
    pub fn from_entropy(kind: NoiseKind, spread: T) -> Result<Self> {
        Self::from_rng(StdRng::from_entropy(), kind, spread)
    }

    pub fn kind(&self) -> NoiseKind {
        self.kind
    }

    /// The normalized (non-negative) spread.
    pub fn spread(&self) -> T {
        self.spread
    }
}

impl<T: Scalar> NoiseSource<T> for RandomNoise<T> {
    fn sample(&mut self) -> T {
        match &self.dist {
            Spread::Constant => T::zero(),
            Spread::Gaussian { std_dev } => T::standard_normal(&mut self.rng) * *std_dev,
            Spread::Uniform(uniform) => uniform.sample(&mut self.rng),
        }
    }
}

impl<T: Scalar> fmt::Debug for RandomNoise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomNoise")
            .field("kind", &self.kind)
            .field("spread", &self.spread)
            .finish_non_exhaustive()
    }
}

/// Hands out fresh, independent [`RandomNoise`] instances.
///
/// With a master seed every instance is seeded from a master `StdRng`, so a
/// run is reproducible while its instances still differ from one another.
/// Without one, every instance is seeded from OS entropy.
#[derive(Debug, Clone)]
pub struct NoiseSeeder {
    master: Option<StdRng>,
}

impl NoiseSeeder {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            master: seed.map(StdRng::seed_from_u64),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(None)
    }

    /// Returns true if instances are derived from a master seed.
    pub fn is_seeded(&self) -> bool {
        self.master.is_some()
    }

    /// A freshly seeded engine for one consumer.
    pub fn next_rng(&mut self) -> StdRng {
        match &mut self.master {
            Some(master) => StdRng::seed_from_u64(master.gen()),
            None => StdRng::from_entropy(),
        }
    }

    /// A child seeder for another component, derived from this one.
    pub fn fork(&mut self) -> NoiseSeeder {
        match &mut self.master {
            Some(master) => NoiseSeeder::seeded(master.gen()),
            None => NoiseSeeder::from_entropy(),
        }
    }

    /// A fresh noise source of the given family and spread.
    pub fn source<T: Scalar>(&mut self, kind: NoiseKind, spread: T) -> Result<RandomNoise<T>> {
        RandomNoise::from_rng(self.next_rng(), kind, spread)
    }
}

impl Default for NoiseSeeder {
    fn default() -> Self {
        Self::from_entropy()
    }
}
