use std::f64::consts::PI;

use crate::error::Result;
use crate::noise::{NoiseKind, NoiseSeeder, NoiseSource};
use crate::scalar::Scalar;

/// Number of full sine cycles across a synthesized buffer.
pub const DEFAULT_CYCLES: usize = 10;

/// Builds sampled sine waves with additive noise.
///
/// The base waveform is deterministic: sample `i` of a buffer of `length`
/// samples is `sin((i / length) * cycles * 2π) * amplitude`. Noise comes from
/// a fresh [`RandomNoise`](crate::noise::RandomNoise) per call, taken from the
/// synthesizer's own [`NoiseSeeder`].
#[derive(Debug, Clone)]
pub struct SignalSynthesizer {
    kind: Option<NoiseKind>,
    seeder: NoiseSeeder,
    cycles: usize,
}

impl SignalSynthesizer {
    /// Entropy-seeded synthesizer using each precision's default noise family.
    pub fn new() -> Self {
        Self {
            kind: None,
            seeder: NoiseSeeder::default(),
            cycles: DEFAULT_CYCLES,
        }
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

    pub fn with_cycles(mut self, cycles: usize) -> Self {
        self.cycles = cycles;
        self
    }

    pub fn cycles(&self) -> usize {
        self.cycles
    }

    /// The noise family used for `T` samples.
    pub fn noise_kind<T: Scalar>(&self) -> NoiseKind {
        self.kind.unwrap_or(T::DEFAULT_NOISE)
    }

    /// The noise-free waveform. Empty when `length == 0`.
    pub fn base_signal<T: Scalar>(&self, length: usize, amplitude: T) -> Vec<T> {
        let len = T::from_index(length);
        let cycles = T::from_index(self.cycles);
        let two = T::from_real(2.0);
        let pi = T::from_real(PI);

        (0..length)
            .map(|i| {
                let phase = T::from_index(i) / len * cycles * two * pi;
                phase.sin() * amplitude
            })
            .collect()
    }

    /// Base waveform plus one sample of `noise` per element.
    pub fn synthesize_with<T, N>(&self, length: usize, amplitude: T, noise: &mut N) -> Vec<T>
    where
        T: Scalar,
        N: NoiseSource<T> + ?Sized,
    {
        let mut trace = self.base_signal(length, amplitude);
        for value in trace.iter_mut() {
            *value += noise.sample();
        }
        trace
    }

    /// Synthesize a noisy trace of `length` samples.
    ///
    /// # Errors
    /// Returns `NoiseError::InvalidSpread` if `noise_spread` is not finite or
    /// too large for the noise family.
    pub fn synthesize<T: Scalar>(
        &mut self,
        length: usize,
        amplitude: T,
        noise_spread: T,
    ) -> Result<Vec<T>> {
        let kind = self.noise_kind::<T>();
        let mut noise = self.seeder.source(kind, noise_spread)?;
        Ok(self.synthesize_with(length, amplitude, &mut noise))
    }
}

impl Default for SignalSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}
