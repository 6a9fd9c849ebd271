use std::hint::black_box;
use std::time::{Duration, Instant};

use mb_signal::{NoiseSeeder, Precision, Scalar, SignalSynthesizer};
use mb_tensor::{create_backend, MatMulBackend, Matrix, MatrixFactory, SequentialBackend};
use tracing::{debug, info, instrument};

use crate::config::BenchConfig;
use crate::error::Result;
use crate::report::{
    BenchReport, StepTiming, OPERANDS_STEP, PARALLEL_STEP, SEQUENTIAL_STEP, SIGNAL_STEP,
};

fn timed<R>(f: impl FnOnce() -> R) -> (R, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}

/// Run the benchmark in the configured precision.
pub fn run(config: &BenchConfig) -> Result<BenchReport> {
    match config.precision {
        Precision::F32 => run_with::<f32>(config),
        Precision::F64 => run_with::<f64>(config),
    }
}

/// Run every benchmark step with `T` as the element type.
///
/// The parallel backend is created before any timing starts, so a missing
/// accelerator fails the run up front instead of being replaced.
#[instrument(
    skip_all,
    fields(precision = %T::PRECISION, size = config.size, backend = %config.backend)
)]
pub fn run_with<T: Scalar>(config: &BenchConfig) -> Result<BenchReport> {
    config.validate_for::<T>()?;

    let parallel = create_backend::<T>(config.backend, &config.backend_options())?;
    let sequential = SequentialBackend::new();

    let kind = config.noise_kind::<T>();
    let mut seeder = NoiseSeeder::new(config.seed);
    let mut synth = SignalSynthesizer::new()
        .with_noise_kind(kind)
        .with_seeder(seeder.fork());
    let mut factory = MatrixFactory::new()
        .with_noise_kind(kind)
        .with_seeder(seeder.fork());

    let mut report = BenchReport::new(T::PRECISION, kind, parallel.name(), config.size);

    let mut signal_step = StepTiming::new(SIGNAL_STEP);
    let (signal, elapsed) = timed(|| {
        synth.synthesize(
            config.signal_length,
            T::from_real(config.amplitude),
            T::from_real(config.signal_noise),
        )
    });
    let signal = signal?;
    black_box(&signal);
    signal_step.record(elapsed);
    finish_step(&mut report, signal_step);

    let mut operands_step = StepTiming::new(OPERANDS_STEP);
    let spread = T::from_real(config.matrix_noise);
    let (operands, elapsed) = timed(|| -> Result<(Matrix<T>, Matrix<T>)> {
        let a = factory.fill_with_noise(config.size, config.size, spread)?;
        let b = factory.fill_with_noise(config.size, config.size, spread)?;
        Ok((a, b))
    });
    let (a, b) = operands?;
    operands_step.record(elapsed);
    finish_step(&mut report, operands_step);

    finish_step(
        &mut report,
        time_multiply(SEQUENTIAL_STEP, &sequential, &a, &b, config.iterations)?,
    );
    finish_step(
        &mut report,
        time_multiply(PARALLEL_STEP, parallel.as_ref(), &a, &b, config.iterations)?,
    );

    Ok(report)
}

/// Time `iterations` products of `a` and `b` on `backend`.
pub fn time_multiply<T: Scalar>(
    label: &str,
    backend: &dyn MatMulBackend<T>,
    a: &Matrix<T>,
    b: &Matrix<T>,
    iterations: usize,
) -> Result<StepTiming> {
    let mut step = StepTiming::new(label);
    for iteration in 0..iterations {
        let (product, elapsed) = timed(|| backend.multiply(a, b));
        black_box(product?);
        debug!(label, iteration, elapsed_us = elapsed.as_micros() as u64, "multiply done");
        step.record(elapsed);
    }
    Ok(step)
}

fn finish_step(report: &mut BenchReport, step: StepTiming) {
    info!(
        step = step.label(),
        mean_ms = step.mean().as_secs_f64() * 1e3,
        samples = step.samples().len(),
        "step finished"
    );
    report.push(step);
}
