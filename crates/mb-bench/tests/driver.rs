use mb_bench::report::{OPERANDS_STEP, PARALLEL_STEP, SEQUENTIAL_STEP, SIGNAL_STEP};
use mb_bench::{run, BenchConfig, BenchError};
use mb_signal::{NoiseKind, Precision};
use mb_tensor::{BackendKind, MatrixError, Partition};

fn small_config(precision: Precision) -> BenchConfig {
    BenchConfig {
        size: 8,
        precision,
        threads: 2,
        iterations: 2,
        seed: Some(42),
        ..BenchConfig::default()
    }
}

#[test]
fn runs_all_steps_in_double_precision() {
    let report = run(&small_config(Precision::F64)).unwrap();
    let labels: Vec<&str> = report.steps().iter().map(|s| s.label()).collect();
    assert_eq!(labels, [SIGNAL_STEP, OPERANDS_STEP, SEQUENTIAL_STEP, PARALLEL_STEP]);
    assert_eq!(report.precision, Precision::F64);
    assert_eq!(report.noise, NoiseKind::Gaussian);
    assert_eq!(report.backend, "thread-pool");
    assert_eq!(report.size, 8);
    assert_eq!(report.step(SIGNAL_STEP).unwrap().samples().len(), 1);
    assert_eq!(report.step(SEQUENTIAL_STEP).unwrap().samples().len(), 2);
    assert_eq!(report.step(PARALLEL_STEP).unwrap().samples().len(), 2);
}

#[test]
fn runs_all_steps_in_single_precision() {
    let config = BenchConfig {
        partition: Partition::Cell,
        ..small_config(Precision::F32)
    };
    let report = run(&config).unwrap();
    assert_eq!(report.steps().len(), 4);
    assert_eq!(report.precision, Precision::F32);
    assert_eq!(report.noise, NoiseKind::Uniform);
    assert!(report.to_string().starts_with("matbench: 8x8 f32 matrices"));
}

#[test]
fn zero_spreads_are_valid() {
    let config = BenchConfig {
        signal_noise: 0.0,
        matrix_noise: 0.0,
        signal_length: 0,
        ..small_config(Precision::F64)
    };
    assert!(run(&config).is_ok());
}

#[test]
fn zero_size_is_rejected() {
    let config = BenchConfig {
        size: 0,
        ..BenchConfig::default()
    };
    assert!(matches!(run(&config), Err(BenchError::InvalidConfig(_))));
}

#[cfg(not(all(feature = "metal", target_os = "macos")))]
#[test]
fn missing_accelerator_is_reported_not_replaced() {
    let config = BenchConfig {
        backend: BackendKind::Metal,
        precision: Precision::F32,
        ..BenchConfig::default()
    };
    let err = run(&config).unwrap_err();
    assert!(matches!(
        err,
        BenchError::Matrix(MatrixError::CapabilityUnavailable { .. })
    ));
}
