use approx::assert_relative_eq;
use mb_signal::{NoiseKind, NoiseSeeder, Scalar};
use mb_tensor::{
    create_backend, BackendKind, BackendOptions, MatMulBackend, Matrix, MatrixError,
    MatrixFactory, Partition, SequentialBackend, ThreadPoolBackend,
};

fn parallel_backends() -> Vec<ThreadPoolBackend> {
    vec![
        ThreadPoolBackend::new(4, Partition::Row).unwrap(),
        ThreadPoolBackend::new(4, Partition::Cell).unwrap(),
        ThreadPoolBackend::new(0, Partition::Row).unwrap(),
    ]
}

fn all_backends<T: Scalar>() -> Vec<Box<dyn MatMulBackend<T>>> {
    let mut backends: Vec<Box<dyn MatMulBackend<T>>> = vec![Box::new(SequentialBackend::new())];
    for b in parallel_backends() {
        backends.push(Box::new(b));
    }
    backends
}

fn noisy_pair<T: Scalar>(n: usize, seed: u64) -> (Matrix<T>, Matrix<T>) {
    let mut factory = MatrixFactory::new()
        .with_noise_kind(NoiseKind::Gaussian)
        .with_seeder(NoiseSeeder::seeded(seed));
    let a = factory.fill_with_noise(n, n, T::one()).unwrap();
    let b = factory.fill_with_noise(n, n, T::one()).unwrap();
    (a, b)
}

#[test]
fn sequential_and_parallel_agree() {
    let sequential = SequentialBackend::new();
    for n in [1, 2, 7, 33, 64] {
        let (a, b) = noisy_pair::<f64>(n, n as u64);
        let expected = sequential.multiply(&a, &b).unwrap();
        for backend in parallel_backends() {
            let got = backend.multiply(&a, &b).unwrap();
            assert_eq!(got.shape(), expected.shape());
            for (x, y) in got.as_slice().iter().zip(expected.as_slice()) {
                assert_relative_eq!(*x, *y, epsilon = 1e-12, max_relative = 1e-12);
            }
        }
    }
}

#[test]
fn sequential_and_parallel_agree_f32() {
    let sequential = SequentialBackend::new();
    let (a, b) = noisy_pair::<f32>(48, 99);
    let expected = sequential.multiply(&a, &b).unwrap();
    for backend in parallel_backends() {
        let got = backend.multiply(&a, &b).unwrap();
        assert!(got.max_abs_diff(&expected).unwrap() <= 1e-4);
    }
}

#[test]
fn identity_is_neutral() {
    let (a, _) = noisy_pair::<f64>(9, 1);
    let identity = Matrix::<f64>::identity(9).unwrap();
    for backend in all_backends::<f64>() {
        assert_eq!(backend.multiply(&a, &identity).unwrap(), a, "{}", backend.name());
        assert_eq!(backend.multiply(&identity, &a).unwrap(), a, "{}", backend.name());
    }
}

#[test]
fn zero_annihilates() {
    let (a, _) = noisy_pair::<f32>(6, 2);
    let zero = MatrixFactory::new().allocate::<f32>(6, 6).unwrap();
    for backend in all_backends::<f32>() {
        assert_eq!(backend.multiply(&a, &zero).unwrap(), zero, "{}", backend.name());
    }
}

#[test]
fn known_two_by_two_product() {
    let a = Matrix::from_vec(2, 2, vec![1.0f64, 2.0, 3.0, 4.0]).unwrap();
    let b = Matrix::from_vec(2, 2, vec![5.0f64, 6.0, 7.0, 8.0]).unwrap();
    for backend in all_backends::<f64>() {
        let c = backend.multiply(&a, &b).unwrap();
        assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0], "{}", backend.name());
    }
}

#[test]
fn mismatched_operands_fail() {
    for backend in all_backends::<f64>() {
        let err = backend.matmul(&[1.0; 4], &[1.0; 9]).unwrap_err();
        assert!(
            matches!(err, MatrixError::DimensionMismatch { left: 4, right: 9 }),
            "{}: {}",
            backend.name(),
            err
        );

        let a = Matrix::<f64>::identity(2).unwrap();
        let b = Matrix::<f64>::identity(3).unwrap();
        assert!(backend.multiply(&a, &b).unwrap_err().is_precondition());
    }
}

#[test]
fn operands_are_untouched() {
    let (a, b) = noisy_pair::<f64>(16, 5);
    let (a_copy, b_copy) = (a.clone(), b.clone());
    for backend in all_backends::<f64>() {
        backend.multiply(&a, &b).unwrap();
        assert_eq!(a, a_copy);
        assert_eq!(b, b_copy);
    }
}

#[test]
fn configured_backends_compute_the_same_product() {
    let (a, b) = noisy_pair::<f64>(12, 6);
    let opts = BackendOptions {
        threads: 2,
        partition: Partition::Cell,
    };
    let seq = create_backend::<f64>(BackendKind::Sequential, &opts).unwrap();
    let par = create_backend::<f64>(BackendKind::ThreadPool, &opts).unwrap();
    let expected = seq.multiply(&a, &b).unwrap();
    let got = a.matmul(&b, par.as_ref()).unwrap();
    assert!(got.max_abs_diff(&expected).unwrap() < 1e-12);
}
