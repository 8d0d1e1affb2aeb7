use criterion::BenchmarkId;
use criterion::Throughput;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion, SamplingMode};
use dense_linear_assignment::{AssignmentSolver, HungarianSolver};
use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::Beta;

type UInt = u32;

fn gen_square_input(
    solver: &mut HungarianSolver<UInt>,
    seed: u64,
    size: UInt,
    min_value: f64,
    max_value: f64,
) {
    let mut val_rng = ChaCha8Rng::seed_from_u64(seed);
    let between = Uniform::from(min_value..max_value);

    solver.init(size, size).unwrap();
    (0..size)
        .flat_map(|i| (0..size).map(move |j| (i, j)))
        .for_each(|(i, j)| {
            solver.set_value(i, j, between.sample(&mut val_rng)).unwrap();
        });
}

fn gen_rectangular_input(
    solver: &mut HungarianSolver<UInt>,
    seed: u64,
    num_rows: UInt,
    num_cols: UInt,
    min_value: f64,
    range_width: f64,
) {
    let mut val_rng = ChaCha8Rng::seed_from_u64(seed);
    let beta = Beta::new(3.0, 3.0).unwrap();

    solver.init(num_rows, num_cols).unwrap();
    (0..num_rows)
        .flat_map(|i| (0..num_cols).map(move |j| (i, j)))
        .for_each(|(i, j)| {
            let value = (range_width * beta.sample(&mut val_rng) + min_value).floor();
            solver.set_value(i, j, value).unwrap();
        });
}

fn bench_square_size(c: &mut Criterion, max_size: UInt) {
    let mut group = c.benchmark_group("square_dense");
    let (mut solver, solution) = HungarianSolver::<UInt>::new(max_size as usize, max_size as usize);
    group.sample_size(10);
    group.sampling_mode(SamplingMode::Flat);

    for size in (32..=max_size).step_by(32) {
        gen_square_input(&mut solver, size as u64, size, 500.0, 1000.0);
        group.throughput(Throughput::Elements((size as u64).pow(2)));
        let benchmark_id = BenchmarkId::new("hungarian", format!("size {}", size));
        let input = (solver.clone(), solution.clone());

        group.bench_with_input(benchmark_id, &input, |b, input| {
            b.iter_batched(
                || input.clone(),
                |(mut solver, mut solution)| {
                    solver.solve(&mut solution).unwrap();
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_rectangular_num_of_rows(c: &mut Criterion, max_num_rows: UInt, num_cols: UInt) {
    let mut group = c.benchmark_group("rectangular_dense");
    let (mut solver, solution) =
        HungarianSolver::<UInt>::new(max_num_rows as usize, num_cols as usize);
    group.sample_size(10);
    group.sampling_mode(SamplingMode::Flat);

    for num_rows in (32..=max_num_rows).step_by(32) {
        gen_rectangular_input(&mut solver, num_rows as u64, num_rows, num_cols, 300.0, 700.0);
        group.throughput(Throughput::Elements(num_rows as u64 * num_cols as u64));
        let benchmark_id = BenchmarkId::new(
            "hungarian",
            format!("num_rows {} num_cols {}", num_rows, num_cols),
        );
        let input = (solver.clone(), solution.clone());

        group.bench_with_input(benchmark_id, &input, |b, input| {
            b.iter_batched(
                || input.clone(),
                |(mut solver, mut solution)| {
                    solver.solve(&mut solution).unwrap();
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn dense_assignment(c: &mut Criterion) {
    bench_square_size(c, 128);
    bench_rectangular_num_of_rows(c, 96, 128);
}

criterion_group!(benches, dense_assignment);
criterion_main!(benches);
