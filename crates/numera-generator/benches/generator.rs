//! Benchmarks for puzzle generation.
//!
//! # Benchmarks
//!
//! - **`generate_solution`**: Builds the solved grid of a seed with the shuffled
//!   backtracker.
//! - **`generator_singles`**: Generates a full puzzle whose solve needs only the singles.
//! - **`generator_easy`**: Generates a full puzzle with every strategy up to
//!   [`Difficulty::Easy`].
//!
//! # Test Data
//!
//! Three fixed seeds keep the runs reproducible while covering different puzzles.
//!
//! # Running
//!
//! ```sh
//! cargo bench --bench generator
//! ```

use std::{hint, str::FromStr as _, time::Duration};

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use numera_generator::{PuzzleGenerator, PuzzleSeed, generate_solution};
use numera_solver::{Difficulty, StrategyRegistry, StrategySolver};

const SEEDS: [&str; 3] = [
    "c1d44bd6afaf8af64f126546884e19298acbdc33c3924a28136715de946ef3f1",
    "a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b1c2d3e4f5a6b7c8d9e0f1a2b3",
    "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef",
];

fn seeds() -> impl Iterator<Item = (String, PuzzleSeed)> {
    SEEDS
        .into_iter()
        .enumerate()
        .filter_map(|(i, seed)| Some((format!("seed_{i}"), PuzzleSeed::from_str(seed).ok()?)))
}

fn solver_up_to(difficulty: Difficulty) -> StrategySolver {
    let registry = StrategyRegistry::standard();
    let strategies = registry
        .strategies()
        .iter()
        .filter(|s| s.is_enabled() && s.difficulty() <= difficulty)
        .cloned()
        .collect();
    StrategySolver::new(strategies)
}

fn bench_generate_solution(c: &mut Criterion) {
    for (param, seed) in seeds() {
        c.bench_with_input(
            BenchmarkId::new("generate_solution", param),
            &seed,
            |b, seed| {
                b.iter_batched(
                    || hint::black_box(*seed),
                    generate_solution,
                    BatchSize::SmallInput,
                );
            },
        );
    }
}

fn bench_generator(c: &mut Criterion, name: &str, difficulty: Difficulty) {
    let solver = solver_up_to(difficulty);
    let generator = PuzzleGenerator::new(&solver);

    for (param, seed) in seeds() {
        c.bench_with_input(BenchmarkId::new(name, param), &seed, |b, seed| {
            b.iter_batched(
                || hint::black_box(*seed),
                |seed| generator.generate_with_seed(seed),
                BatchSize::SmallInput,
            );
        });
    }
}

fn bench_generator_singles(c: &mut Criterion) {
    bench_generator(c, "generator_singles", Difficulty::Basic);
}

fn bench_generator_easy(c: &mut Criterion) {
    bench_generator(c, "generator_easy", Difficulty::Easy);
}

criterion_group!(
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(12));
    targets =
        bench_generate_solution,
        bench_generator_singles,
        bench_generator_easy
);
criterion_main!(benches);
