//! Benchmarks for the exhaustive backtracking search.
//!
//! # Benchmarks
//!
//! - **`count_solutions`**: Counts solutions up to a cap of 2, as uniqueness checks do.
//!   Covers a puzzle with a unique solution, one with two solutions and the empty grid.
//! - **`first_solution_candidates`**: Finds one solution while trying only the open
//!   candidates of a propagated grid.
//!
//! # Running
//!
//! ```sh
//! cargo bench --bench backtrack
//! ```

use std::hint;

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use numera_core::{CandidateGrid, DigitGrid};
use numera_solver::Backtracker;

const UNIQUE: &str =
    "..3.2.6..9..3.5..1..18.64....81.29..7.......8..67.82....26.95..8..2.3..9..5.1.3..";
const TWO_SOLUTIONS: &str =
    ".9.2.......1..693..3.71..8.35........48..2.6...7......56....4......4.2..2...3.6.7";

fn parse(puzzle: &str) -> DigitGrid {
    puzzle.parse().unwrap_or_default()
}

fn bench_count_solutions(c: &mut Criterion) {
    let puzzles = [
        ("unique", parse(UNIQUE)),
        ("two_solutions", parse(TWO_SOLUTIONS)),
        ("empty", DigitGrid::new()),
    ];
    let backtracker = Backtracker::new();

    for (param, grid) in puzzles {
        c.bench_with_input(
            BenchmarkId::new("count_solutions", param),
            &grid,
            |b, grid| {
                b.iter_batched_ref(
                    || hint::black_box(grid.clone()),
                    |grid| hint::black_box(backtracker.count_solutions(grid, 2)),
                    BatchSize::SmallInput,
                );
            },
        );
    }
}

fn bench_first_solution_candidates(c: &mut Criterion) {
    let grid = parse(TWO_SOLUTIONS);
    let candidates = CandidateGrid::from(&grid);
    let backtracker = Backtracker::with_giver(candidates);

    c.bench_with_input(
        BenchmarkId::new("first_solution_candidates", "two_solutions"),
        &grid,
        |b, grid| {
            b.iter_batched_ref(
                || hint::black_box(grid.clone()),
                |grid| hint::black_box(backtracker.first_solution(grid)),
                BatchSize::SmallInput,
            );
        },
    );
}

criterion_group!(
    benches,
    bench_count_solutions,
    bench_first_solution_candidates,
);
criterion_main!(benches);
