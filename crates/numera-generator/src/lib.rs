//! Seeded puzzle generation for the numera engine.
//!
//! A [`PuzzleSeed`] fully determines a puzzle: it seeds a PCG64 generator that first
//! shuffles the digit order of the backtracker to build a solved grid, then shuffles the
//! order in which clues are removed. A clue stays removed only while the puzzle keeps a
//! single solution and the strategy pipeline still solves it without guessing.
//!
//! # Examples
//!
//! ```
//! use numera_generator::{PuzzleGenerator, PuzzleSeed};
//! use numera_solver::{Backtracker, Difficulty, StrategyRegistry, StrategySolver};
//!
//! let registry = StrategyRegistry::standard();
//! let easy = registry
//!     .strategies()
//!     .iter()
//!     .filter(|s| s.difficulty() <= Difficulty::Easy)
//!     .cloned()
//!     .collect();
//! let solver = StrategySolver::new(easy);
//! let generator = PuzzleGenerator::new(&solver);
//! let puzzle = generator.generate_with_seed(PuzzleSeed::from_phrase("docs"));
//!
//! assert!(Backtracker::new().has_unique_solution(&puzzle.problem));
//! assert!(puzzle.solution.is_solved());
//! assert_eq!(puzzle, generator.generate_with_seed(puzzle.seed));
//! ```

use numera_core::{DigitGrid, Position};
use numera_solver::{Backtracker, Difficulty, StrategySolver};
use rand::seq::SliceRandom as _;

pub use self::{
    seed::{PuzzleSeed, SeedParseError},
    solution::{ShuffledDigits, generate_solution},
};

mod seed;
mod solution;

/// A generated puzzle with its solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPuzzle {
    /// The givens.
    pub problem: DigitGrid,
    /// The unique solution of `problem`.
    pub solution: DigitGrid,
    /// The seed that reproduces this puzzle.
    pub seed: PuzzleSeed,
    /// The hardest strategy the pipeline needed, or `None` when the givens were already
    /// the full solution.
    pub hardest: Option<Difficulty>,
}

/// Generates puzzles that a given strategy pipeline can solve.
#[derive(Debug, Clone)]
pub struct PuzzleGenerator<'a> {
    solver: &'a StrategySolver,
}

impl<'a> PuzzleGenerator<'a> {
    /// Creates a generator that only keeps puzzles `solver` can finish.
    #[must_use]
    pub fn new(solver: &'a StrategySolver) -> Self {
        Self { solver }
    }

    /// Generates a puzzle from a random seed.
    #[must_use]
    pub fn generate(&self) -> GeneratedPuzzle {
        self.generate_with_seed(PuzzleSeed::random())
    }

    /// Generates the puzzle `seed` stands for.
    ///
    /// The result depends only on the seed and the strategies of the solver.
    #[must_use]
    pub fn generate_with_seed(&self, seed: PuzzleSeed) -> GeneratedPuzzle {
        let mut rng = seed.rng();
        let solution = solution::solve_shuffled(&mut rng);

        let mut order = Position::ALL;
        order.shuffle(&mut rng);

        let backtracker = Backtracker::new();
        let mut problem = solution.clone();
        let mut hardest = None;
        for pos in order {
            let Some(digit) = problem.get(pos) else {
                continue;
            };
            problem.set(pos, None);
            if !backtracker.has_unique_solution(&problem) {
                problem.set(pos, Some(digit));
                continue;
            }
            match self.solve(&problem) {
                Some(difficulty) => hardest = difficulty,
                None => problem.set(pos, Some(digit)),
            }
        }
        log::debug!(
            "generated puzzle {seed} with {} clues, hardest {hardest:?}",
            problem.filled_count()
        );

        GeneratedPuzzle {
            problem,
            solution,
            seed,
            hardest,
        }
    }

    /// Returns the hardest difficulty used if the pipeline solves `problem`.
    fn solve(&self, problem: &DigitGrid) -> Option<Option<Difficulty>> {
        let mut solver = self.solver.clone();
        solver.detach_tracker();
        solver.set_grid(problem);
        let outcome = solver.solve();
        outcome.status.is_solved().then_some(outcome.hardest)
    }
}

#[cfg(test)]
mod tests {
    use numera_solver::{SolveStatus, StrategyRegistry};

    use super::*;

    fn singles_solver() -> StrategySolver {
        let registry = StrategyRegistry::standard();
        let singles = ["Naked Single", "Hidden Single"]
            .into_iter()
            .map(|name| registry.get(name).unwrap().clone())
            .collect();
        StrategySolver::new(singles)
    }

    #[test]
    fn test_generated_puzzle_is_unique_and_consistent() {
        let solver = singles_solver();
        let generator = PuzzleGenerator::new(&solver);
        let puzzle = generator.generate_with_seed(PuzzleSeed::from_phrase("unique"));

        assert!(puzzle.solution.is_solved());
        assert!(puzzle.problem.filled_count() < 81);
        for (pos, digit) in puzzle.problem.filled() {
            assert_eq!(puzzle.solution.get(pos), Some(digit));
        }
        let backtracker = Backtracker::new();
        assert_eq!(
            backtracker.solutions(&puzzle.problem, 2),
            vec![puzzle.solution.clone()]
        );
        assert_eq!(puzzle.hardest, Some(Difficulty::Basic));
    }

    #[test]
    fn test_generated_puzzle_is_solved_by_the_pipeline() {
        let solver = singles_solver();
        let puzzle = PuzzleGenerator::new(&solver).generate();

        let mut solver = solver.clone();
        solver.set_grid(&puzzle.problem);
        assert_eq!(solver.solve().status, SolveStatus::Solved);
        assert_eq!(solver.grid().to_digit_grid(), puzzle.solution);
    }

    #[test]
    fn test_seed_reproduces_puzzle() {
        let solver = singles_solver();
        let generator = PuzzleGenerator::new(&solver);
        let seed = PuzzleSeed::from_phrase("again");
        assert_eq!(
            generator.generate_with_seed(seed),
            generator.generate_with_seed(seed)
        );
        assert_eq!(generator.generate_with_seed(seed).solution, generate_solution(seed));
    }

    #[test]
    fn test_no_clue_can_be_removed() {
        let solver = singles_solver();
        let generator = PuzzleGenerator::new(&solver);
        let puzzle = generator.generate_with_seed(PuzzleSeed::from_phrase("minimal"));
        let backtracker = Backtracker::new();
        for (pos, _) in puzzle.problem.filled() {
            let mut fewer = puzzle.problem.clone();
            fewer.set(pos, None);
            let unique = backtracker.has_unique_solution(&fewer);
            assert!(!unique || generator.solve(&fewer).is_none(), "{pos}");
        }
    }
}
