//! Test utilities for strategy implementations.
//!
//! This module provides [`StrategyTester`], a harness that applies one strategy at a time
//! to a grid and checks what changed.
//!
//! # Example
//!
//! ```
//! use numera_core::{Digit, Position};
//! use numera_solver::{StrategyRegistry, testing::StrategyTester};
//!
//! let registry = StrategyRegistry::standard();
//! StrategyTester::from_str(
//!     "
//!     12345678.
//!     .........
//!     .........
//!     .........
//!     .........
//!     .........
//!     .........
//!     .........
//!     .........
//! ",
//! )
//! .apply_once(registry.get("naked single").unwrap())
//! .assert_placed(Position::new(8, 0), Digit::D9)
//! .assert_sound();
//! ```

use std::str::FromStr as _;

use numera_core::{CandidateGrid, Digit, DigitGrid, DigitSet, GridState, Position};

use crate::{
    Backtracker, ChangeReport, InstanceHandling, Strategy, graph::GraphCache,
    solver::apply_strategy,
};

/// How many completions [`StrategyTester::assert_sound`] checks at most.
pub const COMPLETION_CAP: usize = 64;

/// A test harness for verifying strategy implementations.
///
/// `StrategyTester` keeps the initial and the current grid, applies strategies to the
/// current one and collects the reports they produce.
///
/// # Method Chaining
///
/// All methods take and return `self`, so tests read as one chain.
///
/// # Panics
///
/// All assertion methods panic with detailed messages on failure, using
/// `#[track_caller]` to report the correct source location.
#[derive(Debug)]
pub struct StrategyTester {
    initial: CandidateGrid,
    current: CandidateGrid,
    graphs: GraphCache,
    reports: Vec<ChangeReport>,
    handling: Option<InstanceHandling>,
    assume_unique: bool,
}

impl StrategyTester {
    /// Creates a new tester from an initial grid.
    pub fn new<T>(initial: T) -> Self
    where
        T: Into<CandidateGrid>,
    {
        let initial = initial.into();
        let current = initial.clone();
        Self {
            initial,
            current,
            graphs: GraphCache::new(),
            reports: Vec::new(),
            handling: None,
            assume_unique: true,
        }
    }

    /// Creates a new tester from a grid of givens.
    ///
    /// The string format matches [`DigitGrid::from_str`]: digits 1-9 are givens, `.`,
    /// `_` or `0` are empty cells and whitespace is ignored.
    ///
    /// # Panics
    ///
    /// Panics if the string cannot be parsed.
    #[track_caller]
    pub fn from_str(s: &str) -> Self {
        let grid = DigitGrid::from_str(s).unwrap();
        Self::new(&grid)
    }

    /// Creates a new tester from a full candidate state, as written by
    /// [`GridState`]'s `Display`.
    ///
    /// # Panics
    ///
    /// Panics if the string cannot be parsed.
    #[track_caller]
    pub fn from_state_str(s: &str) -> Self {
        let state = GridState::from_str(s).unwrap();
        Self::new(&state)
    }

    /// Overrides the instance handling of every strategy applied afterwards.
    #[must_use]
    pub fn with_handling(mut self, handling: InstanceHandling) -> Self {
        self.handling = Some(handling);
        self
    }

    /// Sets whether uniqueness-based strategies may run. On by default.
    #[must_use]
    pub fn assuming_unique(mut self, assume_unique: bool) -> Self {
        self.assume_unique = assume_unique;
        self
    }

    fn apply(&mut self, strategy: &Strategy) -> bool {
        let reports = match self.handling {
            Some(handling) => {
                let mut strategy = strategy.clone();
                strategy.set_handling(handling);
                apply_strategy(&strategy, &mut self.current, &mut self.graphs, self.assume_unique)
            }
            None => {
                apply_strategy(strategy, &mut self.current, &mut self.graphs, self.assume_unique)
            }
        };
        let changed = !reports.is_empty();
        self.reports.extend(reports);
        changed
    }

    /// Applies the strategy once.
    #[track_caller]
    pub fn apply_once(mut self, strategy: &Strategy) -> Self {
        self.apply(strategy);
        self
    }

    /// Applies the strategy until it makes no more progress.
    #[track_caller]
    pub fn apply_until_stuck(mut self, strategy: &Strategy) -> Self {
        while self.apply(strategy) {}
        self
    }

    /// Applies the strategy a specific number of times.
    #[track_caller]
    pub fn apply_times(mut self, strategy: &Strategy, times: usize) -> Self {
        for _ in 0..times {
            self.apply(strategy);
        }
        self
    }

    /// Returns the reports collected so far, oldest first.
    #[must_use]
    pub fn reports(&self) -> &[ChangeReport] {
        &self.reports
    }

    /// Returns the current grid.
    #[must_use]
    pub fn grid(&self) -> &CandidateGrid {
        &self.current
    }

    /// Asserts that a cell was unsolved initially and is now solved with `digit`.
    ///
    /// # Panics
    ///
    /// Panics if the cell was not placed as expected.
    #[track_caller]
    pub fn assert_placed(self, pos: Position, digit: Digit) -> Self {
        assert!(
            !self.initial.is_solved_at(pos),
            "Expected initial cell at {pos} to be unsolved, but it holds {:?}",
            self.initial.solved_at(pos)
        );
        assert_eq!(
            self.current.solved_at(pos),
            Some(digit),
            "Expected {pos} to be solved with {digit}, but candidates are {:?}",
            self.current.candidates_at(pos)
        );
        self
    }

    /// Asserts that every one of `digits` was open in the cell initially and is gone now.
    ///
    /// Other candidates may also have been removed.
    ///
    /// # Panics
    ///
    /// Panics if any of the digits is still open or was never open.
    #[track_caller]
    pub fn assert_removed_includes<C>(self, pos: Position, digits: C) -> Self
    where
        C: IntoIterator<Item = Digit>,
    {
        let digits = DigitSet::from_iter(digits);
        let initial = self.initial.candidates_at(pos);
        let current = self.current.candidates_at(pos);
        assert_eq!(
            initial & digits,
            digits,
            "Expected initial candidates at {pos} to include {digits:?}, but they are {initial:?}"
        );
        assert!(
            (current & digits).is_empty(),
            "Expected all of {digits:?} to be removed from {pos}, but {current:?} still has {:?}",
            current & digits
        );
        if let Some(solved) = self.current.solved_at(pos) {
            assert!(
                !digits.contains(solved),
                "Expected {solved} to be removed from {pos}, but it was placed"
            );
        }
        self
    }

    /// Asserts that exactly `digits` were removed from an unsolved cell.
    ///
    /// # Panics
    ///
    /// Panics if the removed candidates differ from `digits`.
    #[track_caller]
    pub fn assert_removed_exact<C>(self, pos: Position, digits: C) -> Self
    where
        C: IntoIterator<Item = Digit>,
    {
        let digits = DigitSet::from_iter(digits);
        let initial = self.initial.candidates_at(pos);
        let current = self.current.candidates_at(pos);
        assert!(
            !self.current.is_solved_at(pos),
            "Expected {pos} to stay unsolved, but it holds {:?}",
            self.current.solved_at(pos)
        );
        let removed = initial.difference(current);
        assert_eq!(
            removed, digits,
            "Expected exactly {digits:?} to be removed from {pos}, but removed {removed:?} (initial: {initial:?}, current: {current:?})"
        );
        self
    }

    /// Asserts that a cell is exactly as it was initially.
    ///
    /// # Panics
    ///
    /// Panics if the cell changed.
    #[track_caller]
    pub fn assert_no_change(self, pos: Position) -> Self {
        let initial = (self.initial.solved_at(pos), self.initial.candidates_at(pos));
        let current = (self.current.solved_at(pos), self.current.candidates_at(pos));
        assert_eq!(
            initial, current,
            "Expected no change at {pos}, but it changed from {initial:?} to {current:?}"
        );
        self
    }

    /// Asserts that no strategy applied so far produced a report.
    ///
    /// # Panics
    ///
    /// Panics if any report was collected.
    #[track_caller]
    pub fn assert_no_progress(self) -> Self {
        assert!(
            self.reports.is_empty(),
            "Expected no progress, but got {} reports, first: {}",
            self.reports.len(),
            self.reports[0]
        );
        assert_eq!(self.initial, self.current, "Expected the grid to be unchanged");
        self
    }

    /// Asserts that the latest report lists exactly `expected` as its changes, in the
    /// format of [`ChangeReport::changes_summary`].
    ///
    /// # Panics
    ///
    /// Panics if there is no report or the summary differs.
    #[track_caller]
    pub fn assert_summary(self, expected: &str) -> Self {
        let Some(report) = self.reports.last() else {
            panic!("Expected a report with changes {expected}, but there is none");
        };
        assert_eq!(report.changes_summary(), expected, "in report {report}");
        self
    }

    /// Asserts that nothing true was lost.
    ///
    /// Every completion of the initial grid must still fit the current one: each cell is
    /// solved with, or still allows, the digit the completion puts there. Grids with more
    /// than [`COMPLETION_CAP`] completions are checked against the first ones found.
    ///
    /// # Panics
    ///
    /// Panics if the initial grid has no solution, or if a strategy removed a candidate
    /// that some completion uses.
    #[track_caller]
    pub fn assert_sound(self) -> Self {
        let completions = Backtracker::with_giver(&self.initial)
            .solutions(&self.initial.to_digit_grid(), COMPLETION_CAP);
        assert!(!completions.is_empty(), "Expected the initial grid to have a solution");
        let what = if completions.len() == 1 {
            "the solution"
        } else {
            "a completion"
        };
        for completion in &completions {
            for (pos, digit) in completion.filled() {
                let kept = self.current.solved_at(pos) == Some(digit)
                    || self.current.candidates_at(pos).contains(digit);
                assert!(kept, "{digit} at {pos} belongs to {what} but was removed");
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Difficulty, StrategyKind, StrategyRegistry};

    #[test]
    fn test_tracks_reports() {
        let registry = StrategyRegistry::standard();
        let tester = StrategyTester::from_str(&format!("12345678.{}", ".".repeat(72)))
            .apply_once(registry.get("naked single").unwrap())
            .assert_summary("+ 919");
        assert_eq!(tester.reports().len(), 1);
        assert_eq!(tester.reports()[0].strategy, "Naked Single");
    }

    #[test]
    #[should_panic(expected = "Expected no progress")]
    fn test_no_progress_fails_on_progress() {
        let registry = StrategyRegistry::standard();
        StrategyTester::from_str(&format!("12345678.{}", ".".repeat(72)))
            .apply_once(registry.get("naked single").unwrap())
            .assert_no_progress();
    }

    #[test]
    #[should_panic(expected = "belongs to the solution")]
    fn test_sound_catches_lost_solution() {
        // removes the true digit outright
        let mut grid = CandidateGrid::from(
            &DigitGrid::from_str(
                "..3.2.6..9..3.5..1..18.64....81.29..7.......8..67.82....26.95..8..2.3..9..5.1.3..",
            )
            .unwrap(),
        );
        let initial = StrategyTester::new(grid.clone());
        grid.eliminate(Position::new(0, 0), Digit::D4);
        StrategyTester { current: grid, ..initial }.assert_sound();
    }

    #[test]
    #[should_panic(expected = "belongs to a completion")]
    fn test_sound_catches_lost_completion() {
        // 26 completions; drop a digit only some of them use
        let digits = DigitGrid::from_str(
            ".9.2.......1..693..3.71..8.35........48..2.6...7......56....4......4.2..2...3.6.7",
        )
        .unwrap();
        let completions = Backtracker::new().solutions(&digits, 2);
        let (pos, digit) = completions[0]
            .filled()
            .find(|&(pos, digit)| completions[1].get(pos) != Some(digit))
            .unwrap();
        let mut grid = CandidateGrid::from(&digits);
        let initial = StrategyTester::new(grid.clone());
        assert!(grid.eliminate(pos, digit));
        StrategyTester { current: grid, ..initial }.assert_sound();
    }

    #[test]
    fn test_sound_accepts_ambiguous_progress() {
        let registry = StrategyRegistry::standard();
        StrategyTester::from_str(
            ".9.2.......1..693..3.71..8.35........48..2.6...7......56....4......4.2..2...3.6.7",
        )
        .with_handling(InstanceHandling::UnorderedAll)
        .apply_until_stuck(registry.get("hidden single").unwrap())
        .apply_until_stuck(registry.get("naked single").unwrap())
        .assert_sound();
    }

    #[test]
    fn test_handling_override() {
        // naked singles at r1c9 and r5c7
        let puzzle = format!(
            "12345678.{}234567.91{}",
            ".".repeat(27),
            ".".repeat(36)
        );
        let strategy = Strategy::new("Naked Single", Difficulty::Basic, StrategyKind::NakedSingle);
        let tester = StrategyTester::from_str(&puzzle).apply_once(&strategy);
        assert_eq!(tester.reports().len(), 1);

        let tester = StrategyTester::from_str(&puzzle)
            .with_handling(InstanceHandling::UnorderedAll)
            .apply_once(&strategy)
            .assert_placed(Position::new(8, 0), Digit::D9)
            .assert_placed(Position::new(6, 4), Digit::D8);
        assert_eq!(tester.reports().len(), 2);
    }
}
