use std::{cmp::Reverse, time::Instant};

use numera_core::{CandidateGrid, DigitGrid, GridState};

use crate::{
    Change, ChangeReport, Difficulty, InstanceHandling, SolverError, StatisticsTracker, Strategy,
    StrategyRegistry, graph::GraphCache, strategy::StrategyContext,
};

/// How a call to [`StrategySolver::solve`] or [`StrategySolver::step`] ended.
#[derive(Debug, Clone, PartialEq, derive_more::IsVariant)]
pub enum SolveStatus {
    /// Every cell is solved without contradiction.
    Solved,
    /// A full pass over the enabled strategies changed nothing.
    Stuck,
    /// A single step made progress and stopped there.
    Stopped,
    /// The grid contradicts itself; the puzzle has no solution from here.
    Contradiction(SolverError),
}

/// The result of a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    /// How the solve ended.
    pub status: SolveStatus,
    /// Commits made during this call.
    pub steps_taken: usize,
    /// The hardest strategy among those commits.
    pub hardest: Option<Difficulty>,
}

/// Runs an ordered list of strategies over a candidate grid.
///
/// Strategies are tried in order. As soon as one commits anything, the scan restarts from
/// the first strategy, so a puzzle is rated by the hardest strategy it really needed.
///
/// # Examples
///
/// ```
/// use numera_core::DigitGrid;
/// use numera_solver::{SolveStatus, StrategySolver};
///
/// let puzzle: DigitGrid =
///     "..3.2.6..9..3.5..1..18.64....81.29..7.......8..67.82....26.95..8..2.3..9..5.1.3.."
///         .parse()?;
/// let mut solver = StrategySolver::standard();
/// solver.set_grid(&puzzle);
///
/// let outcome = solver.solve();
/// assert_eq!(outcome.status, SolveStatus::Solved);
/// assert!(solver.grid().is_solved());
/// assert_eq!(outcome.steps_taken, solver.steps().len());
/// # Ok::<(), numera_core::NotationError>(())
/// ```
///
/// # Step-by-step solving
///
/// ```
/// use numera_core::DigitGrid;
/// use numera_solver::StrategySolver;
///
/// let puzzle: DigitGrid =
///     "..3.2.6..9..3.5..1..18.64....81.29..7.......8..67.82....26.95..8..2.3..9..5.1.3.."
///         .parse()?;
/// let mut solver = StrategySolver::standard();
/// solver.set_grid(&puzzle);
///
/// let hint = solver.next_hint()?.unwrap();
/// let outcome = solver.step();
/// assert!(outcome.status.is_stopped());
/// assert_eq!(solver.steps()[0], hint);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct StrategySolver {
    strategies: Vec<Strategy>,
    grid: CandidateGrid,
    graphs: GraphCache,
    steps: Vec<ChangeReport>,
    tracker: Option<StatisticsTracker>,
    assume_unique: bool,
}

impl Default for StrategySolver {
    fn default() -> Self {
        Self::standard()
    }
}

impl StrategySolver {
    /// Creates a solver running `strategies` in the given order, on an empty grid.
    #[must_use]
    pub fn new(strategies: Vec<Strategy>) -> Self {
        Self {
            strategies,
            grid: CandidateGrid::new(),
            graphs: GraphCache::new(),
            steps: Vec::new(),
            tracker: None,
            assume_unique: true,
        }
    }

    /// Creates a solver with the standard catalog of [`StrategyRegistry::standard`].
    #[must_use]
    pub fn standard() -> Self {
        Self::new(StrategyRegistry::standard().strategies().to_vec())
    }

    /// Returns the strategies in pipeline order.
    #[must_use]
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Returns the strategies for reconfiguration.
    pub fn strategies_mut(&mut self) -> &mut [Strategy] {
        &mut self.strategies
    }

    /// Starts over from a grid of givens.
    pub fn set_grid(&mut self, digits: &DigitGrid) {
        self.reset_to(CandidateGrid::from(digits));
    }

    /// Starts over from a full candidate state.
    pub fn set_state(&mut self, state: &GridState) {
        self.reset_to(CandidateGrid::from(state));
    }

    fn reset_to(&mut self, grid: CandidateGrid) {
        self.grid = grid;
        self.graphs.invalidate();
        self.steps.clear();
    }

    /// Returns the current grid.
    #[must_use]
    pub fn grid(&self) -> &CandidateGrid {
        &self.grid
    }

    /// Sets whether the puzzle may be assumed to have one solution.
    ///
    /// Unique Rectangle and BUG only run under this assumption. On by default.
    pub fn set_assume_unique(&mut self, assume_unique: bool) {
        self.assume_unique = assume_unique;
    }

    /// Returns every report since the grid was set, oldest first.
    #[must_use]
    pub fn steps(&self) -> &[ChangeReport] {
        &self.steps
    }

    /// Returns the hardest difficulty among all reports since the grid was set.
    #[must_use]
    pub fn hardest_difficulty(&self) -> Option<Difficulty> {
        self.steps.iter().map(|r| r.difficulty).max()
    }

    /// Starts collecting statistics into `tracker`, replacing any attached one.
    pub fn attach_tracker(&mut self, tracker: StatisticsTracker) {
        self.tracker = Some(tracker);
    }

    /// Stops collecting statistics and hands the tracker back.
    pub fn detach_tracker(&mut self) -> Option<StatisticsTracker> {
        self.tracker.take()
    }

    /// Returns the attached tracker.
    #[must_use]
    pub fn tracker(&self) -> Option<&StatisticsTracker> {
        self.tracker.as_ref()
    }

    /// Applies strategies until the grid is solved or nothing more can be done.
    pub fn solve(&mut self) -> SolveOutcome {
        let outcome = self.run(false);
        log::info!(
            "solve ended {:?} after {} steps, hardest {:?}",
            outcome.status,
            outcome.steps_taken,
            outcome.hardest
        );
        outcome
    }

    /// Applies strategies until the first one makes progress.
    ///
    /// The status is [`SolveStatus::Stopped`] after progress, unless that progress solved
    /// the grid or exposed a contradiction.
    pub fn step(&mut self) -> SolveOutcome {
        self.run(true)
    }

    /// Returns the report the next [`step`](Self::step) would produce first, without
    /// changing anything.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Inconsistent`] if the grid contradicts itself.
    pub fn next_hint(&self) -> Result<Option<ChangeReport>, SolverError> {
        self.grid.check_consistency()?;
        let mut grid = self.grid.clone();
        let mut graphs = self.graphs.clone();
        for strategy in self.strategies.iter().filter(|s| s.is_enabled()) {
            let reports = apply_strategy(strategy, &mut grid, &mut graphs, self.assume_unique);
            if let Some(first) = reports.into_iter().next() {
                return Ok(Some(first));
            }
        }
        Ok(None)
    }

    /// Lists every deduction available on the current grid, without changing anything.
    ///
    /// Each enabled strategy runs with [`InstanceHandling::UnorderedAll`] against the
    /// unchanged grid, so every report is relative to the same state and any one of them
    /// can be passed to [`apply_report`](Self::apply_report).
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Inconsistent`] if the grid contradicts itself.
    pub fn all_next_steps(&self) -> Result<Vec<ChangeReport>, SolverError> {
        self.grid.check_consistency()?;
        let before = self.grid.snapshot();
        let mut graphs = self.graphs.clone();
        let mut reports = Vec::new();
        for strategy in self.strategies.iter().filter(|s| s.is_enabled()) {
            let mut ctx = StrategyContext::new(
                &self.grid,
                &mut graphs,
                InstanceHandling::UnorderedAll,
                self.assume_unique,
            );
            if strategy.search(&mut ctx).is_break() {
                log::trace!("{} stopped early", strategy.name());
            }
            for commit in ctx.into_commits() {
                let mut scratch = self.grid.clone();
                let changes = commit.apply(&mut scratch);
                if !changes.is_empty() {
                    reports.push(commit.builder.build_report(strategy, changes, before.clone()));
                }
            }
        }
        Ok(reports)
    }

    /// Applies a report, typically one picked from [`all_next_steps`](Self::all_next_steps),
    /// and records it as a step.
    ///
    /// Changes that no longer apply are skipped. Returns `false` and records nothing if
    /// none of them changed the grid.
    pub fn apply_report(&mut self, report: &ChangeReport) -> bool {
        let before = self.grid.snapshot();
        let changes: Vec<Change> = report
            .changes
            .iter()
            .copied()
            .filter(|change| change.apply(&mut self.grid))
            .collect();
        if changes.is_empty() {
            return false;
        }
        #[cfg(debug_assertions)]
        self.grid.verify_agreement();
        self.graphs.invalidate();
        let report = ChangeReport {
            changes,
            before,
            ..report.clone()
        };
        log::debug!("{report}");
        self.steps.push(report);
        true
    }

    fn run(&mut self, stop_at_first: bool) -> SolveOutcome {
        let start = self.steps.len();
        let status = loop {
            if let Err(err) = self.grid.check_consistency() {
                break SolveStatus::Contradiction(err.into());
            }
            if self.grid.is_complete() {
                break SolveStatus::Solved;
            }
            if !self.pass() {
                break SolveStatus::Stuck;
            }
            if stop_at_first {
                break match self.grid.check_consistency() {
                    Err(err) => SolveStatus::Contradiction(err.into()),
                    Ok(()) if self.grid.is_complete() => SolveStatus::Solved,
                    Ok(()) => SolveStatus::Stopped,
                };
            }
        };
        if let Some(tracker) = &mut self.tracker {
            tracker.record_outcome(&status);
        }
        let taken = &self.steps[start..];
        SolveOutcome {
            status,
            steps_taken: taken.len(),
            hardest: taken.iter().map(|r| r.difficulty).max(),
        }
    }

    /// Runs the enabled strategies in order up to the first that changes the grid.
    fn pass(&mut self) -> bool {
        for strategy in self.strategies.iter().filter(|s| s.is_enabled()) {
            log::trace!("trying {}", strategy.name());
            let started = Instant::now();
            let reports =
                apply_strategy(strategy, &mut self.grid, &mut self.graphs, self.assume_unique);
            if let Some(tracker) = &mut self.tracker {
                tracker.record_attempt(strategy, started.elapsed(), &reports);
            }
            if reports.is_empty() {
                continue;
            }
            for report in &reports {
                log::debug!("{report}");
            }
            self.steps.extend(reports);
            return true;
        }
        false
    }
}

/// Runs one strategy once and applies what it found according to its instance handling.
///
/// Returns one report per commit that still changed something.
pub(crate) fn apply_strategy(
    strategy: &Strategy,
    grid: &mut CandidateGrid,
    graphs: &mut GraphCache,
    assume_unique: bool,
) -> Vec<ChangeReport> {
    let mut ctx = StrategyContext::new(grid, graphs, strategy.handling(), assume_unique);
    if strategy.search(&mut ctx).is_break() {
        log::trace!("{} stopped at its first instance", strategy.name());
    }
    let mut commits = ctx.into_commits();
    match strategy.handling() {
        InstanceHandling::FirstOnly => commits.truncate(1),
        InstanceHandling::UnorderedAll => {}
        InstanceHandling::BestOnly => {
            let best = commits
                .iter()
                .enumerate()
                .max_by_key(|&(i, commit)| (commit.changes.len(), Reverse(i)))
                .map(|(i, _)| i);
            commits = best.map(|i| commits.swap_remove(i)).into_iter().collect();
        }
        InstanceHandling::SortedAll => {
            commits.sort_by_key(|commit| Reverse(commit.changes.len()));
        }
    }

    let mut reports = Vec::new();
    for commit in commits {
        let before = grid.snapshot();
        let changes = commit.apply(grid);
        if changes.is_empty() {
            log::trace!("{}: instance made obsolete by an earlier one", strategy.name());
            continue;
        }
        #[cfg(debug_assertions)]
        grid.verify_agreement();
        reports.push(commit.builder.build_report(strategy, changes, before));
    }
    if !reports.is_empty() {
        graphs.invalidate();
    }
    reports
}

#[cfg(test)]
mod tests {
    use numera_core::{Digit, Position};

    use super::*;
    use crate::StrategyKind;

    const EASY: &str =
        "..3.2.6..9..3.5..1..18.64....81.29..7.......8..67.82....26.95..8..2.3..9..5.1.3..";
    const HARD: &str =
        "8..........36......7..9.2...5...7.......457.....1...3...1....68..85...1..9....4..";

    fn singles() -> StrategySolver {
        StrategySolver::new(vec![
            Strategy::new("Naked Single", Difficulty::Basic, StrategyKind::NakedSingle),
            Strategy::new("Hidden Single", Difficulty::Basic, StrategyKind::HiddenSingle),
        ])
    }

    fn set(solver: &mut StrategySolver, puzzle: &str) {
        solver.set_grid(&puzzle.parse().unwrap());
    }

    #[test]
    fn test_empty_grid_is_stuck() {
        let mut solver = singles();
        let outcome = solver.solve();
        assert_eq!(outcome.status, SolveStatus::Stuck);
        assert_eq!(outcome.steps_taken, 0);
        assert_eq!(outcome.hardest, None);
    }

    #[test]
    fn test_singles_solve_easy_puzzle() {
        let mut solver = singles();
        set(&mut solver, EASY);
        let outcome = solver.solve();
        assert_eq!(outcome.status, SolveStatus::Solved);
        assert_eq!(outcome.hardest, Some(Difficulty::Basic));
        assert_eq!(solver.hardest_difficulty(), Some(Difficulty::Basic));
        solver.grid().verify_agreement();
    }

    #[test]
    fn test_step_stops_after_progress() {
        let mut solver = singles();
        set(&mut solver, EASY);
        let before = solver.grid().total_candidates();
        let outcome = solver.step();
        assert_eq!(outcome.status, SolveStatus::Stopped);
        assert_eq!(outcome.steps_taken, 1);
        assert!(solver.grid().total_candidates() < before);
    }

    #[test]
    fn test_monotonic_forward_solve() {
        let mut solver = StrategySolver::standard();
        set(&mut solver, EASY);
        let mut candidates = solver.grid().total_candidates();
        let mut solved = solver.grid().solved_count();
        while solver.step().status.is_stopped() {
            assert!(solver.grid().total_candidates() <= candidates);
            assert!(solver.grid().solved_count() >= solved);
            candidates = solver.grid().total_candidates();
            solved = solver.grid().solved_count();
        }
        assert!(solver.grid().is_solved());
    }

    #[test]
    fn test_contradiction_is_data() {
        let mut solver = singles();
        // two 1s in the first row
        set(&mut solver, &format!("11{}", ".".repeat(79)));
        let outcome = solver.solve();
        assert!(outcome.status.is_contradiction(), "{outcome:?}");
        assert!(solver.next_hint().is_err());
        assert!(solver.all_next_steps().is_err());
    }

    #[test]
    fn test_next_hint_does_not_mutate() {
        let mut solver = singles();
        set(&mut solver, EASY);
        let before = solver.grid().clone();
        let hint = solver.next_hint().unwrap().unwrap();
        assert_eq!(solver.grid(), &before);
        assert!(solver.steps().is_empty());

        solver.step();
        assert_eq!(solver.steps(), [hint]);
    }

    #[test]
    fn test_all_next_steps_does_not_mutate() {
        let mut solver = singles();
        set(&mut solver, EASY);
        let before = solver.grid().clone();
        let all = solver.all_next_steps().unwrap();
        assert_eq!(solver.grid(), &before);
        assert!(solver.steps().is_empty());

        assert!(all.len() > 1);
        assert_eq!(all[0], solver.next_hint().unwrap().unwrap());
        let snapshot = before.snapshot();
        assert!(all.iter().all(|report| report.before == snapshot));
        // both singles strategies contribute
        assert!(all.iter().any(|r| r.strategy == "Naked Single"));
        assert!(all.iter().any(|r| r.strategy == "Hidden Single"));
    }

    #[test]
    fn test_apply_report_matches_step() {
        let mut solver = singles();
        set(&mut solver, EASY);
        let mut stepped = solver.clone();
        stepped.step();

        let all = solver.all_next_steps().unwrap();
        assert!(solver.apply_report(&all[0]));
        assert_eq!(solver.grid(), stepped.grid());
        assert_eq!(solver.steps(), stepped.steps());
        solver.grid().verify_agreement();

        // the same report again has nothing left to do
        assert!(!solver.apply_report(&all[0]));
        assert_eq!(solver.steps().len(), 1);
    }

    #[test]
    fn test_apply_report_in_any_order_stays_sound() {
        let registry = StrategyRegistry::standard();
        let mut solver = StrategySolver::new(
            registry
                .strategies()
                .iter()
                .filter(|s| s.difficulty() <= Difficulty::Medium)
                .cloned()
                .collect(),
        );
        set(&mut solver, EASY);
        let solution = crate::Backtracker::new()
            .first_solution(&EASY.parse().unwrap())
            .unwrap();
        while let Some(report) = solver.all_next_steps().unwrap().pop() {
            assert!(solver.apply_report(&report));
        }
        assert!(solver.grid().is_solved());
        assert_eq!(solver.grid().to_digit_grid(), solution);
        assert_eq!(solver.solve().status, SolveStatus::Solved);
    }

    #[cfg(debug_assertions)]
    #[test]
    fn test_debug_solve_checks_agreement() {
        // every commit runs the agreement check in debug builds
        let mut solver = StrategySolver::standard();
        set(&mut solver, EASY);
        let outcome = solver.solve();
        assert_eq!(outcome.status, SolveStatus::Solved, "{outcome:?}");
        assert!(outcome.steps_taken > 1, "{outcome:?}");
        let placed = solver
            .steps()
            .iter()
            .flat_map(|r| &r.changes)
            .filter(|c| c.kind.is_assignment())
            .count();
        assert_eq!(placed, 49);
        let solution = crate::Backtracker::new()
            .first_solution(&EASY.parse().unwrap())
            .unwrap();
        assert_eq!(solver.grid().to_digit_grid(), solution);
    }

    #[cfg(debug_assertions)]
    #[test]
    fn test_debug_brute_force_commit_checks_agreement() {
        let mut solver = StrategySolver::standard();
        for strategy in solver.strategies_mut() {
            if strategy.name() == "Brute Force" {
                assert!(strategy.set_enabled(true));
            }
        }
        set(&mut solver, HARD);
        let outcome = solver.solve();
        assert_eq!(outcome.status, SolveStatus::Solved, "{outcome:?}");
        assert!(outcome.steps_taken > 0);
        assert_eq!(
            solver.steps().last().map(|r| r.strategy.as_str()),
            Some("Brute Force")
        );
        let solution = crate::Backtracker::new()
            .first_solution(&HARD.parse().unwrap())
            .unwrap();
        assert_eq!(solver.grid().to_digit_grid(), solution);
    }

    #[test]
    fn test_restarts_from_first_strategy() {
        let mut solver = singles();
        solver.attach_tracker(StatisticsTracker::new());
        set(&mut solver, EASY);
        solver.solve();
        let tracker = solver.detach_tracker().unwrap();
        let naked = tracker.get("Naked Single").unwrap();
        let hidden = tracker.get("Hidden Single").map_or(0, |s| s.invocations);
        // every pass starts over with naked singles
        assert_eq!(naked.invocations, naked.successes + hidden);
    }

    #[test]
    fn test_disabled_strategies_are_skipped() {
        let mut solver = singles();
        for strategy in solver.strategies_mut() {
            strategy.set_enabled(false);
        }
        set(&mut solver, EASY);
        assert_eq!(solver.solve().status, SolveStatus::Stuck);
    }

    #[test]
    fn test_handling_policies() {
        // naked singles at r1c9 and r5c7
        let puzzle = format!("12345678.{}234567.91{}", ".".repeat(27), ".".repeat(36));
        let count = |handling| {
            let strategy =
                Strategy::new("Naked Single", Difficulty::Basic, StrategyKind::NakedSingle)
                    .with_handling(handling);
            let mut grid = CandidateGrid::from(&puzzle.parse::<DigitGrid>().unwrap());
            apply_strategy(&strategy, &mut grid, &mut GraphCache::new(), true).len()
        };
        assert_eq!(count(InstanceHandling::FirstOnly), 1);
        assert_eq!(count(InstanceHandling::BestOnly), 1);
        assert_eq!(count(InstanceHandling::UnorderedAll), 2);
        assert_eq!(count(InstanceHandling::SortedAll), 2);
    }

    #[test]
    fn test_best_and_sorted_prefer_larger_instances() {
        // pointing 1 in box 1 removes four candidates, pointing 2 in box 5 removes six
        let mut grid = CandidateGrid::new();
        for x in 0..3 {
            for y in 1..3 {
                grid.eliminate(Position::new(x, y), Digit::D1);
            }
        }
        grid.eliminate(Position::new(7, 0), Digit::D1);
        grid.eliminate(Position::new(8, 0), Digit::D1);
        for y in 3..6 {
            grid.eliminate(Position::new(3, y), Digit::D2);
            grid.eliminate(Position::new(5, y), Digit::D2);
        }
        let run = |handling| {
            let strategy =
                Strategy::new("Pointing Set", Difficulty::Easy, StrategyKind::PointingSet)
                    .with_handling(handling);
            let mut grid = grid.clone();
            apply_strategy(&strategy, &mut grid, &mut GraphCache::new(), true)
                .iter()
                .map(|r| (r.changes[0].digit(), r.changes.len()))
                .collect::<Vec<_>>()
        };
        assert_eq!(
            run(InstanceHandling::UnorderedAll),
            [(Digit::D1, 4), (Digit::D2, 6)]
        );
        assert_eq!(
            run(InstanceHandling::SortedAll),
            [(Digit::D2, 6), (Digit::D1, 4)]
        );
        assert_eq!(run(InstanceHandling::BestOnly), [(Digit::D2, 6)]);
        assert_eq!(run(InstanceHandling::FirstOnly), [(Digit::D1, 4)]);
    }

    #[test]
    fn test_tracker_observes_only() {
        let mut plain = StrategySolver::standard();
        set(&mut plain, EASY);
        plain.solve();

        let mut tracked = StrategySolver::standard();
        tracked.attach_tracker(StatisticsTracker::new());
        set(&mut tracked, EASY);
        tracked.solve();

        assert_eq!(plain.steps(), tracked.steps());
        let tracker = tracked.detach_tracker().unwrap();
        let placed: u64 = tracker.strategies().iter().map(|s| s.assignments).sum();
        assert_eq!(placed, 81 - 32);
        assert!(tracked.tracker().is_none());
    }
}
