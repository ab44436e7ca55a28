use std::{
    fmt::{self, Display},
    time::Duration,
};

use crate::{ChangeReport, SolveStatus, Strategy};

/// Counters for one strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategyStats {
    /// Strategy name.
    pub name: String,
    /// Times the strategy was run.
    pub invocations: u64,
    /// Runs that changed the grid.
    pub successes: u64,
    /// Digits placed.
    pub assignments: u64,
    /// Candidates removed.
    pub eliminations: u64,
    /// Time spent searching and committing.
    pub elapsed: Duration,
}

impl StrategyStats {
    /// Returns the mean time per invocation.
    #[must_use]
    pub fn mean_time(&self) -> Duration {
        let Some(nanos) = self.elapsed.as_nanos().checked_div(u128::from(self.invocations)) else {
            return Duration::ZERO;
        };
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    fn merge(&mut self, other: &Self) {
        self.invocations += other.invocations;
        self.successes += other.successes;
        self.assignments += other.assignments;
        self.eliminations += other.eliminations;
        self.elapsed += other.elapsed;
    }
}

/// How the solves observed by a tracker ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PuzzleStats {
    /// Solved to completion.
    pub solved: u64,
    /// No strategy could continue.
    pub stuck: u64,
    /// Stopped after a single step.
    pub stopped: u64,
    /// The grid contradicted itself.
    pub contradictions: u64,
}

/// Collects per-strategy statistics from a [`StrategySolver`](crate::StrategySolver).
///
/// The tracker only observes; attaching or detaching it never changes what the solver
/// does.
///
/// # Examples
///
/// ```
/// use numera_core::DigitGrid;
/// use numera_solver::{StatisticsTracker, StrategySolver};
///
/// let puzzle: DigitGrid =
///     "..3.2.6..9..3.5..1..18.64....81.29..7.......8..67.82....26.95..8..2.3..9..5.1.3.."
///         .parse()?;
/// let mut solver = StrategySolver::standard();
/// solver.attach_tracker(StatisticsTracker::new());
/// solver.set_grid(&puzzle);
/// solver.solve();
///
/// let tracker = solver.detach_tracker().unwrap();
/// assert_eq!(tracker.puzzles().solved, 1);
/// assert!(tracker.get("Naked Single").unwrap().successes > 0);
/// # Ok::<(), numera_core::NotationError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct StatisticsTracker {
    strategies: Vec<StrategyStats>,
    puzzles: PuzzleStats,
}

impl StatisticsTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the counters of every strategy seen so far, in first-seen order.
    #[must_use]
    pub fn strategies(&self) -> &[StrategyStats] {
        &self.strategies
    }

    /// Returns the counters of one strategy.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&StrategyStats> {
        self.strategies.iter().find(|s| s.name == name)
    }

    /// Returns the solve outcome counters.
    #[must_use]
    pub fn puzzles(&self) -> &PuzzleStats {
        &self.puzzles
    }

    fn entry(&mut self, name: &str) -> &mut StrategyStats {
        let index = match self.strategies.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                self.strategies.push(StrategyStats {
                    name: name.to_owned(),
                    ..StrategyStats::default()
                });
                self.strategies.len() - 1
            }
        };
        &mut self.strategies[index]
    }

    pub(crate) fn record_attempt(
        &mut self,
        strategy: &Strategy,
        elapsed: Duration,
        reports: &[ChangeReport],
    ) {
        let stats = self.entry(strategy.name());
        stats.invocations += 1;
        stats.elapsed += elapsed;
        if !reports.is_empty() {
            stats.successes += 1;
        }
        for report in reports {
            stats.assignments += report.assignments() as u64;
            stats.eliminations += report.eliminations() as u64;
        }
    }

    pub(crate) fn record_outcome(&mut self, status: &SolveStatus) {
        let counter = match status {
            SolveStatus::Solved => &mut self.puzzles.solved,
            SolveStatus::Stuck => &mut self.puzzles.stuck,
            SolveStatus::Stopped => &mut self.puzzles.stopped,
            SolveStatus::Contradiction(_) => &mut self.puzzles.contradictions,
        };
        *counter += 1;
    }

    /// Adds the counters of `other` into `self`.
    ///
    /// Useful to combine the trackers of parallel workers.
    pub fn merge(&mut self, other: &Self) {
        for stats in &other.strategies {
            self.entry(&stats.name).merge(stats);
        }
        self.puzzles.solved += other.puzzles.solved;
        self.puzzles.stuck += other.puzzles.stuck;
        self.puzzles.stopped += other.puzzles.stopped;
        self.puzzles.contradictions += other.puzzles.contradictions;
    }
}

impl Display for StatisticsTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let PuzzleStats {
            solved,
            stuck,
            stopped,
            contradictions,
        } = self.puzzles;
        writeln!(
            f,
            "puzzles: {solved} solved, {stuck} stuck, {stopped} stopped, {contradictions} contradictory"
        )?;
        writeln!(
            f,
            "{:<28} {:>8} {:>8} {:>8} {:>8} {:>12}",
            "strategy", "runs", "hits", "placed", "removed", "mean"
        )?;
        for stats in &self.strategies {
            writeln!(
                f,
                "{:<28} {:>8} {:>8} {:>8} {:>8} {:>12.1?}",
                stats.name,
                stats.invocations,
                stats.successes,
                stats.assignments,
                stats.eliminations,
                stats.mean_time()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Difficulty, StrategyKind};

    #[test]
    fn test_record_and_merge() {
        let strategy = Strategy::new("Naked Single", Difficulty::Basic, StrategyKind::NakedSingle);
        let mut a = StatisticsTracker::new();
        a.record_attempt(&strategy, Duration::from_millis(4), &[]);
        a.record_outcome(&SolveStatus::Stuck);

        let mut b = StatisticsTracker::new();
        b.record_attempt(&strategy, Duration::from_millis(2), &[]);
        b.record_outcome(&SolveStatus::Solved);

        a.merge(&b);
        let stats = a.get("Naked Single").unwrap();
        assert_eq!(stats.invocations, 2);
        assert_eq!(stats.successes, 0);
        assert_eq!(stats.mean_time(), Duration::from_millis(3));
        assert_eq!(a.puzzles().solved, 1);
        assert_eq!(a.puzzles().stuck, 1);
        assert!(a.to_string().contains("Naked Single"));
    }

    #[test]
    fn test_mean_of_nothing() {
        assert_eq!(StrategyStats::default().mean_time(), Duration::ZERO);
    }
}
