use std::ops::ControlFlow;

use super::StrategyContext;
use crate::{
    backtrack::Backtracker,
    report::{Explanation, HighlightRole},
};

/// Solves the rest of the grid by trial.
///
/// Only a unique completion is committed: with several, no single one can be trusted.
pub(super) fn brute_force(ctx: &mut StrategyContext<'_>) -> ControlFlow<()> {
    let grid = ctx.grid();
    let unsolved = grid.unsolved_cells();
    if unsolved.is_empty() {
        return ControlFlow::Continue(());
    }
    let solutions = Backtracker::with_giver(grid).solutions(&grid.to_digit_grid(), 2);
    let [solution] = solutions.as_slice() else {
        log::debug!("brute force found {} completions, committing none", solutions.len());
        return ControlFlow::Continue(());
    };
    for pos in unsolved {
        if let Some(digit) = solution.get(pos) {
            ctx.propose_assignment(pos, digit);
        }
    }
    ctx.commit(|| {
        Explanation::new("Brute force: the only completion").cells(unsolved, HighlightRole::Change)
    })
}

#[cfg(test)]
mod tests {
    use crate::{StrategyRegistry, testing::StrategyTester};

    const UNIQUE: &str =
        "..3.2.6..9..3.5..1..18.64....81.29..7.......8..67.82....26.95..8..2.3..9..5.1.3..";
    const TWO_SOLUTIONS: &str =
        ".9.2.......1..693..3.71..8.35........48..2.6...7......56....4......4.2..2...3.6.7";

    #[test]
    fn test_unique_completion() {
        let registry = StrategyRegistry::standard();
        let tester = StrategyTester::from_str(UNIQUE)
            .apply_once(registry.get("Brute Force").unwrap())
            .assert_sound();
        assert!(tester.grid().is_solved());
    }

    #[test]
    fn test_ambiguous_grid_is_left_alone() {
        let registry = StrategyRegistry::standard();
        StrategyTester::from_str(TWO_SOLUTIONS)
            .apply_once(registry.get("Brute Force").unwrap())
            .assert_no_progress();
    }
}
