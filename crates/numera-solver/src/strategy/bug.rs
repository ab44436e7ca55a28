use std::ops::ControlFlow;

use numera_core::{Candidate, CandidateGrid, CandidateSet, Digit, DigitPositions, House};

use super::StrategyContext;
use crate::report::{Explanation, HighlightRole};

/// Bivalue universal grave plus a few extra candidates.
///
/// Without the extras every unsolved cell would be bivalue with every digit twice in each
/// house, a pattern with zero or two solutions. One of the extras must be true. A single
/// extra is placed; extras of one digit remove it from the cells that see them all, and
/// extras in one cell remove the rest of that cell.
pub(super) fn bug(ctx: &mut StrategyContext<'_>, max_additional: usize) -> ControlFlow<()> {
    if !ctx.assume_unique() {
        return ControlFlow::Continue(());
    }
    let grid = ctx.grid();
    let mut extras = Vec::new();
    for pos in grid.unsolved_cells() {
        let digits = grid.candidates_at(pos);
        match digits.len() {
            0 | 1 => return ControlFlow::Continue(()),
            2 => {}
            _ => {
                for digit in digits {
                    let houses = House::houses_of(pos);
                    if houses.iter().all(|&h| grid.house_count(h, digit) != 2) {
                        extras.push(Candidate::new(pos, digit));
                    }
                }
                if extras.len() > max_additional {
                    return ControlFlow::Continue(());
                }
            }
        }
    }
    let extra_set: CandidateSet = extras.iter().copied().collect();
    if extras.is_empty() || !is_grave_without(grid, &extra_set) {
        return ControlFlow::Continue(());
    }

    if let &[single] = extras.as_slice() {
        ctx.propose_assignment(single.position, single.digit);
    } else {
        let first = extras[0];
        if extras.iter().all(|c| c.digit == first.digit) {
            let targets = extras.iter().fold(DigitPositions::FULL, |acc, c| {
                acc & grid.open_peers(c.position, first.digit)
            });
            ctx.propose_eliminations(targets, first.digit);
        }
        if extras.iter().all(|c| c.position == first.position) {
            for digit in grid.candidates_at(first.position) {
                if !extra_set.contains(Candidate::new(first.position, digit)) {
                    ctx.propose_elimination(first.position, digit);
                }
            }
        }
    }
    ctx.commit(|| {
        Explanation::new(format!("BUG+{}", extras.len()))
            .cells(grid.bivalue_cells(), HighlightRole::Neutral)
            .candidates(extras.iter().copied(), HighlightRole::Cause)
    })
}

fn is_grave_without(grid: &CandidateGrid, extras: &CandidateSet) -> bool {
    let kept = |candidate: &Candidate| !extras.contains(*candidate);
    let cells_bivalue = grid.unsolved_cells().iter().all(|pos| {
        grid.candidates_at(pos)
            .iter()
            .map(|digit| Candidate::new(pos, digit))
            .filter(kept)
            .count()
            == 2
    });
    cells_bivalue
        && House::ALL.into_iter().all(|house| {
            let solved = grid.digits_solved_in(house);
            Digit::ALL
                .into_iter()
                .filter(|&digit| !solved.contains(digit))
                .all(|digit| {
                    grid.house_positions(house, digit)
                        .iter()
                        .map(|pos| Candidate::new(pos, digit))
                        .filter(kept)
                        .count()
                        == 2
                })
        })
}

#[cfg(test)]
mod tests {
    use numera_core::{Digit, Position};

    use crate::{StrategyRegistry, testing::StrategyTester};

    const BUG_PLUS_ONE: &str = "030h0581g11141210950o021054g09gg039050o00921034ggg90058121410305g1091g1g0911030h60608105g1g1050h110981214103214190091g0305g18g050990g13g2g038g410h03g1418105110921";

    #[test]
    fn test_bug_plus_one() {
        let registry = StrategyRegistry::standard();
        StrategyTester::from_state_str(BUG_PLUS_ONE)
            .apply_once(registry.get("BUG").unwrap())
            .assert_summary("+ 485")
            .assert_placed(Position::new(4, 7), Digit::D4)
            .assert_sound();
    }

    #[test]
    fn test_bug_needs_uniqueness() {
        let registry = StrategyRegistry::standard();
        StrategyTester::from_state_str(BUG_PLUS_ONE)
            .assuming_unique(false)
            .apply_once(registry.get("BUG").unwrap())
            .assert_no_progress();
    }

    #[test]
    fn test_no_bug_on_open_grid() {
        let registry = StrategyRegistry::standard();
        StrategyTester::from_str(&".".repeat(81))
            .apply_once(registry.get("BUG").unwrap())
            .assert_no_progress();
    }
}
