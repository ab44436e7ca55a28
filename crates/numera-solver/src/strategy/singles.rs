use std::ops::ControlFlow;

use numera_core::{Candidate, Digit, House};

use super::StrategyContext;
use crate::report::{Explanation, HighlightRole};

/// Places the last candidate of every cell that has one left.
pub(super) fn naked_single(ctx: &mut StrategyContext<'_>) -> ControlFlow<()> {
    let grid = ctx.grid();
    for pos in grid.unsolved_cells() {
        let Some(digit) = grid.candidates_at(pos).as_single() else {
            continue;
        };
        ctx.propose_assignment(pos, digit);
        ctx.commit(|| {
            Explanation::new(format!("{pos} can only be {digit}")).cell(pos, HighlightRole::Cause)
        })?;
    }
    ControlFlow::Continue(())
}

/// Places every digit that has a single position left in some house.
pub(super) fn hidden_single(ctx: &mut StrategyContext<'_>) -> ControlFlow<()> {
    let grid = ctx.grid();
    for house in House::ALL {
        let solved = grid.digits_solved_in(house);
        for digit in Digit::ALL {
            if solved.contains(digit) {
                continue;
            }
            let Some(pos) = grid.house_positions(house, digit).as_single() else {
                continue;
            };
            ctx.propose_assignment(pos, digit);
            ctx.commit(|| {
                Explanation::new(format!("{digit} has one place left in {house}"))
                    .house(house, HighlightRole::Neutral)
                    .candidate(Candidate::new(pos, digit), HighlightRole::Cause)
            })?;
        }
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use numera_core::{Digit, Position};

    use crate::{InstanceHandling, StrategyRegistry, testing::StrategyTester};

    #[test]
    fn test_naked_single() {
        let registry = StrategyRegistry::standard();
        StrategyTester::from_str(
            "
            12345678.
            .........
            .........
            .........
            .........
            .........
            .........
            .........
            .........
        ",
        )
        .apply_once(registry.get("Naked Single").unwrap())
        .assert_placed(Position::new(8, 0), Digit::D9)
        .assert_summary("+ 919");
    }

    #[test]
    fn test_hidden_single() {
        let registry = StrategyRegistry::standard();
        StrategyTester::from_str(
            "
            .........
            ....1....
            .......1.
            .........
            .........
            .1.......
            .........
            .........
            ..1......
        ",
        )
        .apply_once(registry.get("Hidden Single").unwrap())
        .assert_placed(Position::new(0, 0), Digit::D1)
        .assert_sound();
    }

    #[test]
    fn test_duplicate_instances_are_reported_once() {
        // the last cell of the row is also the last of its column and box
        let registry = StrategyRegistry::standard();
        let tester = StrategyTester::from_str(
            "
            12345678.
            ........1
            ........2
            ........3
            ........4
            ........5
            ........6
            ........7
            ........8
        ",
        )
        .with_handling(InstanceHandling::UnorderedAll)
        .apply_once(registry.get("Hidden Single").unwrap())
        .assert_placed(Position::new(8, 0), Digit::D9);
        assert_eq!(tester.reports().len(), 1);
    }

    #[test]
    fn test_no_single_on_empty_grid() {
        let registry = StrategyRegistry::standard();
        StrategyTester::from_str(&".".repeat(81))
            .apply_once(registry.get("Naked Single").unwrap())
            .apply_once(registry.get("Hidden Single").unwrap())
            .assert_no_progress();
    }
}
