use std::ops::ControlFlow;

use numera_core::{Candidate, Digit, DigitPositions, House, HouseMask};
use tinyvec::ArrayVec;

use super::{
    StrategyContext,
    axis::{AxisOps, ColumnAxis, RowAxis},
    combinations::combinations,
};
use crate::report::{Explanation, HighlightRole};

fn fish_name(size: usize) -> &'static str {
    match size {
        2 => "X-Wing",
        3 => "Swordfish",
        4 => "Jellyfish",
        _ => "Fish",
    }
}

/// `size` base lines whose candidates for a digit cover only `size` cross lines.
///
/// The digit is removed from the cover lines outside the base lines. Rows are tried as
/// base lines before columns.
pub(super) fn basic_fish(ctx: &mut StrategyContext<'_>, size: usize) -> ControlFlow<()> {
    for digit in Digit::ALL {
        fish_on::<RowAxis>(ctx, digit, size)?;
        fish_on::<ColumnAxis>(ctx, digit, size)?;
    }
    ControlFlow::Continue(())
}

fn fish_on<A: AxisOps>(
    ctx: &mut StrategyContext<'_>,
    digit: Digit,
    size: usize,
) -> ControlFlow<()> {
    let grid = ctx.grid();
    let mut lines = ArrayVec::<[u8; 9]>::new();
    for index in 0..9 {
        if (2..=size).contains(&grid.house_count(A::line(index), digit)) {
            lines.push(index);
        }
    }
    combinations(lines.len(), size, |picked| {
        let mut base = DigitPositions::EMPTY;
        let mut cover = HouseMask::EMPTY;
        for &i in picked {
            let line = A::line(lines[i]);
            base |= grid.house_positions(line, digit);
            cover |= grid.house_mask(line, digit);
        }
        if cover.len() != size {
            return ControlFlow::Continue(());
        }
        for cross in cover {
            ctx.propose_eliminations(A::cross(cross).positions() - base, digit);
        }
        ctx.commit(|| {
            let names: Vec<String> = picked
                .iter()
                .map(|&i| (lines[i] + 1).to_string())
                .collect();
            let mut explanation = Explanation::new(format!(
                "{} on {digit} in {} {}",
                fish_name(size),
                A::LINES,
                names.join(", ")
            ));
            for &i in picked {
                explanation = explanation.house(A::line(lines[i]), HighlightRole::Neutral);
            }
            explanation.candidates(
                base.iter().map(|pos| Candidate::new(pos, digit)),
                HighlightRole::Cause,
            )
        })
    })
}

/// An X-Wing whose second base line has extra candidates, all in one box.
///
/// Either the X-Wing holds or a fin is true; cells of the cover line inside the fin box
/// are removed both ways.
pub(super) fn finned_x_wing(ctx: &mut StrategyContext<'_>) -> ControlFlow<()> {
    for digit in Digit::ALL {
        finned_on::<RowAxis>(ctx, digit)?;
        finned_on::<ColumnAxis>(ctx, digit)?;
    }
    ControlFlow::Continue(())
}

fn finned_on<A: AxisOps>(ctx: &mut StrategyContext<'_>, digit: Digit) -> ControlFlow<()> {
    let grid = ctx.grid();
    for base in 0..9 {
        let base_mask = grid.house_mask(A::line(base), digit);
        let Some((a, b)) = base_mask.as_double() else {
            continue;
        };
        for finned in 0..9 {
            if finned == base {
                continue;
            }
            let finned_mask = grid.house_mask(A::line(finned), digit);
            if !base_mask.is_subset(finned_mask) {
                continue;
            }
            let fins = finned_mask - base_mask;
            let Some(first_fin) = fins.first() else {
                continue;
            };
            let fin_box = A::make_pos(finned, first_fin).box_index();
            if fins
                .iter()
                .any(|fin| A::make_pos(finned, fin).box_index() != fin_box)
            {
                continue;
            }
            let Some(corner) = [a, b]
                .into_iter()
                .find(|&cross| A::make_pos(finned, cross).box_index() == fin_box)
            else {
                continue;
            };
            let targets = (A::cross(corner).positions()
                & House::Box { index: fin_box }.positions())
                - A::line(base).positions()
                - A::line(finned).positions();
            ctx.propose_eliminations(targets, digit);
            ctx.commit(|| {
                Explanation::new(format!(
                    "Finned X-Wing on {digit} in {} {} and {}",
                    A::LINES,
                    base + 1,
                    finned + 1
                ))
                .house(A::line(base), HighlightRole::Neutral)
                .house(A::line(finned), HighlightRole::Neutral)
                .candidates(
                    [a, b].map(|cross| Candidate::new(A::make_pos(base, cross), digit)),
                    HighlightRole::Cause,
                )
                .candidates(
                    [a, b].map(|cross| Candidate::new(A::make_pos(finned, cross), digit)),
                    HighlightRole::Cause,
                )
                .candidates(
                    fins.iter()
                        .map(|fin| Candidate::new(A::make_pos(finned, fin), digit)),
                    HighlightRole::Neutral,
                )
            })?;
        }
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use numera_core::{CandidateGrid, Digit, Position};

    use crate::{StrategyRegistry, testing::StrategyTester};

    const X_WING: &str = "03c848csc4cs1121g10hg105481121034881c8112103c0g1050h485848g1210h4481140350210hs403c4k81448050381k0091121k00hc80h4811s4cck80321g1c811c821030hc805210503cos0cok8s811";

    #[test]
    fn test_x_wing_in_puzzle() {
        // 7 in rows 2 and 6 is confined to columns 4 and 8
        let registry = StrategyRegistry::standard();
        StrategyTester::from_state_str(X_WING)
            .apply_once(registry.get("X-Wing").unwrap())
            .assert_summary("- 714 754 784 794 788 798")
            .assert_sound();
    }

    #[test]
    fn test_swordfish() {
        // 1 in rows 1, 4 and 7 only at columns 1, 4 and 7
        let mut grid = CandidateGrid::new();
        let keep = [(0, [0, 3]), (3, [3, 6]), (6, [0, 6])];
        for (y, xs) in keep {
            for x in 0..9 {
                if !xs.contains(&x) {
                    grid.eliminate(Position::new(x, y), Digit::D1);
                }
            }
        }
        let registry = StrategyRegistry::standard();
        StrategyTester::new(grid)
            .apply_once(registry.get("Swordfish").unwrap())
            .assert_removed_exact(Position::new(0, 1), [Digit::D1])
            .assert_removed_exact(Position::new(3, 8), [Digit::D1])
            .assert_removed_exact(Position::new(6, 4), [Digit::D1])
            .assert_no_change(Position::new(1, 1))
            .assert_no_change(Position::new(0, 0));
    }

    #[test]
    fn test_finned_x_wing() {
        // 2 in row 1 at columns 1 and 5; row 5 at columns 1, 5 with fins in columns 4, 6
        let mut grid = CandidateGrid::new();
        for x in 0..9 {
            if x != 0 && x != 4 {
                grid.eliminate(Position::new(x, 0), Digit::D2);
            }
            if ![0, 3, 4, 5].contains(&x) {
                grid.eliminate(Position::new(x, 4), Digit::D2);
            }
        }
        let registry = StrategyRegistry::standard();
        StrategyTester::new(grid)
            .apply_once(registry.get("Finned X-Wing").unwrap())
            .assert_removed_exact(Position::new(4, 3), [Digit::D2])
            .assert_removed_exact(Position::new(4, 5), [Digit::D2])
            .assert_no_change(Position::new(4, 6))
            .assert_no_change(Position::new(0, 3))
            .assert_sound();
    }

    #[test]
    fn test_no_fish_on_empty_grid() {
        let registry = StrategyRegistry::standard();
        StrategyTester::new(CandidateGrid::new())
            .apply_once(registry.get("X-Wing").unwrap())
            .apply_once(registry.get("Finned X-Wing").unwrap())
            .assert_no_progress();
    }
}
