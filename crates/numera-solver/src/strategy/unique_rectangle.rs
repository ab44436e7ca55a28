use std::ops::ControlFlow;

use numera_core::{Candidate, DigitPositions, Position};
use tinyvec::ArrayVec;

use super::{StrategyContext, subsets::format_digits};
use crate::report::{Explanation, HighlightRole};

/// Avoids the deadly pattern: four cells on two rows, two columns and two boxes holding
/// only the same two digits would allow two solutions.
///
/// Type 1 takes the pair out of the one corner with extra candidates. Type 2 has two
/// corners on a line sharing the same single extra digit; one of them must take it, so
/// it goes from every cell that sees both.
pub(super) fn unique_rectangle(ctx: &mut StrategyContext<'_>) -> ControlFlow<()> {
    if !ctx.assume_unique() {
        return ControlFlow::Continue(());
    }
    for y1 in 0..9 {
        for y2 in y1 + 1..9 {
            for x1 in 0..9 {
                for x2 in x1 + 1..9 {
                    if (y1 / 3 == y2 / 3) == (x1 / 3 == x2 / 3) {
                        continue;
                    }
                    let corners = [
                        Position::new(x1, y1),
                        Position::new(x2, y1),
                        Position::new(x1, y2),
                        Position::new(x2, y2),
                    ];
                    rectangle(ctx, corners)?;
                }
            }
        }
    }
    ControlFlow::Continue(())
}

fn rectangle(ctx: &mut StrategyContext<'_>, corners: [Position; 4]) -> ControlFlow<()> {
    let grid = ctx.grid();
    if corners.iter().any(|&pos| grid.is_solved_at(pos)) {
        return ControlFlow::Continue(());
    }
    let mask: DigitPositions = corners.into_iter().collect();
    let pair = grid.common_candidates(mask);
    if pair.len() != 2 {
        return ControlFlow::Continue(());
    }
    let (floor, roof): (ArrayVec<[Position; 4]>, ArrayVec<[Position; 4]>) = corners
        .into_iter()
        .partition(|&pos| grid.candidates_at(pos) == pair);
    let explain = move |kind: &str| {
        Explanation::new(format!(
            "Unique Rectangle {kind} on {} at {}",
            format_digits(pair),
            corners.map(|pos| pos.to_string()).join(", ")
        ))
        .candidates(
            corners
                .into_iter()
                .flat_map(|pos| pair.iter().map(move |d| Candidate::new(pos, d))),
            HighlightRole::Cause,
        )
    };
    match (floor.as_slice(), roof.as_slice()) {
        (&[_, _, _], &[corner]) => {
            for digit in pair {
                ctx.propose_elimination(corner, digit);
            }
            ctx.commit(|| explain("type 1"))
        }
        (&[f1, f2], &[r1, r2]) => {
            if f1.x() != f2.x() && f1.y() != f2.y() {
                return ControlFlow::Continue(());
            }
            let extra = grid.candidates_at(r1) - pair;
            let Some(digit) = extra.as_single() else {
                return ControlFlow::Continue(());
            };
            if grid.candidates_at(r2) - pair != extra {
                return ControlFlow::Continue(());
            }
            let targets = grid.open_peers(r1, digit) & grid.open_peers(r2, digit);
            ctx.propose_eliminations(targets, digit);
            ctx.commit(|| {
                explain("type 2").candidates(
                    [r1, r2].map(|pos| Candidate::new(pos, digit)),
                    HighlightRole::On,
                )
            })
        }
        _ => ControlFlow::Continue(()),
    }
}

#[cfg(test)]
mod tests {
    use numera_core::{CandidateGrid, Digit, Position};

    use crate::{StrategyRegistry, testing::StrategyTester};

    fn restrict(grid: &mut CandidateGrid, pos: Position, keep: &[Digit]) {
        for digit in Digit::ALL {
            if !keep.contains(&digit) {
                grid.eliminate(pos, digit);
            }
        }
    }

    #[test]
    fn test_type_1() {
        let mut grid = CandidateGrid::new();
        for pos in [Position::new(0, 0), Position::new(3, 0), Position::new(0, 1)] {
            restrict(&mut grid, pos, &[Digit::D1, Digit::D2]);
        }
        let registry = StrategyRegistry::standard();
        StrategyTester::new(grid)
            .apply_once(registry.get("Unique Rectangle").unwrap())
            .assert_removed_exact(Position::new(3, 1), [Digit::D1, Digit::D2]);
    }

    #[test]
    fn test_type_2() {
        let mut grid = CandidateGrid::new();
        for pos in [Position::new(0, 0), Position::new(3, 0)] {
            restrict(&mut grid, pos, &[Digit::D1, Digit::D2]);
        }
        for pos in [Position::new(0, 1), Position::new(3, 1)] {
            restrict(&mut grid, pos, &[Digit::D1, Digit::D2, Digit::D5]);
        }
        let registry = StrategyRegistry::standard();
        StrategyTester::new(grid)
            .apply_once(registry.get("Unique Rectangle").unwrap())
            .assert_removed_exact(Position::new(5, 1), [Digit::D5])
            .assert_removed_exact(Position::new(8, 1), [Digit::D5])
            .assert_no_change(Position::new(0, 1))
            .assert_no_change(Position::new(1, 2));
    }

    #[test]
    fn test_disabled_without_uniqueness() {
        let mut grid = CandidateGrid::new();
        for pos in [Position::new(0, 0), Position::new(3, 0), Position::new(0, 1)] {
            restrict(&mut grid, pos, &[Digit::D1, Digit::D2]);
        }
        let registry = StrategyRegistry::standard();
        StrategyTester::new(grid)
            .assuming_unique(false)
            .apply_once(registry.get("Unique Rectangle").unwrap())
            .assert_no_progress();
    }
}
