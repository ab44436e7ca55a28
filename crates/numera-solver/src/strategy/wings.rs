use std::ops::ControlFlow;

use numera_core::{Candidate, Digit, DigitSet, Position};

use super::{StrategyContext, subsets::format_digits};
use crate::report::{Explanation, HighlightRole};

/// A bivalue pivot `xy` seeing pincers `xz` and `yz`.
///
/// Whatever the pivot holds, one pincer is `z`, so `z` goes from every cell that sees
/// both pincers.
pub(super) fn xy_wing(ctx: &mut StrategyContext<'_>) -> ControlFlow<()> {
    let grid = ctx.grid();
    let bivalue = grid.bivalue_cells();
    for pivot in bivalue {
        let pivot_digits = grid.candidates_at(pivot);
        let pincers: Vec<Position> = (bivalue & pivot.peers()).iter().collect();
        for (i, &a) in pincers.iter().enumerate() {
            for &b in &pincers[i + 1..] {
                let (da, db) = (grid.candidates_at(a), grid.candidates_at(b));
                let Some(z) = (da & db).as_single() else {
                    continue;
                };
                if pivot_digits.contains(z)
                    || da == db
                    || (da | db) - DigitSet::from_elem(z) != pivot_digits
                {
                    continue;
                }
                let targets = grid.open_peers(a, z) & grid.open_peers(b, z);
                ctx.propose_eliminations(targets, z);
                ctx.commit(|| {
                    explain("XY-Wing", format_digits(pivot_digits), pivot, [a, b], z)
                })?;
            }
        }
    }
    ControlFlow::Continue(())
}

/// A trivalue pivot `xyz` seeing pincers `xz` and `yz`.
///
/// One of the three cells is `z`, so `z` goes from every cell that sees all three.
pub(super) fn xyz_wing(ctx: &mut StrategyContext<'_>) -> ControlFlow<()> {
    let grid = ctx.grid();
    let bivalue = grid.bivalue_cells();
    for pivot in grid.unsolved_cells() {
        let pivot_digits = grid.candidates_at(pivot);
        if pivot_digits.len() != 3 {
            continue;
        }
        let pincers: Vec<Position> = (bivalue & pivot.peers())
            .iter()
            .filter(|&pos| grid.candidates_at(pos).is_subset(pivot_digits))
            .collect();
        for (i, &a) in pincers.iter().enumerate() {
            for &b in &pincers[i + 1..] {
                let (da, db) = (grid.candidates_at(a), grid.candidates_at(b));
                let Some(z) = (da & db).as_single() else {
                    continue;
                };
                let targets =
                    grid.open_peers(pivot, z) & grid.open_peers(a, z) & grid.open_peers(b, z);
                ctx.propose_eliminations(targets, z);
                ctx.commit(|| {
                    explain("XYZ-Wing", format_digits(pivot_digits), pivot, [a, b], z)
                })?;
            }
        }
    }
    ControlFlow::Continue(())
}

fn explain(
    kind: &str,
    pivot_digits: String,
    pivot: Position,
    pincers: [Position; 2],
    z: Digit,
) -> Explanation {
    Explanation::new(format!(
        "{kind} with pivot {pivot} ({pivot_digits}) and pincers {}, {} on {z}",
        pincers[0], pincers[1]
    ))
    .cell(pivot, HighlightRole::Cause)
    .cells(pincers, HighlightRole::Cause)
    .candidates(pincers.map(|pos| Candidate::new(pos, z)), HighlightRole::On)
}

#[cfg(test)]
mod tests {
    use numera_core::{CandidateGrid, Digit, Position};

    use crate::{StrategyRegistry, testing::StrategyTester};

    const XY_WING: &str = "g188aa050hca5090b0cg118g21g1c0050903ea05aa8211ca4gg1agaig1bi41228g09059g8i8g05g10911218i41aq41bq8g2205g19i9g8g21g11i050i9i41091103880o41g18g2105050o411q81211i1gg1";
    const XY_WING_2: &str = "2111k8co4oso03480505g2812248i20h48110a0h4a11054a81g121gi09210m810ig41141gg81h04s215og4030o4105120qg11q21810o11410hg10305092181g8i005a811a8410h0381220a6o4o6o1105g1";

    #[test]
    fn test_xy_wing() {
        // pivot r8c3, pincers r7c1 and r8c4
        let registry = StrategyRegistry::standard();
        StrategyTester::from_state_str(XY_WING)
            .apply_once(registry.get("XY-Wing").unwrap())
            .assert_removed_includes(Position::new(3, 6), [Digit::D4])
            .assert_removed_includes(Position::new(5, 6), [Digit::D4])
            .assert_sound();
    }

    #[test]
    fn test_xy_wing_across_boxes() {
        let registry = StrategyRegistry::standard();
        StrategyTester::from_state_str(XY_WING_2)
            .apply_once(registry.get("XY-Wing").unwrap())
            .assert_removed_includes(Position::new(3, 7), [Digit::D6])
            .assert_sound();
    }

    #[test]
    fn test_xyz_wing() {
        let mut grid = CandidateGrid::new();
        let cells = [
            (Position::new(0, 0), [Digit::D1, Digit::D2, Digit::D3].as_slice()),
            (Position::new(4, 0), [Digit::D1, Digit::D3].as_slice()),
            (Position::new(1, 1), [Digit::D2, Digit::D3].as_slice()),
        ];
        for (pos, keep) in cells {
            for digit in Digit::ALL {
                if !keep.contains(&digit) {
                    grid.eliminate(pos, digit);
                }
            }
        }
        let registry = StrategyRegistry::standard();
        StrategyTester::new(grid)
            .apply_once(registry.get("XYZ-Wing").unwrap())
            .assert_removed_exact(Position::new(1, 0), [Digit::D3])
            .assert_removed_exact(Position::new(2, 0), [Digit::D3])
            .assert_no_change(Position::new(3, 0))
            .assert_no_change(Position::new(0, 1));
    }
}
