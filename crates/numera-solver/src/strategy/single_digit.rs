use std::ops::ControlFlow;

use numera_core::{Candidate, Digit, House, Position};
use tinyvec::ArrayVec;

use super::{
    StrategyContext,
    axis::{AxisOps, ColumnAxis, RowAxis},
};
use crate::{
    graph::LinkStrength,
    report::{Explanation, HighlightRole},
};

/// Two conjugate lines that share one end.
///
/// One of the two other ends (the roofs) is true, so the digit is removed from every cell
/// that sees both roofs.
pub(super) fn skyscraper(ctx: &mut StrategyContext<'_>) -> ControlFlow<()> {
    for digit in Digit::ALL {
        skyscraper_on::<ColumnAxis>(ctx, digit)?;
        skyscraper_on::<RowAxis>(ctx, digit)?;
    }
    ControlFlow::Continue(())
}

fn skyscraper_on<A: AxisOps>(ctx: &mut StrategyContext<'_>, digit: Digit) -> ControlFlow<()> {
    let grid = ctx.grid();
    let mut lines = ArrayVec::<[(u8, u8, u8); 9]>::new();
    for line in 0..9 {
        if let Some((a, b)) = grid.house_mask(A::line(line), digit).as_double() {
            lines.push((line, a, b));
        }
    }
    let mut rest = lines.iter();
    while let Some(&(line1, a1, b1)) = rest.next() {
        for &(line2, a2, b2) in rest.as_slice() {
            let (base, roof1, roof2) = if a1 == a2 && b1 != b2 {
                (a1, b1, b2)
            } else if b1 == b2 && a1 != a2 {
                (b1, a1, a2)
            } else {
                continue;
            };
            let roofs = [A::make_pos(line1, roof1), A::make_pos(line2, roof2)];
            let targets = grid.open_peers(roofs[0], digit) & grid.open_peers(roofs[1], digit);
            ctx.propose_eliminations(targets, digit);
            ctx.commit(|| {
                let bases = [A::make_pos(line1, base), A::make_pos(line2, base)];
                let [b1, b2] = bases.map(|pos| Candidate::new(pos, digit));
                let [r1, r2] = roofs.map(|pos| Candidate::new(pos, digit));
                Explanation::new(format!(
                    "Skyscraper on {digit} with roofs {} and {}",
                    roofs[0], roofs[1]
                ))
                .candidates([b1, b2], HighlightRole::Off)
                .candidates([r1, r2], HighlightRole::On)
                .link(b1, r1, LinkStrength::Strong)
                .link(b1, b2, LinkStrength::Weak)
                .link(b2, r2, LinkStrength::Strong)
            })?;
        }
    }
    ControlFlow::Continue(())
}

/// A conjugate row and a conjugate column whose ends meet in a box.
///
/// The two far ends cannot both be false, so the digit is removed from the cells that see
/// them both.
pub(super) fn two_string_kite(ctx: &mut StrategyContext<'_>) -> ControlFlow<()> {
    let grid = ctx.grid();
    for digit in Digit::ALL {
        let conjugates = |houses: [House; 9]| {
            houses
                .into_iter()
                .filter_map(|house| grid.house_positions(house, digit).as_double())
                .collect::<ArrayVec<[(Position, Position); 9]>>()
        };
        let rows = conjugates(House::ROWS);
        let columns = conjugates(House::COLUMNS);
        for &(p1, p2) in &rows {
            for &(q1, q2) in &columns {
                if p1 == q1 || p1 == q2 || p2 == q1 || p2 == q2 {
                    continue;
                }
                for (row_end, row_far) in [(p1, p2), (p2, p1)] {
                    for (col_end, col_far) in [(q1, q2), (q2, q1)] {
                        let joint = row_end.box_index();
                        if col_end.box_index() != joint
                            || row_far.box_index() == joint
                            || col_far.box_index() == joint
                        {
                            continue;
                        }
                        let targets =
                            grid.open_peers(row_far, digit) & grid.open_peers(col_far, digit);
                        ctx.propose_eliminations(targets, digit);
                        ctx.commit(|| {
                            let [rf, re, ce, cf] = [row_far, row_end, col_end, col_far]
                                .map(|pos| Candidate::new(pos, digit));
                            Explanation::new(format!(
                                "Two-String Kite on {digit} joined in box {}",
                                joint + 1
                            ))
                            .house(House::Box { index: joint }, HighlightRole::Neutral)
                            .candidates([rf, cf], HighlightRole::On)
                            .candidates([re, ce], HighlightRole::Off)
                            .link(rf, re, LinkStrength::Strong)
                            .link(re, ce, LinkStrength::Weak)
                            .link(ce, cf, LinkStrength::Strong)
                        })?;
                    }
                }
            }
        }
    }
    ControlFlow::Continue(())
}
