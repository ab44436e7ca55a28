use std::ops::ControlFlow;

use numera_core::{Candidate, Digit, DigitPositions, House, Position};

use super::StrategyContext;
use crate::report::{Explanation, HighlightRole};

/// A digit confined to one line of a box is removed from the rest of the line.
pub(super) fn pointing(ctx: &mut StrategyContext<'_>) -> ControlFlow<()> {
    let grid = ctx.grid();
    for house in House::BOXES {
        for digit in Digit::ALL {
            let positions = grid.house_positions(house, digit);
            let Some(first) = positions.first() else {
                continue;
            };
            if positions.len() < 2 {
                continue;
            }
            for line in lines_through(first) {
                if !positions.is_subset(line.positions()) {
                    continue;
                }
                ctx.propose_eliminations(line.positions() - house.positions(), digit);
                ctx.commit(|| explain("Pointing", digit, house, line, positions))?;
            }
        }
    }
    ControlFlow::Continue(())
}

/// A digit confined to one box within a line is removed from the rest of the box.
pub(super) fn claiming(ctx: &mut StrategyContext<'_>) -> ControlFlow<()> {
    let grid = ctx.grid();
    for line in House::ROWS.into_iter().chain(House::COLUMNS) {
        for digit in Digit::ALL {
            let positions = grid.house_positions(line, digit);
            let Some(first) = positions.first() else {
                continue;
            };
            if positions.len() < 2 {
                continue;
            }
            let house = House::Box {
                index: first.box_index(),
            };
            if !positions.is_subset(house.positions()) {
                continue;
            }
            ctx.propose_eliminations(house.positions() - line.positions(), digit);
            ctx.commit(|| explain("Claiming", digit, line, house, positions))?;
        }
    }
    ControlFlow::Continue(())
}

fn lines_through(pos: Position) -> [House; 2] {
    [House::Row { y: pos.y() }, House::Column { x: pos.x() }]
}

fn explain(
    kind: &str,
    digit: Digit,
    from: House,
    to: House,
    positions: DigitPositions,
) -> Explanation {
    Explanation::new(format!("{kind} {digit} from {from} to {to}"))
        .house(from, HighlightRole::Neutral)
        .house(to, HighlightRole::Neutral)
        .candidates(
            positions.iter().map(|pos| Candidate::new(pos, digit)),
            HighlightRole::Cause,
        )
}
