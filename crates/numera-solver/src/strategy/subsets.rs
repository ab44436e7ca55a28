use std::ops::ControlFlow;

use numera_core::{Candidate, Digit, DigitPositions, DigitSet, House, Position};
use tinyvec::ArrayVec;

use super::{StrategyContext, combinations::combinations};
use crate::report::{Explanation, HighlightRole};

fn subset_name(size: usize) -> &'static str {
    match size {
        2 => "pair",
        3 => "triple",
        4 => "quad",
        _ => "subset",
    }
}

/// Eliminates the digits of `size` cells that hold only `size` digits between them from
/// the rest of their house.
pub(super) fn naked_subset(ctx: &mut StrategyContext<'_>, size: usize) -> ControlFlow<()> {
    let grid = ctx.grid();
    for house in House::ALL {
        let mut cells = ArrayVec::<[Position; 9]>::new();
        for pos in house.positions() & grid.unsolved_cells() {
            if (2..=size).contains(&grid.candidate_count(pos)) {
                cells.push(pos);
            }
        }
        combinations(cells.len(), size, |picked| {
            let mask: DigitPositions = picked.iter().map(|&i| cells[i]).collect();
            let digits = grid.union_candidates(mask);
            if digits.len() != size {
                return ControlFlow::Continue(());
            }
            for digit in digits {
                ctx.propose_eliminations(house.positions() - mask, digit);
            }
            ctx.commit(|| {
                Explanation::new(format!(
                    "Naked {} {} in {house}",
                    subset_name(size),
                    format_digits(digits)
                ))
                .house(house, HighlightRole::Neutral)
                .candidates(
                    mask.iter().flat_map(|pos| {
                        (grid.candidates_at(pos) & digits)
                            .iter()
                            .map(move |d| Candidate::new(pos, d))
                    }),
                    HighlightRole::Cause,
                )
            })
        })?;
    }
    ControlFlow::Continue(())
}

/// Eliminates the other candidates of `size` cells that hold the only places of `size`
/// digits in a house.
pub(super) fn hidden_subset(ctx: &mut StrategyContext<'_>, size: usize) -> ControlFlow<()> {
    let grid = ctx.grid();
    for house in House::ALL {
        let solved = grid.digits_solved_in(house);
        let digits: Vec<Digit> = Digit::ALL
            .into_iter()
            .filter(|&d| {
                !solved.contains(d) && (2..=size).contains(&grid.house_count(house, d))
            })
            .collect();
        combinations(digits.len(), size, |picked| {
            let subset: DigitSet = picked.iter().map(|&i| digits[i]).collect();
            let mask = subset
                .iter()
                .fold(DigitPositions::EMPTY, |acc, d| acc | grid.house_positions(house, d));
            if mask.len() != size {
                return ControlFlow::Continue(());
            }
            for pos in mask {
                for digit in grid.candidates_at(pos) - subset {
                    ctx.propose_elimination(pos, digit);
                }
            }
            ctx.commit(|| {
                Explanation::new(format!(
                    "Hidden {} {} in {house}",
                    subset_name(size),
                    format_digits(subset)
                ))
                .house(house, HighlightRole::Neutral)
                .candidates(
                    mask.iter().flat_map(|pos| {
                        (grid.candidates_at(pos) & subset)
                            .iter()
                            .map(move |d| Candidate::new(pos, d))
                    }),
                    HighlightRole::Cause,
                )
            })
        })?;
    }
    ControlFlow::Continue(())
}

pub(super) fn format_digits(digits: DigitSet) -> String {
    digits.iter().map(Digit::as_char).collect()
}

#[cfg(test)]
mod tests {
    use numera_core::{CandidateGrid, Digit, Position};

    use crate::{StrategyRegistry, testing::StrategyTester};

    #[test]
    fn test_naked_pair_in_row() {
        // r1c1 and r1c2 are both {1, 2}
        let mut grid = CandidateGrid::new();
        for x in 0..2 {
            for digit in Digit::ALL.into_iter().skip(2) {
                grid.eliminate(Position::new(x, 0), digit);
            }
        }
        let registry = StrategyRegistry::standard();
        StrategyTester::new(grid)
            .apply_once(registry.get("Naked Pair").unwrap())
            .assert_removed_exact(Position::new(2, 0), [Digit::D1, Digit::D2])
            .assert_removed_exact(Position::new(8, 0), [Digit::D1, Digit::D2])
            .assert_no_change(Position::new(0, 1))
            .assert_no_change(Position::new(0, 0));
    }

    #[test]
    fn test_naked_triple_spread_over_three_cells() {
        // {1,2}, {2,3}, {1,3} in column 5
        let mut grid = CandidateGrid::new();
        let cells = [
            (0, [Digit::D1, Digit::D2]),
            (4, [Digit::D2, Digit::D3]),
            (8, [Digit::D1, Digit::D3]),
        ];
        for (y, keep) in cells {
            for digit in Digit::ALL {
                if !keep.contains(&digit) {
                    grid.eliminate(Position::new(4, y), digit);
                }
            }
        }
        let registry = StrategyRegistry::standard();
        StrategyTester::new(grid)
            .apply_once(registry.get("Naked Triple").unwrap())
            .assert_removed_exact(Position::new(4, 2), [Digit::D1, Digit::D2, Digit::D3])
            .assert_no_change(Position::new(3, 2))
            .assert_sound();
    }

    #[test]
    fn test_hidden_pair_in_box() {
        // 1 and 2 only fit in r1c1 and r2c2 inside box 1
        let mut grid = CandidateGrid::new();
        for pos in Position::BOXES[0] {
            if pos != Position::new(0, 0) && pos != Position::new(1, 1) {
                grid.eliminate(pos, Digit::D1);
                grid.eliminate(pos, Digit::D2);
            }
        }
        let registry = StrategyRegistry::standard();
        let others: Vec<Digit> = Digit::ALL.into_iter().skip(2).collect();
        StrategyTester::new(grid)
            .apply_once(registry.get("Hidden Pair").unwrap())
            .assert_removed_exact(Position::new(0, 0), others.iter().copied())
            .assert_removed_exact(Position::new(1, 1), others.iter().copied())
            .assert_no_change(Position::new(2, 2));
    }

    #[test]
    fn test_no_subset_on_empty_grid() {
        let registry = StrategyRegistry::standard();
        StrategyTester::new(CandidateGrid::new())
            .apply_once(registry.get("Naked Quad").unwrap())
            .apply_once(registry.get("Hidden Quad").unwrap())
            .assert_no_progress();
    }
}
