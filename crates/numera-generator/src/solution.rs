use numera_core::{Digit, DigitGrid, DigitSet, Position};
use numera_solver::{Backtracker, PossibilitiesGiver};
use rand::{Rng, seq::SliceRandom as _};

use crate::PuzzleSeed;

/// Tries every digit in every cell, each cell in its own random order.
#[derive(Debug, Clone)]
pub struct ShuffledDigits {
    orders: [[Digit; 9]; 81],
}

impl ShuffledDigits {
    /// Draws one digit order per cell from `rng`.
    #[must_use]
    pub fn new<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut orders = [Digit::ALL; 81];
        for order in &mut orders {
            order.shuffle(rng);
        }
        Self { orders }
    }
}

impl PossibilitiesGiver for ShuffledDigits {
    fn possibilities(&self, _pos: Position) -> DigitSet {
        DigitSet::FULL
    }

    fn order(&self, pos: Position) -> [Digit; 9] {
        self.orders[usize::from(pos.index())]
    }
}

/// Builds the solved grid a seed stands for.
///
/// The same seed always yields the same grid.
///
/// # Examples
///
/// ```
/// use numera_generator::{PuzzleSeed, generate_solution};
///
/// let seed = PuzzleSeed::from_phrase("solution");
/// let solution = generate_solution(seed);
/// assert!(solution.is_solved());
/// assert_eq!(solution, generate_solution(seed));
/// ```
#[must_use]
pub fn generate_solution(seed: PuzzleSeed) -> DigitGrid {
    let mut rng = seed.rng();
    solve_shuffled(&mut rng)
}

pub(crate) fn solve_shuffled<R>(rng: &mut R) -> DigitGrid
where
    R: Rng + ?Sized,
{
    let backtracker = Backtracker::with_giver(ShuffledDigits::new(rng));
    let Some(solution) = backtracker.first_solution(&DigitGrid::new()) else {
        unreachable!("the empty grid always has a solution");
    };
    solution
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeds_give_different_solutions() {
        let a = generate_solution(PuzzleSeed::from_phrase("left"));
        let b = generate_solution(PuzzleSeed::from_phrase("right"));
        assert!(a.is_solved());
        assert!(b.is_solved());
        assert_ne!(a, b);
    }

    #[test]
    fn test_order_is_a_permutation() {
        let giver = ShuffledDigits::new(&mut PuzzleSeed::from_phrase("order").rng());
        for pos in Position::ALL {
            let order = giver.order(pos);
            let set: DigitSet = order.into_iter().collect();
            assert_eq!(set, DigitSet::FULL, "{pos}");
        }
    }
}
