use std::collections::VecDeque;

use numera_core::{Candidate, CandidateGrid, CandidateSet, Digit, House, Position};

use super::{Polarity, STATE_COUNT, UNVISITED, state_from_index, state_index, to_u16};
use crate::graph::{LinkGraph, LinkStrength};

/// Why a hypothesis failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Contradiction {
    /// A candidate was forced both on and off.
    #[display("{_0} is both true and false")]
    Both(Candidate),
    /// Every candidate of an unsolved cell was forced off.
    #[display("{_0} has no candidate left")]
    EmptyCell(Position),
    /// Every position of a digit in a house was forced off.
    #[display("digit {digit} has no place left in {house}")]
    EmptyHouse {
        /// The house.
        house: House,
        /// The digit.
        digit: Digit,
    },
}

/// Everything one hypothesis forces.
///
/// Propagation turns every candidate excluded by an on candidate off, turns the strong
/// partners of an off candidate on, and turns on the last candidate left in a cell or the
/// last position left for a digit in a house. It stops at the first contradiction.
#[derive(Clone)]
pub struct Coloring {
    seed: Candidate,
    polarity: Polarity,
    on: CandidateSet,
    off: CandidateSet,
    cause: Box<[u16]>,
    contradiction: Option<Contradiction>,
}

impl std::fmt::Debug for Coloring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coloring")
            .field("seed", &self.seed)
            .field("polarity", &self.polarity)
            .field("on", &self.on.len())
            .field("off", &self.off.len())
            .field("contradiction", &self.contradiction)
            .finish()
    }
}

impl Coloring {
    /// Propagates `seed` with `polarity` over `grid`, using the links of `graph` on top of
    /// the rules of the grid itself.
    #[must_use]
    pub fn propagate(
        grid: &CandidateGrid,
        graph: &LinkGraph,
        seed: Candidate,
        polarity: Polarity,
    ) -> Self {
        let mut coloring = Self {
            seed,
            polarity,
            on: CandidateSet::EMPTY,
            off: CandidateSet::EMPTY,
            cause: vec![UNVISITED; STATE_COUNT].into_boxed_slice(),
            contradiction: None,
        };
        let mut queue = VecDeque::new();
        coloring.mark(seed, polarity, None, &mut queue);
        while let Some((candidate, polarity)) = queue.pop_front() {
            if coloring.contradiction.is_some() {
                break;
            }
            let cause = Some(state_index(candidate, polarity));
            match polarity {
                Polarity::On => {
                    let Candidate { position, digit } = candidate;
                    for other in grid.candidates_at(position) {
                        if other != digit {
                            let other = Candidate::new(position, other);
                            coloring.mark(other, Polarity::Off, cause, &mut queue);
                        }
                    }
                    for peer in grid.open_peers(position, digit) {
                        let peer = Candidate::new(peer, digit);
                        coloring.mark(peer, Polarity::Off, cause, &mut queue);
                    }
                    for other in graph.neighbors(candidate, LinkStrength::Weak) {
                        coloring.mark(other, Polarity::Off, cause, &mut queue);
                    }
                }
                Polarity::Off => {
                    for other in graph.neighbors(candidate, LinkStrength::Strong) {
                        coloring.mark(other, Polarity::On, cause, &mut queue);
                    }
                    coloring.check_cell(grid, candidate.position, cause, &mut queue);
                    for house in House::houses_of(candidate.position) {
                        coloring.check_house(grid, house, candidate.digit, cause, &mut queue);
                    }
                }
            }
        }
        coloring
    }

    fn mark(
        &mut self,
        candidate: Candidate,
        polarity: Polarity,
        cause: Option<usize>,
        queue: &mut VecDeque<(Candidate, Polarity)>,
    ) {
        if self.contradiction.is_some() {
            return;
        }
        let (same, opposite) = match polarity {
            Polarity::On => (&mut self.on, &self.off),
            Polarity::Off => (&mut self.off, &self.on),
        };
        if opposite.contains(candidate) {
            self.contradiction = Some(Contradiction::Both(candidate));
            return;
        }
        if !same.insert(candidate) {
            return;
        }
        if let Some(cause) = cause {
            self.cause[state_index(candidate, polarity)] = to_u16(cause);
        }
        queue.push_back((candidate, polarity));
    }

    fn check_cell(
        &mut self,
        grid: &CandidateGrid,
        position: Position,
        cause: Option<usize>,
        queue: &mut VecDeque<(Candidate, Polarity)>,
    ) {
        let off = &self.off;
        let mut remaining = grid
            .candidates_at(position)
            .iter()
            .map(|digit| Candidate::new(position, digit))
            .filter(|&c| !off.contains(c));
        let remaining = (remaining.next(), remaining.next());
        match remaining {
            (None, _) => self.contradiction = Some(Contradiction::EmptyCell(position)),
            (Some(last), None) => self.mark(last, Polarity::On, cause, queue),
            _ => {}
        }
    }

    fn check_house(
        &mut self,
        grid: &CandidateGrid,
        house: House,
        digit: Digit,
        cause: Option<usize>,
        queue: &mut VecDeque<(Candidate, Polarity)>,
    ) {
        if grid.digits_solved_in(house).contains(digit) {
            return;
        }
        let off = &self.off;
        let mut remaining = grid
            .house_positions(house, digit)
            .iter()
            .map(|pos| Candidate::new(pos, digit))
            .filter(|&c| !off.contains(c));
        let remaining = (remaining.next(), remaining.next());
        match remaining {
            (None, _) => self.contradiction = Some(Contradiction::EmptyHouse { house, digit }),
            (Some(last), None) => self.mark(last, Polarity::On, cause, queue),
            _ => {}
        }
    }

    /// Returns the hypothesis candidate.
    #[must_use]
    pub fn seed(&self) -> Candidate {
        self.seed
    }

    /// Returns the hypothesis polarity.
    #[must_use]
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Returns the candidates forced on, the seed included when it is assumed on.
    #[must_use]
    pub fn on(&self) -> &CandidateSet {
        &self.on
    }

    /// Returns the candidates forced off.
    #[must_use]
    pub fn off(&self) -> &CandidateSet {
        &self.off
    }

    /// Returns the polarity forced on `candidate`, if any.
    #[must_use]
    pub fn status(&self, candidate: Candidate) -> Option<Polarity> {
        if self.on.contains(candidate) {
            Some(Polarity::On)
        } else if self.off.contains(candidate) {
            Some(Polarity::Off)
        } else {
            None
        }
    }

    /// Returns the contradiction the hypothesis ran into.
    #[must_use]
    pub fn contradiction(&self) -> Option<Contradiction> {
        self.contradiction
    }

    /// Returns `true` if the hypothesis is impossible.
    #[must_use]
    pub fn is_contradictory(&self) -> bool {
        self.contradiction.is_some()
    }

    /// Returns the implications leading from the seed to the state, seed first.
    #[must_use]
    pub fn path_to(
        &self,
        candidate: Candidate,
        polarity: Polarity,
    ) -> Option<Vec<(Candidate, Polarity)>> {
        let reached = match polarity {
            Polarity::On => &self.on,
            Polarity::Off => &self.off,
        };
        if !reached.contains(candidate) {
            return None;
        }
        let mut index = state_index(candidate, polarity);
        let mut path = vec![(candidate, polarity)];
        while self.cause[index] != UNVISITED {
            index = usize::from(self.cause[index]);
            path.push(state_from_index(index));
        }
        path.reverse();
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use numera_core::DigitGrid;

    use super::*;
    use crate::graph::LinkRules;

    fn grid() -> CandidateGrid {
        let digits: DigitGrid = "
            ..3.2.6..
            9..3.5..1
            ..18.64..
            ..81.29..
            7.......8
            ..67.82..
            ..26.95..
            8..2.3..9
            ..5.1.3..
        "
        .parse()
        .unwrap();
        CandidateGrid::from(&digits)
    }

    #[test]
    fn test_true_candidate_is_consistent() {
        // r1c1 is 4 in the unique solution
        let grid = grid();
        let graph = LinkGraph::build(&grid, LinkRules::STANDARD);
        let seed = Candidate::new(Position::new(0, 0), Digit::D4);
        let coloring = Coloring::propagate(&grid, &graph, seed, Polarity::On);
        assert!(!coloring.is_contradictory());
        assert_eq!(coloring.status(seed), Some(Polarity::On));
        for off in coloring.off() {
            let path = coloring.path_to(off, Polarity::Off).unwrap();
            assert_eq!(path[0], (seed, Polarity::On));
        }
    }

    #[test]
    fn test_false_candidate_contradicts() {
        // 5 at r1c1 leaves no place for 7 in row 7
        let grid = grid();
        let graph = LinkGraph::build(&grid, LinkRules::STANDARD);
        let seed = Candidate::new(Position::new(0, 0), Digit::D5);
        assert!(grid.contains(seed));
        let coloring = Coloring::propagate(&grid, &graph, seed, Polarity::On);
        assert!(coloring.is_contradictory(), "{coloring:?}");
    }
}
