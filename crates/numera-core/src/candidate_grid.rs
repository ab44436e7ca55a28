//! The candidate model: which digits may still go where.
//!
//! [`CandidateGrid`] keeps the same facts in three views so that every query a strategy
//! makes is a bit operation:
//!
//! - per cell, the [`DigitSet`] of open candidates;
//! - per digit, the [`DigitPositions`] of cells where it is open;
//! - per digit and house, the [`HouseMask`] of cell offsets where it is open.
//!
//! The views are only ever written by three private primitives: one inserts a candidate,
//! one eliminates it and one solves a cell. Each updates all views together.
//!
//! # Examples
//!
//! ```
//! use numera_core::{CandidateGrid, Digit, House, Position};
//!
//! let mut grid = CandidateGrid::new();
//! assert!(grid.assign(Position::new(4, 4), Digit::D5));
//!
//! // 5 is gone from the column of the assigned cell
//! assert!(!grid.candidates_at(Position::new(4, 5)).contains(Digit::D5));
//! assert_eq!(grid.house_count(House::Column { x: 4 }, Digit::D5), 0);
//! assert_eq!(grid.solved_at(Position::new(4, 4)), Some(Digit::D5));
//! ```

use crate::{
    Candidate, CellState, Digit, DigitGrid, DigitSet, GridState, House, Position,
    containers::{Array9, Array81, BitSet9, BitSet81},
    index::{CellIndexSemantics, DigitSemantics, PositionSemantics},
};

/// A set of board positions, usually the cells where one digit is still open.
///
/// # Examples
///
/// ```
/// use numera_core::{DigitPositions, Position};
///
/// let mut positions = DigitPositions::FULL;
/// positions.remove(Position::new(0, 0));
/// assert_eq!(positions.len(), 80);
/// ```
pub type DigitPositions = BitSet81<PositionSemantics>;

/// A set of cell offsets (0-8) inside one house.
pub type HouseMask = BitSet9<CellIndexSemantics>;

/// A contradiction found in a [`CandidateGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConsistencyError {
    /// An unsolved cell has no candidate left.
    #[display("{position} has no candidates")]
    EmptyCell {
        /// The cell.
        position: Position,
    },
    /// A digit is neither solved nor open anywhere in a house.
    #[display("digit {digit} has no place in {house}")]
    MissingDigit {
        /// The house.
        house: House,
        /// The digit.
        digit: Digit,
    },
    /// A digit is solved twice in a house.
    #[display("digit {digit} appears twice in {house}")]
    DuplicateDigit {
        /// The house.
        house: House,
        /// The digit.
        digit: Digit,
    },
}

/// The candidate model of a 9x9 board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateGrid {
    cells: Array81<DigitSet, PositionSemantics>,
    solved: Array81<Option<Digit>, PositionSemantics>,
    solved_cells: DigitPositions,
    digit_positions: Array9<DigitPositions, DigitSemantics>,
    house_masks: Array9<[HouseMask; 27], DigitSemantics>,
}

impl Default for CandidateGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateGrid {
    /// Creates a grid where every cell is open with all nine candidates.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: Array81::from_array([DigitSet::FULL; 81]),
            solved: Array81::from_array([None; 81]),
            solved_cells: DigitPositions::EMPTY,
            digit_positions: Array9::from_array([DigitPositions::FULL; 9]),
            house_masks: Array9::from_array([[HouseMask::FULL; 27]; 9]),
        }
    }

    /// Builds a grid from a snapshot, for resuming a solve mid-way.
    ///
    /// Solved cells are taken as they are. Open cells keep exactly the listed
    /// candidates, even when a solved peer would rule some of them out.
    #[must_use]
    pub fn from_state(state: &GridState) -> Self {
        let mut grid = Self::new();
        for pos in Position::ALL {
            match state.cell(pos) {
                CellState::Solved(digit) => grid.solve_raw(pos, digit),
                CellState::Candidates(set) => {
                    for digit in !set {
                        grid.eliminate_raw(pos, digit);
                    }
                }
            }
        }
        grid
    }

    /// Replaces the whole state with a snapshot.
    pub fn set_state(&mut self, state: &GridState) {
        *self = Self::from_state(state);
    }

    /// Resets to an empty board. This is the only way a solved cell becomes open again.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn eliminate_raw(&mut self, pos: Position, digit: Digit) -> bool {
        if !self.cells[pos].remove(digit) {
            return false;
        }
        self.digit_positions[digit].remove(pos);
        let masks = &mut self.house_masks[digit];
        for house in House::houses_of(pos) {
            if let Some(i) = house.cell_index_of(pos) {
                masks[usize::from(house.index())].remove(i);
            }
        }
        true
    }

    fn insert_raw(&mut self, pos: Position, digit: Digit) -> bool {
        if !self.cells[pos].insert(digit) {
            return false;
        }
        self.digit_positions[digit].insert(pos);
        let masks = &mut self.house_masks[digit];
        for house in House::houses_of(pos) {
            if let Some(i) = house.cell_index_of(pos) {
                masks[usize::from(house.index())].insert(i);
            }
        }
        true
    }

    fn solve_raw(&mut self, pos: Position, digit: Digit) {
        for other in self.cells[pos] {
            self.eliminate_raw(pos, other);
        }
        self.solved[pos] = Some(digit);
        self.solved_cells.insert(pos);
    }

    /// Solves `pos` with `digit` and removes the digit from all 20 peers.
    fn place(&mut self, pos: Position, digit: Digit) {
        self.solve_raw(pos, digit);
        for peer in pos.peers() & self.digit_positions[digit] {
            self.eliminate_raw(peer, digit);
        }
    }

    /// Assigns `digit` to `pos`.
    ///
    /// The cell's other candidates are dropped and the digit is removed from every peer.
    /// Returns `false` and changes nothing if the cell is already solved or the digit is
    /// not one of its candidates.
    pub fn assign(&mut self, pos: Position, digit: Digit) -> bool {
        if self.solved[pos].is_some() || !self.cells[pos].contains(digit) {
            return false;
        }
        self.place(pos, digit);
        true
    }

    /// Reopens one candidate, for editing a board by hand.
    ///
    /// Returns `false` and changes nothing if the cell is solved or the digit is
    /// already open there. Peers are left alone, so the result may contradict a solved
    /// peer until [`CandidateGrid::check_consistency`] is consulted.
    pub fn add_candidate(&mut self, pos: Position, digit: Digit) -> bool {
        if self.solved[pos].is_some() {
            return false;
        }
        self.insert_raw(pos, digit)
    }

    /// Removes one candidate. Returns `false` if it was not open.
    pub fn eliminate(&mut self, pos: Position, digit: Digit) -> bool {
        self.eliminate_raw(pos, digit)
    }

    /// Removes `digit` from every cell in `mask`. Returns `true` if anything changed.
    pub fn eliminate_with_mask(&mut self, mask: DigitPositions, digit: Digit) -> bool {
        let mut changed = false;
        for pos in mask & self.digit_positions[digit] {
            changed |= self.eliminate_raw(pos, digit);
        }
        changed
    }

    /// Returns the open candidates at `pos`. A solved cell has none.
    #[must_use]
    #[inline]
    pub fn candidates_at(&self, pos: Position) -> DigitSet {
        self.cells[pos]
    }

    /// Returns the number of open candidates at `pos`.
    #[must_use]
    #[inline]
    pub fn candidate_count(&self, pos: Position) -> usize {
        self.cells[pos].len()
    }

    /// Returns `true` if the candidate is open.
    #[must_use]
    #[inline]
    pub fn contains(&self, candidate: Candidate) -> bool {
        self.cells[candidate.position].contains(candidate.digit)
    }

    /// Returns the digit solved at `pos`.
    #[must_use]
    #[inline]
    pub fn solved_at(&self, pos: Position) -> Option<Digit> {
        self.solved[pos]
    }

    /// Returns `true` if `pos` is solved.
    #[must_use]
    #[inline]
    pub fn is_solved_at(&self, pos: Position) -> bool {
        self.solved_cells.contains(pos)
    }

    /// Returns every cell where `digit` is open.
    #[must_use]
    #[inline]
    pub fn digit_positions(&self, digit: Digit) -> DigitPositions {
        self.digit_positions[digit]
    }

    /// Returns the cells of `house` where `digit` is open.
    #[must_use]
    #[inline]
    pub fn house_positions(&self, house: House, digit: Digit) -> DigitPositions {
        self.digit_positions[digit] & house.positions()
    }

    /// Returns the cell offsets of `house` where `digit` is open.
    #[must_use]
    #[inline]
    pub fn house_mask(&self, house: House, digit: Digit) -> HouseMask {
        self.house_masks[digit][usize::from(house.index())]
    }

    /// Returns how many cells of `house` still have `digit` open.
    #[must_use]
    #[inline]
    pub fn house_count(&self, house: House, digit: Digit) -> usize {
        self.house_mask(house, digit).len()
    }

    /// Returns the columns of row `y` where `digit` is open.
    #[must_use]
    #[inline]
    pub fn row_mask(&self, y: u8, digit: Digit) -> HouseMask {
        self.house_mask(House::Row { y }, digit)
    }

    /// Returns the rows of column `x` where `digit` is open.
    #[must_use]
    #[inline]
    pub fn col_mask(&self, x: u8, digit: Digit) -> HouseMask {
        self.house_mask(House::Column { x }, digit)
    }

    /// Returns the box cell offsets of box `index` where `digit` is open.
    #[must_use]
    #[inline]
    pub fn box_mask(&self, index: u8, digit: Digit) -> HouseMask {
        self.house_mask(House::Box { index }, digit)
    }

    /// Returns the unsolved cells.
    #[must_use]
    #[inline]
    pub fn unsolved_cells(&self) -> DigitPositions {
        !self.solved_cells
    }

    /// Returns the solved cells.
    #[must_use]
    #[inline]
    pub fn solved_cells(&self) -> DigitPositions {
        self.solved_cells
    }

    /// Returns the number of solved cells.
    #[must_use]
    #[inline]
    pub fn solved_count(&self) -> usize {
        self.solved_cells.len()
    }

    /// Returns the number of open candidates on the whole board.
    #[must_use]
    pub fn total_candidates(&self) -> usize {
        self.digit_positions.iter().map(|p| p.len()).sum()
    }

    /// Returns the unsolved cells with exactly two candidates.
    #[must_use]
    pub fn bivalue_cells(&self) -> DigitPositions {
        self.unsolved_cells()
            .iter()
            .filter(|&pos| self.cells[pos].len() == 2)
            .collect()
    }

    /// Returns the unsolved cells whose candidates are exactly `set`.
    #[must_use]
    pub fn cells_with_exactly(&self, set: DigitSet) -> DigitPositions {
        self.unsolved_cells()
            .iter()
            .filter(|&pos| self.cells[pos] == set)
            .collect()
    }

    /// Returns the digits open in every one of `cells`.
    ///
    /// An empty `cells` yields the full set.
    #[must_use]
    pub fn common_candidates(&self, cells: DigitPositions) -> DigitSet {
        cells
            .iter()
            .fold(DigitSet::FULL, |acc, pos| acc & self.cells[pos])
    }

    /// Returns the digits open in at least one of `cells`.
    #[must_use]
    pub fn union_candidates(&self, cells: DigitPositions) -> DigitSet {
        cells
            .iter()
            .fold(DigitSet::EMPTY, |acc, pos| acc | self.cells[pos])
    }

    /// Returns the digits already solved in `house`.
    #[must_use]
    pub fn digits_solved_in(&self, house: House) -> DigitSet {
        (house.positions() & self.solved_cells)
            .iter()
            .filter_map(|pos| self.solved[pos])
            .collect()
    }

    /// Returns the peers of `pos` where `digit` is open.
    #[must_use]
    #[inline]
    pub fn open_peers(&self, pos: Position, digit: Digit) -> DigitPositions {
        pos.peers() & self.digit_positions[digit]
    }

    /// Returns `true` if every cell is solved.
    #[must_use]
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.solved_cells == DigitPositions::FULL
    }

    /// Returns `true` if every cell is solved without contradiction.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.is_complete() && self.check_consistency().is_ok()
    }

    /// Looks for a contradiction.
    ///
    /// # Errors
    ///
    /// Returns the first contradiction found: an unsolved cell without candidates, a
    /// house where a digit has no place left, or a digit solved twice in a house.
    pub fn check_consistency(&self) -> Result<(), ConsistencyError> {
        if let Some(position) = self
            .unsolved_cells()
            .iter()
            .find(|&pos| self.cells[pos].is_empty())
        {
            return Err(ConsistencyError::EmptyCell { position });
        }
        for house in House::ALL {
            let mut seen = DigitSet::EMPTY;
            for pos in house.positions() & self.solved_cells {
                if let Some(digit) = self.solved[pos]
                    && !seen.insert(digit)
                {
                    return Err(ConsistencyError::DuplicateDigit { house, digit });
                }
            }
            for digit in !seen {
                if self.house_mask(house, digit).is_empty() {
                    return Err(ConsistencyError::MissingDigit { house, digit });
                }
            }
        }
        Ok(())
    }

    /// Asserts that the three views describe the same candidates.
    ///
    /// # Panics
    ///
    /// Panics on any disagreement, which would be a bug in this type.
    pub fn verify_agreement(&self) {
        for pos in Position::ALL {
            let set = self.cells[pos];
            if self.solved_cells.contains(pos) {
                assert!(self.solved[pos].is_some(), "{pos} marked solved without digit");
                assert!(set.is_empty(), "solved cell {pos} keeps candidates {set:?}");
            } else {
                assert!(self.solved[pos].is_none(), "{pos} has digit but is open");
            }
            for digit in Digit::ALL {
                let in_cell = set.contains(digit);
                assert_eq!(
                    in_cell,
                    self.digit_positions[digit].contains(pos),
                    "board view disagrees for {pos} digit {digit}"
                );
                for house in House::houses_of(pos) {
                    let i = house.cell_index_of(pos).unwrap_or(0);
                    assert_eq!(
                        in_cell,
                        self.house_mask(house, digit).contains(i),
                        "{house} view disagrees for {pos} digit {digit}"
                    );
                }
            }
        }
    }

    /// Takes an immutable copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> GridState {
        let mut cells = [CellState::Candidates(DigitSet::EMPTY); 81];
        for (cell, pos) in cells.iter_mut().zip(Position::ALL) {
            *cell = match self.solved[pos] {
                Some(digit) => CellState::Solved(digit),
                None => CellState::Candidates(self.cells[pos]),
            };
        }
        GridState::from_cells(cells)
    }

    /// Returns the solved digits.
    #[must_use]
    pub fn to_digit_grid(&self) -> DigitGrid {
        let mut grid = DigitGrid::new();
        for pos in self.solved_cells {
            grid.set(pos, self.solved[pos]);
        }
        grid
    }
}

impl From<&DigitGrid> for CandidateGrid {
    /// Places every given and propagates it to its peers.
    ///
    /// Givens that clash are all placed, leaving a contradiction that
    /// [`CandidateGrid::check_consistency`] reports.
    fn from(digits: &DigitGrid) -> Self {
        let mut grid = Self::new();
        for (pos, digit) in digits.filled() {
            grid.place(pos, digit);
        }
        grid
    }
}

impl From<&GridState> for CandidateGrid {
    fn from(state: &GridState) -> Self {
        Self::from_state(state)
    }
}
