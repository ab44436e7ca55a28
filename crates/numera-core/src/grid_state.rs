//! Immutable snapshots of the full solving state.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use crate::{
    Candidate, Digit, DigitGrid, DigitSet, NotationError, Position, containers::Array81,
    digit_grid::strip_size_prefix, index::PositionSemantics,
};

const BASE32_ALPHABET: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";

/// The state of one cell in a [`GridState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    /// The cell holds a digit.
    Solved(Digit),
    /// The cell is open with these candidates.
    Candidates(DigitSet),
}

impl CellState {
    /// Returns the solved digit, if any.
    #[must_use]
    #[inline]
    pub const fn solved(self) -> Option<Digit> {
        match self {
            CellState::Solved(digit) => Some(digit),
            CellState::Candidates(_) => None,
        }
    }

    /// Returns the open candidates, or an empty set for a solved cell.
    #[must_use]
    #[inline]
    pub const fn candidates(self) -> DigitSet {
        match self {
            CellState::Solved(_) => DigitSet::EMPTY,
            CellState::Candidates(set) => set,
        }
    }

    fn to_bits(self) -> u16 {
        match self {
            CellState::Solved(digit) => (1 << digit.value()) | 1,
            CellState::Candidates(set) => set.bits() << 1,
        }
    }

    fn from_bits(index: usize, value: u16) -> Result<Self, NotationError> {
        let digits = DigitSet::from_bits(value >> 1);
        if value & 1 == 1 {
            digits
                .as_single()
                .map(CellState::Solved)
                .ok_or(NotationError::InvalidCellValue { index, value })
        } else if digits.is_empty() {
            Err(NotationError::EmptyCell { index })
        } else {
            Ok(CellState::Candidates(digits))
        }
    }
}

/// A copy of solved digits and open candidates for every cell.
///
/// Reports are built against a `GridState` taken before a commit, and the full-state
/// text form is how a caller restores a position mid-solve.
///
/// The text form is 162 characters, two base-32 characters (`0-9a-v`) per cell in
/// row-major order. The 10-bit value `hi << 5 | lo` has bit 0 set for a solved cell and
/// bit `d` set for digit `d`.
///
/// # Examples
///
/// ```
/// use numera_core::{CandidateGrid, CellState, Digit, GridState, Position};
///
/// let mut grid = CandidateGrid::new();
/// grid.assign(Position::new(0, 0), Digit::D1);
/// let state = grid.snapshot();
/// assert_eq!(state.cell(Position::new(0, 0)), CellState::Solved(Digit::D1));
///
/// let text = state.to_string();
/// assert_eq!(text.len(), 162);
/// assert!(text.starts_with("03"));
/// assert_eq!(text.parse::<GridState>()?, state);
/// # Ok::<(), numera_core::NotationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    cells: Array81<CellState, PositionSemantics>,
}

impl Default for GridState {
    /// An empty board with every candidate open.
    fn default() -> Self {
        Self::from_cells([CellState::Candidates(DigitSet::FULL); 81])
    }
}

impl GridState {
    /// Creates a state from individual cells.
    #[must_use]
    pub fn from_cells(cells: [CellState; 81]) -> Self {
        Self {
            cells: Array81::from_array(cells),
        }
    }

    /// Returns the cell at `pos`.
    #[must_use]
    #[inline]
    pub fn cell(&self, pos: Position) -> CellState {
        self.cells[pos]
    }

    /// Returns the solved digit at `pos`.
    #[must_use]
    #[inline]
    pub fn solved_at(&self, pos: Position) -> Option<Digit> {
        self.cells[pos].solved()
    }

    /// Returns the open candidates at `pos`.
    #[must_use]
    #[inline]
    pub fn candidates_at(&self, pos: Position) -> DigitSet {
        self.cells[pos].candidates()
    }

    /// Returns `true` if the candidate is open in this state.
    #[must_use]
    #[inline]
    pub fn contains(&self, candidate: Candidate) -> bool {
        self.candidates_at(candidate.position)
            .contains(candidate.digit)
    }

    /// Returns the number of solved cells.
    #[must_use]
    pub fn solved_count(&self) -> usize {
        self.cells.iter().filter(|c| c.solved().is_some()).count()
    }

    /// Returns the solved digits as a [`DigitGrid`].
    #[must_use]
    pub fn to_digit_grid(&self) -> DigitGrid {
        let mut grid = DigitGrid::new();
        for (pos, cell) in self.cells.entries() {
            grid.set(pos, cell.solved());
        }
        grid
    }
}

impl Display for GridState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            let bits = cell.to_bits();
            let hi = BASE32_ALPHABET[usize::from(bits >> 5)];
            let lo = BASE32_ALPHABET[usize::from(bits & 0x1f)];
            write!(f, "{}{}", char::from(hi), char::from(lo))?;
        }
        Ok(())
    }
}

fn base32_value(index: usize, c: char) -> Result<u16, NotationError> {
    let value = match c {
        '0'..='9' => u16::from(c as u8 - b'0'),
        'a'..='v' => u16::from(c as u8 - b'a') + 10,
        'A'..='V' => u16::from(c as u8 - b'A') + 10,
        _ => {
            return Err(NotationError::InvalidCharacter {
                index,
                character: c,
            });
        }
    };
    Ok(value)
}

impl FromStr for GridState {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = strip_size_prefix(s)?
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if chars.len() != 162 {
            return Err(NotationError::InvalidLength {
                expected: 162,
                actual: chars.len(),
            });
        }
        let mut cells = [CellState::Candidates(DigitSet::FULL); 81];
        for (index, (cell, pair)) in cells.iter_mut().zip(chars.chunks_exact(2)).enumerate() {
            let hi = base32_value(index, pair[0])?;
            let lo = base32_value(index, pair[1])?;
            *cell = CellState::from_bits(index, (hi << 5) | lo)?;
        }
        Ok(Self::from_cells(cells))
    }
}

impl From<&DigitGrid> for GridState {
    /// Builds a state where givens are solved and every other cell is fully open.
    ///
    /// No candidate is removed, so peers of givens still list the given digits.
    fn from(grid: &DigitGrid) -> Self {
        let mut cells = [CellState::Candidates(DigitSet::FULL); 81];
        for (pos, digit) in grid.filled() {
            cells[usize::from(pos.index())] = CellState::Solved(digit);
        }
        Self::from_cells(cells)
    }
}
