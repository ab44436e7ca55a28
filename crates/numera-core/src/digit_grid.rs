//! A grid of placed digits and its line notation.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use crate::{
    Digit, DigitSet, House, NotationError, Position, containers::Array81,
    index::PositionSemantics,
};

/// An 81-cell grid where each cell is empty or holds a digit.
///
/// The text form is the usual line notation: 81 characters in row-major order, digits for
/// filled cells and `.`, `0` or `_` for empty ones. Whitespace is ignored when parsing, so
/// a nine-line layout parses as well. An optional `9x9:` size prefix is accepted.
///
/// # Examples
///
/// ```
/// use numera_core::{Digit, DigitGrid, Position};
///
/// let line = ".9.2.......1..693..3.71..8.35........48..2.6...7......56....4......4.2..2...3.6.7";
/// let grid: DigitGrid = line.parse()?;
/// assert_eq!(grid.get(Position::new(1, 0)), Some(Digit::D9));
/// assert_eq!(grid.to_string(), line);
/// # Ok::<(), numera_core::NotationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DigitGrid {
    cells: Array81<Option<Digit>, PositionSemantics>,
}

impl DigitGrid {
    /// Creates an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the digit at `pos`.
    #[must_use]
    #[inline]
    pub fn get(&self, pos: Position) -> Option<Digit> {
        self.cells[pos]
    }

    /// Sets or clears the digit at `pos`.
    #[inline]
    pub fn set(&mut self, pos: Position, digit: Option<Digit>) {
        self.cells[pos] = digit;
    }

    /// Returns the number of filled cells.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|d| d.is_some()).count()
    }

    /// Returns `true` if every cell holds a digit.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Returns `true` if no house holds the same digit twice.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        House::ALL.iter().all(|house| {
            let mut seen = DigitSet::EMPTY;
            house
                .positions()
                .iter()
                .filter_map(|pos| self.get(pos))
                .all(|digit| seen.insert(digit))
        })
    }

    /// Returns `true` if the grid is full and consistent.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.is_full() && self.is_consistent()
    }

    /// Returns an iterator over `(position, digit)` for filled cells.
    pub fn filled(&self) -> impl Iterator<Item = (Position, Digit)> + '_ {
        self.cells.entries().filter_map(|(pos, d)| d.map(|d| (pos, d)))
    }

    /// Returns an iterator over the positions of empty cells.
    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .entries()
            .filter_map(|(pos, d)| d.is_none().then_some(pos))
    }
}

impl FromStr for DigitGrid {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = strip_size_prefix(s)?;
        let mut grid = Self::new();
        let mut count = 0;
        for c in body.chars().filter(|c| !c.is_whitespace()) {
            let digit = match c {
                '.' | '0' | '_' => None,
                _ => Some(Digit::from_char(c).ok_or(NotationError::InvalidCharacter {
                    index: count,
                    character: c,
                })?),
            };
            if count < 81 {
                #[expect(clippy::cast_possible_truncation)]
                grid.set(Position::from_index(count as u8), digit);
            }
            count += 1;
        }
        if count != 81 {
            return Err(NotationError::InvalidLength {
                expected: 81,
                actual: count,
            });
        }
        Ok(grid)
    }
}

/// Strips an optional `RxC:` prefix, accepting only `9x9`.
pub(crate) fn strip_size_prefix(s: &str) -> Result<&str, NotationError> {
    let Some((prefix, body)) = s.split_once(':') else {
        return Ok(s);
    };
    let size = prefix.trim();
    let is_nine = size
        .split_once(['x', 'X'])
        .is_some_and(|(rows, columns)| rows.trim() == "9" && columns.trim() == "9");
    if is_nine {
        Ok(body)
    } else {
        Err(NotationError::UnsupportedSize {
            prefix: size.to_owned(),
        })
    }
}

impl Display for DigitGrid {
    /// Writes the 81-character line. The alternate form writes nine lines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, digit) in self.cells.iter().enumerate() {
            if f.alternate() && i > 0 && i % 9 == 0 {
                writeln!(f)?;
            }
            match digit {
                Some(d) => write!(f, "{d}")?,
                None => f.write_str(".")?,
            }
        }
        Ok(())
    }
}

impl From<[[u8; 9]; 9]> for DigitGrid {
    /// Builds a grid from rows of values where 0 means empty.
    ///
    /// # Panics
    ///
    /// Panics if a value is greater than 9.
    fn from(rows: [[u8; 9]; 9]) -> Self {
        let mut grid = Self::new();
        for (pos, value) in Position::ALL.into_iter().zip(rows.into_iter().flatten()) {
            grid.set(pos, (value != 0).then(|| Digit::from_value(value)));
        }
        grid
    }
}
