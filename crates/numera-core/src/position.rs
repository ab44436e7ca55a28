//! Board positions.

use std::fmt::{self, Display};

use crate::DigitPositions;

/// A cell on the 9x9 board.
///
/// `x` is the column and `y` is the row, both in 0-8. Boxes are numbered 0-8 left to
/// right, top to bottom, and the cells inside a box are numbered the same way.
///
/// # Examples
///
/// ```
/// use numera_core::Position;
///
/// let pos = Position::new(4, 7);
/// assert_eq!(pos.index(), 67);
/// assert_eq!(pos.box_index(), 7);
/// assert_eq!(Position::from_box(7, pos.box_cell_index()), pos);
/// assert_eq!(pos.to_string(), "r8c5");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    // field order gives row-major ordering
    y: u8,
    x: u8,
}

const fn build_all() -> [Position; 81] {
    let mut all = [Position { x: 0, y: 0 }; 81];
    let mut i = 0;
    while i < 81 {
        all[i as usize] = Position::from_index(i);
        i += 1;
    }
    all
}

const fn build_peers() -> [DigitPositions; 81] {
    let mut peers = [DigitPositions::EMPTY; 81];
    let mut i = 0;
    while i < 81 {
        let pos = Position::from_index(i);
        let mut bits = 0u128;
        let mut j = 0;
        while j < 81 {
            let other = Position::from_index(j);
            if i != j && pos.sees(other) {
                bits |= 1 << j;
            }
            j += 1;
        }
        peers[i as usize] = DigitPositions::from_bits(bits);
        i += 1;
    }
    peers
}

const PEERS: [DigitPositions; 81] = build_peers();

impl Position {
    /// All 81 positions in row-major order.
    pub const ALL: [Self; 81] = build_all();

    /// Positions grouped by row: `ROWS[y][x]`.
    pub const ROWS: [[Self; 9]; 9] = {
        let mut rows = [[Position { x: 0, y: 0 }; 9]; 9];
        let mut y = 0;
        while y < 9 {
            let mut x = 0;
            while x < 9 {
                rows[y as usize][x as usize] = Position::new(x, y);
                x += 1;
            }
            y += 1;
        }
        rows
    };

    /// Positions grouped by column: `COLUMNS[x][y]`.
    pub const COLUMNS: [[Self; 9]; 9] = {
        let mut columns = [[Position { x: 0, y: 0 }; 9]; 9];
        let mut x = 0;
        while x < 9 {
            let mut y = 0;
            while y < 9 {
                columns[x as usize][y as usize] = Position::new(x, y);
                y += 1;
            }
            x += 1;
        }
        columns
    };

    /// Positions grouped by box: `BOXES[box_index][box_cell_index]`.
    pub const BOXES: [[Self; 9]; 9] = {
        let mut boxes = [[Position { x: 0, y: 0 }; 9]; 9];
        let mut b = 0;
        while b < 9 {
            let mut i = 0;
            while i < 9 {
                boxes[b as usize][i as usize] = Position::from_box(b, i);
                i += 1;
            }
            b += 1;
        }
        boxes
    };

    /// Creates a position from a column `x` and a row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `x` or `y` is not in the range 0-8.
    #[must_use]
    #[inline]
    pub const fn new(x: u8, y: u8) -> Self {
        assert!(x < 9 && y < 9);
        Self { y, x }
    }

    /// Creates a position from its row-major index (0-80).
    ///
    /// # Panics
    ///
    /// Panics if `index` is 81 or greater.
    #[must_use]
    #[inline]
    pub const fn from_index(index: u8) -> Self {
        assert!(index < 81);
        Self::new(index % 9, index / 9)
    }

    /// Creates a position from a box index and a cell index inside the box.
    ///
    /// # Panics
    ///
    /// Panics if either index is not in the range 0-8.
    #[must_use]
    #[inline]
    pub const fn from_box(box_index: u8, cell_index: u8) -> Self {
        assert!(box_index < 9 && cell_index < 9);
        let x = (box_index % 3) * 3 + cell_index % 3;
        let y = (box_index / 3) * 3 + cell_index / 3;
        Self::new(x, y)
    }

    /// Returns the column (0-8).
    #[must_use]
    #[inline]
    pub const fn x(self) -> u8 {
        self.x
    }

    /// Returns the row (0-8).
    #[must_use]
    #[inline]
    pub const fn y(self) -> u8 {
        self.y
    }

    /// Returns the row-major index (0-80).
    #[must_use]
    #[inline]
    pub const fn index(self) -> u8 {
        self.y * 9 + self.x
    }

    /// Returns the index of the box containing this position.
    #[must_use]
    #[inline]
    pub const fn box_index(self) -> u8 {
        (self.y / 3) * 3 + self.x / 3
    }

    /// Returns the index of this position within its box.
    #[must_use]
    #[inline]
    pub const fn box_cell_index(self) -> u8 {
        (self.y % 3) * 3 + self.x % 3
    }

    /// Returns `true` if both positions share a row, column or box.
    ///
    /// A position sees itself.
    #[must_use]
    #[inline]
    pub const fn sees(self, other: Self) -> bool {
        self.x == other.x || self.y == other.y || self.box_index() == other.box_index()
    }

    /// Returns the 20 other positions sharing a house with this one.
    #[must_use]
    #[inline]
    pub const fn peers(self) -> DigitPositions {
        PEERS[self.index() as usize]
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}c{}", self.y + 1, self.x + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_round_trip() {
        for pos in Position::ALL {
            assert_eq!(Position::from_box(pos.box_index(), pos.box_cell_index()), pos);
            assert_eq!(Position::from_index(pos.index()), pos);
        }
        assert_eq!(Position::from_box(4, 0), Position::new(3, 3));
        assert_eq!(Position::from_box(8, 8), Position::new(8, 8));
    }

    #[test]
    fn test_peers() {
        for pos in Position::ALL {
            let peers = pos.peers();
            assert_eq!(peers.len(), 20);
            assert!(!peers.contains(pos));
            assert!(peers.iter().all(|p| p.sees(pos)));
        }
    }

    #[test]
    fn test_ordering_is_row_major() {
        assert!(Position::new(8, 0) < Position::new(0, 1));
        let mut sorted = Position::ALL;
        sorted.sort();
        assert_eq!(sorted, Position::ALL);
    }

    #[test]
    fn test_house_groups() {
        assert_eq!(Position::ROWS[2][5], Position::new(5, 2));
        assert_eq!(Position::COLUMNS[2][5], Position::new(2, 5));
        assert_eq!(Position::BOXES[1][3], Position::new(3, 1));
    }
}
