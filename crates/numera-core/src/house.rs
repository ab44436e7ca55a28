use std::{
    fmt::{self, Display},
    iter::FusedIterator,
};

use crate::{
    Digit, DigitPositions, Position,
    index::{DigitSemantics, Index9, Index9Semantics as _},
};

/// A house: a row, column or 3×3 box that holds each digit exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum House {
    /// A row identified by its y coordinate (0-8).
    Row {
        /// Row index (0-8).
        y: u8,
    },
    /// A column identified by its x coordinate (0-8).
    Column {
        /// Column index (0-8).
        x: u8,
    },
    /// A 3×3 box identified by its index (0-8, left to right, top to bottom).
    Box {
        /// Box index (0-8).
        index: u8,
    },
}

const fn build_house_positions() -> [DigitPositions; 27] {
    let mut table = [DigitPositions::EMPTY; 27];
    let mut i = 0;
    while i < 81 {
        let pos = Position::from_index(i);
        let bit = 1u128 << i;
        let row = pos.y() as usize;
        let column = 9 + pos.x() as usize;
        let boxed = 18 + pos.box_index() as usize;
        table[row] = DigitPositions::from_bits(table[row].bits() | bit);
        table[column] = DigitPositions::from_bits(table[column].bits() | bit);
        table[boxed] = DigitPositions::from_bits(table[boxed].bits() | bit);
        i += 1;
    }
    table
}

const HOUSE_POSITIONS: [DigitPositions; 27] = build_house_positions();

impl House {
    /// All rows (0-8).
    pub const ROWS: [Self; 9] = {
        let mut rows = [Self::Row { y: 0 }; 9];
        let mut i = 0;
        while i < 9 {
            rows[i as usize] = Self::Row { y: i };
            i += 1;
        }
        rows
    };

    /// All columns (0-8).
    pub const COLUMNS: [Self; 9] = {
        let mut columns = [Self::Column { x: 0 }; 9];
        let mut i = 0;
        while i < 9 {
            columns[i as usize] = Self::Column { x: i };
            i += 1;
        }
        columns
    };

    /// All boxes (0-8).
    pub const BOXES: [Self; 9] = {
        let mut boxes = [Self::Box { index: 0 }; 9];
        let mut i = 0;
        while i < 9 {
            boxes[i as usize] = Self::Box { index: i };
            i += 1;
        }
        boxes
    };

    /// All 27 houses in row, column, box order.
    pub const ALL: [Self; 27] = {
        let mut all = [Self::Row { y: 0 }; 27];
        let mut i = 0;
        while i < 9 {
            all[i as usize] = Self::Row { y: i };
            all[i as usize + 9] = Self::Column { x: i };
            all[i as usize + 18] = Self::Box { index: i };
            i += 1;
        }
        all
    };

    /// Returns the house with the given index in [`House::ALL`] order.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 27 or greater.
    #[must_use]
    #[inline]
    pub const fn from_index(index: u8) -> Self {
        Self::ALL[index as usize]
    }

    /// Returns the index of this house in [`House::ALL`] order (0-26).
    #[must_use]
    #[inline]
    pub const fn index(self) -> u8 {
        match self {
            House::Row { y } => y,
            House::Column { x } => 9 + x,
            House::Box { index } => 18 + index,
        }
    }

    /// Converts a cell index within the house (0-8) into an absolute [`Position`].
    ///
    /// # Panics
    ///
    /// Panics if `i` is not in the range 0-8.
    #[must_use]
    #[inline]
    pub const fn position_from_cell_index(self, i: u8) -> Position {
        assert!(i < 9);
        match self {
            House::Row { y } => Position::new(i, y),
            House::Column { x } => Position::new(x, i),
            House::Box { index } => Position::from_box(index, i),
        }
    }

    /// Returns the cell index of `pos` inside this house, or `None` if `pos` lies outside.
    #[must_use]
    #[inline]
    pub const fn cell_index_of(self, pos: Position) -> Option<u8> {
        match self {
            House::Row { y } if pos.y() == y => Some(pos.x()),
            House::Column { x } if pos.x() == x => Some(pos.y()),
            House::Box { index } if pos.box_index() == index => Some(pos.box_cell_index()),
            _ => None,
        }
    }

    /// Returns the row, column and box containing `pos`, in that order.
    #[must_use]
    #[inline]
    pub const fn houses_of(pos: Position) -> [Self; 3] {
        [
            Self::Row { y: pos.y() },
            Self::Column { x: pos.x() },
            Self::Box {
                index: pos.box_index(),
            },
        ]
    }

    /// Returns all positions contained in this house.
    #[must_use]
    #[inline]
    pub const fn positions(self) -> DigitPositions {
        HOUSE_POSITIONS[self.index() as usize]
    }

    /// Returns `true` if `pos` lies in this house.
    #[must_use]
    #[inline]
    pub fn contains(self, pos: Position) -> bool {
        self.positions().contains(pos)
    }

    /// Returns `true` for rows and columns.
    #[must_use]
    #[inline]
    pub const fn is_line(self) -> bool {
        !matches!(self, House::Box { .. })
    }
}

impl Display for House {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            House::Row { y } => write!(f, "row {}", y + 1),
            House::Column { x } => write!(f, "column {}", x + 1),
            House::Box { index } => write!(f, "box {}", index + 1),
        }
    }
}

/// Returns an iterator over all `(Digit, House)` pairs.
///
/// The iteration order is digit-major: for each digit in [`Digit::ALL`], it yields every
/// house in [`House::ALL`] order.
#[must_use]
#[inline]
pub fn all_digit_houses() -> AllDigitHouses {
    AllDigitHouses {
        front: 0,
        back: 9 * 27,
    }
}

/// Iterator over all `(Digit, House)` pairs.
#[derive(Debug, Clone)]
pub struct AllDigitHouses {
    front: u16,
    back: u16,
}

impl AllDigitHouses {
    #[inline]
    fn item_at(linear: u16) -> (Digit, House) {
        debug_assert!(linear < 9 * 27);
        #[expect(clippy::cast_possible_truncation)]
        let (digit, house) = ((linear / 27) as u8, (linear % 27) as u8);
        (
            DigitSemantics::from_index(Index9::new(digit)),
            House::from_index(house),
        )
    }
}

impl Iterator for AllDigitHouses {
    type Item = (Digit, House);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let item = Self::item_at(self.front);
        self.front += 1;
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::from(self.back.saturating_sub(self.front));
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for AllDigitHouses {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(Self::item_at(self.back))
    }
}

impl FusedIterator for AllDigitHouses {}
impl ExactSizeIterator for AllDigitHouses {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_digit_houses_iterator_order() {
        let mut iter = all_digit_houses();
        assert_eq!(iter.next(), Some((Digit::D1, House::Row { y: 0 })));
        assert_eq!(iter.next_back(), Some((Digit::D9, House::Box { index: 8 })));
        assert_eq!(iter.len(), 9 * 27 - 2);
    }

    #[test]
    fn test_index_round_trip() {
        for (i, house) in (0..).zip(House::ALL) {
            assert_eq!(house.index(), i);
            assert_eq!(House::from_index(i), house);
            assert_eq!(house.positions().len(), 9);
        }
    }

    #[test]
    fn test_cell_index_of_matches_position_from_cell_index() {
        for house in House::ALL {
            for i in 0..9 {
                let pos = house.position_from_cell_index(i);
                assert_eq!(house.cell_index_of(pos), Some(i));
                assert!(house.contains(pos));
            }
        }
        assert_eq!(House::Row { y: 0 }.cell_index_of(Position::new(0, 1)), None);
    }

    #[test]
    fn test_houses_of() {
        let pos = Position::new(5, 7);
        let houses = House::houses_of(pos);
        assert_eq!(
            houses,
            [House::Row { y: 7 }, House::Column { x: 5 }, House::Box { index: 7 }]
        );
        assert!(houses.iter().all(|h| h.contains(pos)));
    }
}
