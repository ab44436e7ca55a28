use crate::Position;

/// An index in the range 0-80, in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Index81 {
    index: u8,
}

impl Index81 {
    /// Creates a new index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in the range 0-80.
    #[must_use]
    #[inline]
    pub const fn new(index: u8) -> Self {
        assert!(index < 81);
        Self { index }
    }

    /// Returns the underlying index value (0-80).
    #[must_use]
    #[inline]
    pub const fn index(self) -> u8 {
        self.index
    }

    #[inline]
    pub(crate) const fn bit(self) -> u128 {
        1 << self.index
    }

    /// Returns an iterator over all 81 valid indices.
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0..81).map(Index81::new)
    }
}

/// Defines the semantics for mapping values to indices in 81-element containers.
pub trait Index81Semantics {
    /// The type of values stored in or used to index the container.
    type Value;

    /// Converts a value to an index.
    fn to_index(value: Self::Value) -> Index81;

    /// Converts an index back to a value.
    fn from_index(index: Index81) -> Self::Value;
}

/// Semantics that map a [`Position`] to its row-major board index.
///
/// # Examples
///
/// ```
/// use numera_core::{
///     Position,
///     index::{Index81Semantics, PositionSemantics},
/// };
///
/// let idx = PositionSemantics::to_index(Position::new(4, 4));
/// assert_eq!(idx.index(), 40);
/// assert_eq!(PositionSemantics::from_index(idx), Position::new(4, 4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionSemantics;

impl Index81Semantics for PositionSemantics {
    type Value = Position;

    #[inline]
    fn to_index(value: Self::Value) -> Index81 {
        Index81::new(value.index())
    }

    #[inline]
    fn from_index(index: Index81) -> Self::Value {
        Position::from_index(index.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_semantics_covers_board() {
        for (i, index) in (0..).zip(Index81::all()) {
            let pos = PositionSemantics::from_index(index);
            assert_eq!(pos, Position::new(i % 9, i / 9));
            assert_eq!(PositionSemantics::to_index(pos), index);
        }
    }
}
