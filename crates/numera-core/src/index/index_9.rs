use crate::Digit;

/// An index in the range 0-8.
///
/// This type represents a valid index into a 9-element container (such as a 9-bit bitset
/// or a 9-element array). It ensures at construction time that the index is within the
/// valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Index9 {
    index: u8,
}

impl Index9 {
    /// Creates a new index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in the range 0-8.
    #[must_use]
    #[inline]
    pub const fn new(index: u8) -> Self {
        assert!(index < 9);
        Self { index }
    }

    /// Returns the underlying index value (0-8).
    #[must_use]
    #[inline]
    pub const fn index(self) -> u8 {
        self.index
    }

    #[inline]
    pub(crate) const fn bit(self) -> u16 {
        1 << self.index
    }

    /// Returns an iterator over all 9 valid indices (0-8).
    ///
    /// # Examples
    ///
    /// ```
    /// # use numera_core::index::Index9;
    /// let indices: Vec<_> = Index9::all().collect();
    /// assert_eq!(indices.len(), 9);
    /// assert_eq!(indices[8].index(), 8);
    /// ```
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0..9).map(Index9::new)
    }
}

/// Defines the semantics for mapping values to indices in 9-element containers.
///
/// This trait allows generic containers like [`BitSet9`](crate::containers::BitSet9)
/// and [`Array9`](crate::containers::Array9) to work with different value types.
/// Implementors define how user-facing values are converted to and from internal
/// indices (0-8).
pub trait Index9Semantics {
    /// The type of values stored in or used to index the container.
    type Value;

    /// Converts a value to an index.
    ///
    /// # Panics
    ///
    /// Should panic if the value cannot be represented as a valid index (0-8).
    fn to_index(value: Self::Value) -> Index9;

    /// Converts an index back to a value.
    fn from_index(index: Index9) -> Self::Value;
}

/// Semantics for digits 1-9.
///
/// Digit 1 maps to index 0, digit 2 to index 1, and so on.
///
/// # Examples
///
/// ```
/// use numera_core::{
///     Digit,
///     index::{DigitSemantics, Index9, Index9Semantics},
/// };
///
/// assert_eq!(DigitSemantics::to_index(Digit::D1).index(), 0);
/// assert_eq!(DigitSemantics::from_index(Index9::new(8)), Digit::D9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DigitSemantics;

impl Index9Semantics for DigitSemantics {
    type Value = Digit;

    #[inline]
    fn to_index(value: Self::Value) -> Index9 {
        Index9::new(value.value() - 1)
    }

    #[inline]
    fn from_index(index: Index9) -> Self::Value {
        Digit::from_value(index.index() + 1)
    }
}

/// Semantics for cell indices (0-8) within a house.
///
/// This is an identity mapping used for masks over the 9 cells of a row, column or box.
///
/// # Panics
///
/// The `to_index` method panics if a value is 9 or greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellIndexSemantics;

impl Index9Semantics for CellIndexSemantics {
    type Value = u8;

    #[inline]
    fn to_index(value: Self::Value) -> Index9 {
        assert!(value < 9, "Cell index must be 0-8, got {value}");
        Index9::new(value)
    }

    #[inline]
    fn from_index(index: Index9) -> Self::Value {
        index.index()
    }
}
