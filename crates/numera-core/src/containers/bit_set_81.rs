use std::{
    fmt::{self, Debug},
    hash::{Hash, Hasher},
    iter::FusedIterator,
    marker::PhantomData,
    ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, Not, Sub},
};

use crate::index::{Index81, Index81Semantics};

const MASK: u128 = (1 << 81) - 1;

/// A set of up to 81 values, stored as an 81-bit integer.
///
/// The main instance is [`DigitPositions`](crate::DigitPositions), the set of board
/// cells where a digit may still go.
pub struct BitSet81<S> {
    bits: u128,
    _semantics: PhantomData<S>,
}

impl<S> Clone for BitSet81<S> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for BitSet81<S> {}

impl<S> PartialEq for BitSet81<S> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<S> Eq for BitSet81<S> {}

impl<S> Hash for BitSet81<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl<S> Default for BitSet81<S> {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<S> Debug for BitSet81<S>
where
    S: Index81Semantics,
    S::Value: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<S> BitSet81<S> {
    /// The empty set.
    pub const EMPTY: Self = Self::from_bits(0);

    /// The set containing all 81 values.
    pub const FULL: Self = Self::from_bits(MASK);

    /// Creates an empty set.
    #[must_use]
    #[inline]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Creates a set from raw bits. Bits above bit 80 are discarded.
    #[must_use]
    #[inline]
    pub const fn from_bits(bits: u128) -> Self {
        Self {
            bits: bits & MASK,
            _semantics: PhantomData,
        }
    }

    /// Returns the raw bits of the set.
    #[must_use]
    #[inline]
    pub const fn bits(self) -> u128 {
        self.bits
    }

    /// Returns the number of values in the set.
    #[must_use]
    #[inline]
    pub const fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Returns the union of two sets.
    #[must_use]
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self::from_bits(self.bits | other.bits)
    }

    /// Returns the intersection of two sets.
    #[must_use]
    #[inline]
    pub const fn intersection(self, other: Self) -> Self {
        Self::from_bits(self.bits & other.bits)
    }

    /// Returns the values in `self` that are not in `other`.
    #[must_use]
    #[inline]
    pub const fn difference(self, other: Self) -> Self {
        Self::from_bits(self.bits & !other.bits)
    }

    /// Returns the complement of the set within the 81 values.
    #[must_use]
    #[inline]
    pub const fn complement(self) -> Self {
        Self::from_bits(!self.bits)
    }

    /// Returns `true` if every value of `self` is also in `other`.
    #[must_use]
    #[inline]
    pub const fn is_subset(self, other: Self) -> bool {
        self.bits & !other.bits == 0
    }

    /// Returns `true` if every value of `other` is also in `self`.
    #[must_use]
    #[inline]
    pub const fn is_superset(self, other: Self) -> bool {
        other.is_subset(self)
    }

    /// Returns `true` if the two sets share no value.
    #[must_use]
    #[inline]
    pub const fn is_disjoint(self, other: Self) -> bool {
        self.bits & other.bits == 0
    }
}

impl<S> BitSet81<S>
where
    S: Index81Semantics,
{
    /// Creates a set containing a single value.
    #[must_use]
    #[inline]
    pub fn from_elem(value: S::Value) -> Self {
        Self::from_bits(S::to_index(value).bit())
    }

    /// Inserts a value. Returns `true` if it was not present.
    #[inline]
    pub fn insert(&mut self, value: S::Value) -> bool {
        let bit = S::to_index(value).bit();
        let inserted = self.bits & bit == 0;
        self.bits |= bit;
        inserted
    }

    /// Removes a value. Returns `true` if it was present.
    #[inline]
    pub fn remove(&mut self, value: S::Value) -> bool {
        let bit = S::to_index(value).bit();
        let removed = self.bits & bit != 0;
        self.bits &= !bit;
        removed
    }

    /// Returns `true` if the set contains the value.
    #[must_use]
    #[inline]
    pub fn contains(self, value: S::Value) -> bool {
        self.bits & S::to_index(value).bit() != 0
    }

    /// Returns the smallest value in the set.
    #[must_use]
    #[inline]
    pub fn first(self) -> Option<S::Value> {
        self.iter().next()
    }

    /// Returns the only value if the set has exactly one element.
    #[must_use]
    #[inline]
    pub fn as_single(self) -> Option<S::Value> {
        if self.len() == 1 { self.first() } else { None }
    }

    /// Returns both values, smallest first, if the set has exactly two elements.
    #[must_use]
    #[inline]
    pub fn as_double(self) -> Option<(S::Value, S::Value)> {
        if self.len() != 2 {
            return None;
        }
        let mut iter = self.iter();
        Some((iter.next()?, iter.next()?))
    }

    /// Returns an iterator over the values in ascending index order.
    #[must_use]
    #[inline]
    pub fn iter(self) -> BitSet81Iter<S> {
        BitSet81Iter {
            bits: self.bits,
            _semantics: PhantomData,
        }
    }
}

impl<S> BitOr for BitSet81<S> {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl<S> BitOrAssign for BitSet81<S> {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl<S> BitAnd for BitSet81<S> {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        self.intersection(rhs)
    }
}

impl<S> BitAndAssign for BitSet81<S> {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        *self = self.intersection(rhs);
    }
}

impl<S> BitXor for BitSet81<S> {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        Self::from_bits(self.bits ^ rhs.bits)
    }
}

impl<S> Sub for BitSet81<S> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.difference(rhs)
    }
}

impl<S> Not for BitSet81<S> {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        self.complement()
    }
}

impl<S> FromIterator<S::Value> for BitSet81<S>
where
    S: Index81Semantics,
{
    fn from_iter<I: IntoIterator<Item = S::Value>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        set.extend(iter);
        set
    }
}

impl<S> Extend<S::Value> for BitSet81<S>
where
    S: Index81Semantics,
{
    fn extend<I: IntoIterator<Item = S::Value>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<S> IntoIterator for BitSet81<S>
where
    S: Index81Semantics,
{
    type Item = S::Value;
    type IntoIter = BitSet81Iter<S>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S> IntoIterator for &BitSet81<S>
where
    S: Index81Semantics,
{
    type Item = S::Value;
    type IntoIter = BitSet81Iter<S>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the values of a [`BitSet81`].
pub struct BitSet81Iter<S> {
    bits: u128,
    _semantics: PhantomData<S>,
}

impl<S> Clone for BitSet81Iter<S> {
    fn clone(&self) -> Self {
        Self {
            bits: self.bits,
            _semantics: PhantomData,
        }
    }
}

impl<S> Debug for BitSet81Iter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitSet81Iter")
            .field("bits", &self.bits)
            .finish()
    }
}

impl<S> Iterator for BitSet81Iter<S>
where
    S: Index81Semantics,
{
    type Item = S::Value;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        #[expect(clippy::cast_possible_truncation)]
        let index = self.bits.trailing_zeros() as u8;
        self.bits &= self.bits - 1;
        Some(S::from_index(Index81::new(index)))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.bits.count_ones() as usize;
        (len, Some(len))
    }
}

impl<S> DoubleEndedIterator for BitSet81Iter<S>
where
    S: Index81Semantics,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        #[expect(clippy::cast_possible_truncation)]
        let index = (127 - self.bits.leading_zeros()) as u8;
        self.bits &= !(1 << index);
        Some(S::from_index(Index81::new(index)))
    }
}

impl<S> ExactSizeIterator for BitSet81Iter<S> where S: Index81Semantics {}
impl<S> FusedIterator for BitSet81Iter<S> where S: Index81Semantics {}
