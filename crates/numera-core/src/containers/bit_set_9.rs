use std::{
    fmt::{self, Debug},
    hash::{Hash, Hasher},
    iter::FusedIterator,
    marker::PhantomData,
    ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, Not, Sub},
};

use crate::index::{Index9, Index9Semantics};

const MASK: u16 = 0x1ff;

/// A set of up to 9 values, stored as a 9-bit integer.
///
/// The mapping between values and bits is defined by the semantics type `S`.
/// All operations are O(1).
///
/// # Examples
///
/// ```
/// use numera_core::{Digit, DigitSet};
///
/// let a = DigitSet::from_iter([Digit::D1, Digit::D2, Digit::D3]);
/// let b = DigitSet::from_iter([Digit::D2, Digit::D3, Digit::D4]);
///
/// assert_eq!((a | b).len(), 4);
/// assert_eq!(a & b, DigitSet::from_iter([Digit::D2, Digit::D3]));
/// assert_eq!(a.difference(b), DigitSet::from_elem(Digit::D1));
/// ```
pub struct BitSet9<S> {
    bits: u16,
    _semantics: PhantomData<S>,
}

impl<S> Clone for BitSet9<S> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for BitSet9<S> {}

impl<S> PartialEq for BitSet9<S> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<S> Eq for BitSet9<S> {}

impl<S> Hash for BitSet9<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl<S> Default for BitSet9<S> {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<S> Debug for BitSet9<S>
where
    S: Index9Semantics,
    S::Value: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<S> BitSet9<S> {
    /// The empty set.
    pub const EMPTY: Self = Self::from_bits(0);

    /// The set containing all 9 values.
    pub const FULL: Self = Self::from_bits(MASK);

    /// Creates an empty set.
    #[must_use]
    #[inline]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Creates a set from raw bits. Bits above bit 8 are discarded.
    #[must_use]
    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        Self {
            bits: bits & MASK,
            _semantics: PhantomData,
        }
    }

    /// Returns the raw bits of the set.
    #[must_use]
    #[inline]
    pub const fn bits(self) -> u16 {
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

    /// Returns the values in exactly one of the two sets.
    #[must_use]
    #[inline]
    pub const fn symmetric_difference(self, other: Self) -> Self {
        Self::from_bits(self.bits ^ other.bits)
    }

    /// Returns the complement of the set within the 9 values.
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

impl<S> BitSet9<S>
where
    S: Index9Semantics,
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

    /// Returns the largest value in the set.
    #[must_use]
    #[inline]
    pub fn last(self) -> Option<S::Value> {
        self.iter().next_back()
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
        let first = iter.next()?;
        let second = iter.next()?;
        Some((first, second))
    }

    /// Returns an iterator over the values in ascending index order.
    #[must_use]
    #[inline]
    pub fn iter(self) -> BitSet9Iter<S> {
        BitSet9Iter {
            bits: self.bits,
            _semantics: PhantomData,
        }
    }
}

impl<S> BitOr for BitSet9<S> {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl<S> BitOrAssign for BitSet9<S> {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl<S> BitAnd for BitSet9<S> {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        self.intersection(rhs)
    }
}

impl<S> BitAndAssign for BitSet9<S> {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        *self = self.intersection(rhs);
    }
}

impl<S> BitXor for BitSet9<S> {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        self.symmetric_difference(rhs)
    }
}

impl<S> Sub for BitSet9<S> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.difference(rhs)
    }
}

impl<S> Not for BitSet9<S> {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        self.complement()
    }
}

impl<S> FromIterator<S::Value> for BitSet9<S>
where
    S: Index9Semantics,
{
    fn from_iter<I: IntoIterator<Item = S::Value>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        set.extend(iter);
        set
    }
}

impl<S> Extend<S::Value> for BitSet9<S>
where
    S: Index9Semantics,
{
    fn extend<I: IntoIterator<Item = S::Value>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<S> IntoIterator for BitSet9<S>
where
    S: Index9Semantics,
{
    type Item = S::Value;
    type IntoIter = BitSet9Iter<S>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S> IntoIterator for &BitSet9<S>
where
    S: Index9Semantics,
{
    type Item = S::Value;
    type IntoIter = BitSet9Iter<S>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the values of a [`BitSet9`].
pub struct BitSet9Iter<S> {
    bits: u16,
    _semantics: PhantomData<S>,
}

impl<S> Clone for BitSet9Iter<S> {
    fn clone(&self) -> Self {
        Self {
            bits: self.bits,
            _semantics: PhantomData,
        }
    }
}

impl<S> Debug for BitSet9Iter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitSet9Iter")
            .field("bits", &self.bits)
            .finish()
    }
}

impl<S> Iterator for BitSet9Iter<S>
where
    S: Index9Semantics,
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
        Some(S::from_index(Index9::new(index)))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.bits.count_ones() as usize;
        (len, Some(len))
    }
}

impl<S> DoubleEndedIterator for BitSet9Iter<S>
where
    S: Index9Semantics,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        #[expect(clippy::cast_possible_truncation)]
        let index = (15 - self.bits.leading_zeros()) as u8;
        self.bits &= !(1 << index);
        Some(S::from_index(Index9::new(index)))
    }
}

impl<S> ExactSizeIterator for BitSet9Iter<S> where S: Index9Semantics {}
impl<S> FusedIterator for BitSet9Iter<S> where S: Index9Semantics {}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{Digit, DigitSet, HouseMask};

    #[test]
    fn test_insert_remove_contains() {
        let mut set = DigitSet::new();
        assert!(set.insert(Digit::D3));
        assert!(!set.insert(Digit::D3));
        assert!(set.contains(Digit::D3));
        assert!(!set.contains(Digit::D4));
        assert!(set.remove(Digit::D3));
        assert!(!set.remove(Digit::D3));
        assert!(set.is_empty());
    }

    #[test]
    fn test_constants() {
        assert_eq!(DigitSet::EMPTY.len(), 0);
        assert_eq!(DigitSet::FULL.len(), 9);
        assert_eq!(!DigitSet::EMPTY, DigitSet::FULL);
        for digit in Digit::ALL {
            assert!(DigitSet::FULL.contains(digit));
        }
    }

    #[test]
    fn test_iteration_order() {
        let set = DigitSet::from_iter([Digit::D9, Digit::D1, Digit::D5]);
        let forward: Vec<_> = set.iter().collect();
        assert_eq!(forward, vec![Digit::D1, Digit::D5, Digit::D9]);
        let backward: Vec<_> = set.iter().rev().collect();
        assert_eq!(backward, vec![Digit::D9, Digit::D5, Digit::D1]);
        assert_eq!(set.iter().len(), 3);
    }

    #[test]
    fn test_single_and_double() {
        let one = HouseMask::from_elem(4);
        assert_eq!(one.as_single(), Some(4));
        assert_eq!(one.as_double(), None);

        let two = HouseMask::from_iter([7, 2]);
        assert_eq!(two.as_single(), None);
        assert_eq!(two.as_double(), Some((2, 7)));
    }

    #[test]
    fn test_debug_lists_values() {
        let set = DigitSet::from_iter([Digit::D2, Digit::D7]);
        assert_eq!(format!("{set:?}"), "{D2, D7}");
    }

    proptest! {
        #[test]
        fn test_set_algebra(a in 0u16..512, b in 0u16..512) {
            let a = DigitSet::from_bits(a);
            let b = DigitSet::from_bits(b);
            prop_assert_eq!((a | b).len() + (a & b).len(), a.len() + b.len());
            prop_assert!(a.difference(b).is_disjoint(b));
            prop_assert!((a & b).is_subset(a));
            prop_assert!((a | b).is_superset(b));
            prop_assert_eq!(a.difference(b) | (a & b), a);
            prop_assert_eq!(a ^ b, (a | b) - (a & b));
        }

        #[test]
        fn test_iter_matches_contains(bits in 0u16..512) {
            let set = DigitSet::from_bits(bits);
            let collected = DigitSet::from_iter(set.iter());
            prop_assert_eq!(collected, set);
            for digit in Digit::ALL {
                prop_assert_eq!(set.contains(digit), set.iter().any(|d| d == digit));
            }
        }
    }
}
