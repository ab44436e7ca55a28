use std::{
    fmt::{self, Debug},
    marker::PhantomData,
    ops::{Index, IndexMut},
};

use crate::index::{Index81, Index81Semantics};

/// A fixed array with one element per board cell, indexed through semantics `S`.
///
/// With [`PositionSemantics`](crate::index::PositionSemantics) the array is indexed by
/// [`Position`](crate::Position) and stored in row-major order.
pub struct Array81<T, S> {
    array: [T; 81],
    _semantics: PhantomData<S>,
}

impl<T, S> Array81<T, S> {
    /// Wraps a raw array.
    #[must_use]
    #[inline]
    pub const fn from_array(array: [T; 81]) -> Self {
        Self {
            array,
            _semantics: PhantomData,
        }
    }

    /// Returns the underlying array.
    #[must_use]
    #[inline]
    pub fn into_array(self) -> [T; 81] {
        self.array
    }

    /// Returns the elements as a slice, in index order.
    #[must_use]
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.array
    }

    /// Returns an iterator over the elements in index order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.array.iter()
    }

    /// Returns a mutable iterator over the elements in index order.
    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.array.iter_mut()
    }
}

impl<T, S> Array81<T, S>
where
    S: Index81Semantics,
{
    /// Builds the array by calling `f` with each value in index order.
    #[must_use]
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(S::Value) -> T,
    {
        Self::from_array(std::array::from_fn(|i| {
            #[expect(clippy::cast_possible_truncation)]
            let index = Index81::new(i as u8);
            f(S::from_index(index))
        }))
    }

    /// Returns an iterator over `(value, element)` pairs.
    pub fn entries(&self) -> impl Iterator<Item = (S::Value, &T)> {
        Index81::all().map(S::from_index).zip(&self.array)
    }
}

impl<T: Clone, S> Clone for Array81<T, S> {
    fn clone(&self) -> Self {
        Self::from_array(self.array.clone())
    }
}

impl<T: Copy, S> Copy for Array81<T, S> {}

impl<T: PartialEq, S> PartialEq for Array81<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.array == other.array
    }
}

impl<T: Eq, S> Eq for Array81<T, S> {}

impl<T: Default, S> Default for Array81<T, S> {
    fn default() -> Self {
        Self::from_array(std::array::from_fn(|_| T::default()))
    }
}

impl<T: Debug, S> Debug for Array81<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.array).finish()
    }
}

impl<T, S> From<[T; 81]> for Array81<T, S> {
    fn from(array: [T; 81]) -> Self {
        Self::from_array(array)
    }
}

impl<T, S> Index<S::Value> for Array81<T, S>
where
    S: Index81Semantics,
{
    type Output = T;

    #[inline]
    fn index(&self, value: S::Value) -> &T {
        &self.array[usize::from(S::to_index(value).index())]
    }
}

impl<T, S> IndexMut<S::Value> for Array81<T, S>
where
    S: Index81Semantics,
{
    #[inline]
    fn index_mut(&mut self, value: S::Value) -> &mut T {
        &mut self.array[usize::from(S::to_index(value).index())]
    }
}

impl<'a, T, S> IntoIterator for &'a Array81<T, S> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.array.iter()
    }
}

impl<'a, T, S> IntoIterator for &'a mut Array81<T, S> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.array.iter_mut()
    }
}

impl<T, S> IntoIterator for Array81<T, S> {
    type Item = T;
    type IntoIter = std::array::IntoIter<T, 81>;

    fn into_iter(self) -> Self::IntoIter {
        self.array.into_iter()
    }
}
