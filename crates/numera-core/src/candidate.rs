//! The (cell, digit) pair every deduction is expressed in.

use std::fmt::{self, Display};

use crate::{Digit, Position};

/// Number of distinct candidates on a 9x9 board.
pub const CANDIDATE_COUNT: usize = 81 * 9;

/// A digit that may still be placed in a cell.
///
/// Candidates have a dense index in `0..729` (`position.index() * 9 + digit - 1`), which
/// lets link graphs and colorings use flat arrays instead of maps.
///
/// # Examples
///
/// ```
/// use numera_core::{Candidate, Digit, Position};
///
/// let candidate = Candidate::new(Position::new(1, 0), Digit::D3);
/// assert_eq!(candidate.index(), 11);
/// assert_eq!(Candidate::from_index(11), candidate);
/// assert_eq!(candidate.to_string(), "r1c2(3)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Candidate {
    /// The cell.
    pub position: Position,
    /// The digit.
    pub digit: Digit,
}

impl Candidate {
    /// Creates a candidate.
    #[must_use]
    #[inline]
    pub const fn new(position: Position, digit: Digit) -> Self {
        Self { position, digit }
    }

    /// Returns the dense index of this candidate (0-728).
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.position.index() as usize * 9 + (self.digit.value() - 1) as usize
    }

    /// Creates a candidate from its dense index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`CANDIDATE_COUNT`].
    #[must_use]
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        assert!(index < CANDIDATE_COUNT);
        #[expect(clippy::cast_possible_truncation)]
        let (cell, digit) = ((index / 9) as u8, (index % 9) as u8);
        Self {
            position: Position::from_index(cell),
            digit: Digit::from_value(digit + 1),
        }
    }

    /// Returns all 729 candidates in index order.
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0..CANDIDATE_COUNT).map(Self::from_index)
    }

    /// Returns `true` if the two candidates cannot both be true on any board.
    ///
    /// That is the case when they are different digits of the same cell, or the same
    /// digit in two cells that see each other.
    #[must_use]
    #[inline]
    pub const fn excludes(self, other: Self) -> bool {
        let same_cell = self.position.index() == other.position.index();
        let same_digit = self.digit.value() == other.digit.value();
        if same_cell {
            !same_digit
        } else {
            same_digit && self.position.sees(other.position)
        }
    }
}

impl Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.position, self.digit)
    }
}

impl From<(Position, Digit)> for Candidate {
    fn from((position, digit): (Position, Digit)) -> Self {
        Self::new(position, digit)
    }
}

/// A set of candidates backed by a 729-bit bitset.
///
/// Used for colorings and link adjacency, where membership tests dominate.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CandidateSet {
    words: [u64; 12],
}

impl CandidateSet {
    /// The empty set.
    pub const EMPTY: Self = Self { words: [0; 12] };

    /// Creates an empty set.
    #[must_use]
    #[inline]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Inserts a candidate. Returns `true` if it was not present.
    #[inline]
    pub fn insert(&mut self, candidate: Candidate) -> bool {
        let (word, bit) = Self::locate(candidate);
        let inserted = self.words[word] & bit == 0;
        self.words[word] |= bit;
        inserted
    }

    /// Removes a candidate. Returns `true` if it was present.
    #[inline]
    pub fn remove(&mut self, candidate: Candidate) -> bool {
        let (word, bit) = Self::locate(candidate);
        let removed = self.words[word] & bit != 0;
        self.words[word] &= !bit;
        removed
    }

    /// Returns `true` if the set contains the candidate.
    #[must_use]
    #[inline]
    pub const fn contains(&self, candidate: Candidate) -> bool {
        let (word, bit) = Self::locate(candidate);
        self.words[word] & bit != 0
    }

    /// Returns the number of candidates in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Returns the candidates present in both sets.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let mut words = self.words;
        for (w, o) in words.iter_mut().zip(&other.words) {
            *w &= o;
        }
        Self { words }
    }

    /// Returns the candidates present in either set.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut words = self.words;
        for (w, o) in words.iter_mut().zip(&other.words) {
            *w |= o;
        }
        Self { words }
    }

    /// Returns `true` if the two sets share no candidate.
    #[must_use]
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.words.iter().zip(&other.words).all(|(w, o)| w & o == 0)
    }

    /// Returns an iterator over the candidates in index order.
    #[must_use]
    pub fn iter(&self) -> CandidateSetIter {
        CandidateSetIter {
            words: self.words,
            word: 0,
        }
    }

    const fn locate(candidate: Candidate) -> (usize, u64) {
        let index = candidate.index();
        (index / 64, 1 << (index % 64))
    }
}

impl fmt::Debug for CandidateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Candidate> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = Candidate>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        set.extend(iter);
        set
    }
}

impl Extend<Candidate> for CandidateSet {
    fn extend<I: IntoIterator<Item = Candidate>>(&mut self, iter: I) {
        for candidate in iter {
            self.insert(candidate);
        }
    }
}

impl IntoIterator for &CandidateSet {
    type Item = Candidate;
    type IntoIter = CandidateSetIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the candidates of a [`CandidateSet`].
#[derive(Debug, Clone)]
pub struct CandidateSetIter {
    words: [u64; 12],
    word: usize,
}

impl Iterator for CandidateSetIter {
    type Item = Candidate;

    fn next(&mut self) -> Option<Self::Item> {
        while self.word < self.words.len() {
            let bits = self.words[self.word];
            if bits != 0 {
                self.words[self.word] = bits & (bits - 1);
                let index = self.word * 64 + bits.trailing_zeros() as usize;
                return Some(Candidate::from_index(index));
            }
            self.word += 1;
        }
        None
    }
}

impl std::iter::FusedIterator for CandidateSetIter {}
