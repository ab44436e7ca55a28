//! Digit representation.

use std::fmt::{self, Display};

use crate::{containers::BitSet9, index::DigitSemantics};

/// A set of digits, typically the candidates of one cell.
///
/// # Examples
///
/// ```
/// use numera_core::{Digit, DigitSet};
///
/// let mut set = DigitSet::from_iter([Digit::D1, Digit::D5]);
/// assert!(set.contains(Digit::D5));
/// set.remove(Digit::D5);
/// assert_eq!(set.as_single(), Some(Digit::D1));
/// ```
pub type DigitSet = BitSet9<DigitSemantics>;

/// A digit in the range 1-9.
///
/// # Examples
///
/// ```
/// use numera_core::Digit;
///
/// let digit = Digit::from_value(7);
/// assert_eq!(digit, Digit::D7);
/// assert_eq!(digit.value(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Digit {
    /// The digit 1.
    D1 = 1,
    /// The digit 2.
    D2 = 2,
    /// The digit 3.
    D3 = 3,
    /// The digit 4.
    D4 = 4,
    /// The digit 5.
    D5 = 5,
    /// The digit 6.
    D6 = 6,
    /// The digit 7.
    D7 = 7,
    /// The digit 8.
    D8 = 8,
    /// The digit 9.
    D9 = 9,
}

impl Digit {
    /// All digits from 1 to 9, in ascending order.
    pub const ALL: [Self; 9] = [
        Self::D1,
        Self::D2,
        Self::D3,
        Self::D4,
        Self::D5,
        Self::D6,
        Self::D7,
        Self::D8,
        Self::D9,
    ];

    /// Creates a digit from a value in the range 1-9.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not in the range 1-9.
    ///
    /// ```should_panic
    /// use numera_core::Digit;
    ///
    /// let _ = Digit::from_value(0);
    /// ```
    #[must_use]
    pub const fn from_value(value: u8) -> Self {
        match value {
            1 => Self::D1,
            2 => Self::D2,
            3 => Self::D3,
            4 => Self::D4,
            5 => Self::D5,
            6 => Self::D6,
            7 => Self::D7,
            8 => Self::D8,
            9 => Self::D9,
            _ => panic!("Invalid digit value"),
        }
    }

    /// Creates a digit from a value, returning `None` outside 1-9.
    #[must_use]
    pub const fn try_from_value(value: u8) -> Option<Self> {
        if value >= 1 && value <= 9 {
            Some(Self::from_value(value))
        } else {
            None
        }
    }

    /// Creates a digit from its ASCII character `'1'..='9'`.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        if c >= '1' && c <= '9' {
            Some(Self::from_value(c as u8 - b'0'))
        } else {
            None
        }
    }

    /// Returns the numeric value of this digit (1-9).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Returns the ASCII character for this digit.
    #[must_use]
    pub const fn as_char(self) -> char {
        (b'0' + self.value()) as char
    }
}

impl Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.value(), f)
    }
}

impl From<Digit> for u8 {
    fn from(digit: Digit) -> u8 {
        digit.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        for digit in Digit::ALL {
            assert_eq!(Digit::from_value(digit.value()), digit);
            assert_eq!(Digit::from_char(digit.as_char()), Some(digit));
        }
        assert_eq!(Digit::try_from_value(0), None);
        assert_eq!(Digit::try_from_value(10), None);
        assert_eq!(Digit::from_char('0'), None);
        assert_eq!(Digit::from_char('x'), None);
        assert_eq!(format!("{}", Digit::D9), "9");
        assert_eq!(u8::from(Digit::D5), 5);
    }

    #[test]
    #[should_panic(expected = "Invalid digit value")]
    fn test_from_value_ten_panics() {
        let _ = Digit::from_value(10);
    }
}
