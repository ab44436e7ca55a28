use std::{
    fmt::{self, Display},
    str::FromStr,
};

use rand::SeedableRng as _;
use rand_pcg::Pcg64;
use sha2::{Digest as _, Sha256};

/// A 256-bit seed that fully determines a generated puzzle.
///
/// Seeds are written as 64 lowercase hexadecimal digits.
///
/// # Examples
///
/// ```
/// use numera_generator::PuzzleSeed;
///
/// let seed = PuzzleSeed::from_phrase("morning puzzle");
/// let text = seed.to_string();
/// assert_eq!(text.len(), 64);
/// assert_eq!(text.parse::<PuzzleSeed>()?, seed);
/// # Ok::<(), numera_generator::SeedParseError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PuzzleSeed([u8; 32]);

impl PuzzleSeed {
    /// Creates a seed from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Draws a fresh seed from the thread-local generator.
    #[must_use]
    pub fn random() -> Self {
        Self(rand::random())
    }

    /// Derives a seed from a phrase with SHA-256.
    #[must_use]
    pub fn from_phrase(phrase: &str) -> Self {
        Self(Sha256::digest(phrase.as_bytes()).into())
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub(crate) fn rng(self) -> Pcg64 {
        Pcg64::from_seed(self.0)
    }
}

impl Display for PuzzleSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Error returned when a seed is not 64 hexadecimal digits.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SeedParseError {
    /// The text has the wrong length.
    #[display("seed must have 64 hex digits, got {len}")]
    InvalidLength {
        /// Number of characters found.
        len: usize,
    },
    /// The text contains a non-hex character.
    #[display("invalid hex digit {found:?} in seed")]
    InvalidDigit {
        /// The offending character.
        found: char,
    },
}

impl FromStr for PuzzleSeed {
    type Err = SeedParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let len = s.chars().count();
        if len != 64 {
            return Err(SeedParseError::InvalidLength { len });
        }
        let mut bytes = [0; 32];
        let mut chars = s.chars();
        for byte in &mut bytes {
            let mut value = 0;
            for c in chars.by_ref().take(2) {
                let Some(nibble) = c.to_digit(16) else {
                    return Err(SeedParseError::InvalidDigit { found: c });
                };
                #[expect(clippy::cast_possible_truncation)]
                let nibble = nibble as u8;
                value = (value << 4) | nibble;
            }
            *byte = value;
        }
        Ok(Self(bytes))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_parse_known_seed() {
        let text = "c1d44bd6afaf8af64f126546884e19298acbdc33c3924a28136715de946ef3f1";
        let seed: PuzzleSeed = text.parse().unwrap();
        assert_eq!(seed.as_bytes()[0], 0xc1);
        assert_eq!(seed.as_bytes()[31], 0xf1);
        assert_eq!(seed.to_string(), text);

        let upper: PuzzleSeed = text.to_uppercase().parse().unwrap();
        assert_eq!(upper, seed);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "abc".parse::<PuzzleSeed>(),
            Err(SeedParseError::InvalidLength { len: 3 })
        );
        let bad = format!("{}g", "0".repeat(63));
        assert_eq!(
            bad.parse::<PuzzleSeed>(),
            Err(SeedParseError::InvalidDigit { found: 'g' })
        );
    }

    #[test]
    fn test_phrase_is_stable() {
        assert_eq!(PuzzleSeed::from_phrase("a"), PuzzleSeed::from_phrase("a"));
        assert_ne!(PuzzleSeed::from_phrase("a"), PuzzleSeed::from_phrase("b"));
        // SHA-256("abc")
        assert_eq!(
            PuzzleSeed::from_phrase("abc").to_string(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    proptest! {
        #[test]
        fn test_hex_round_trip(bytes in any::<[u8; 32]>()) {
            let seed = PuzzleSeed::from_bytes(bytes);
            prop_assert_eq!(seed.to_string().parse::<PuzzleSeed>().unwrap(), seed);
        }
    }
}
