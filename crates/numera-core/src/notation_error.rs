/// Error returned when parsing a grid notation fails.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum NotationError {
    /// The notation does not have the expected number of cells.
    #[display("expected {expected} cells, found {actual}")]
    InvalidLength {
        /// Number of cells the notation must contain.
        expected: usize,
        /// Number of cells found.
        actual: usize,
    },
    /// A character that has no meaning in the notation.
    #[display("invalid character {character:?} at cell {index}")]
    InvalidCharacter {
        /// Cell index (0-80) where the character appeared.
        index: usize,
        /// The offending character.
        character: char,
    },
    /// A size prefix other than `9x9`.
    #[display("unsupported grid size {prefix:?}")]
    UnsupportedSize {
        /// The prefix as written, without the colon.
        prefix: String,
    },
    /// An unsolved cell without any candidate.
    #[display("cell {index} has no candidates")]
    EmptyCell {
        /// Cell index (0-80).
        index: usize,
    },
    /// A solved cell whose value does not name exactly one digit.
    #[display("cell {index} is solved with an invalid value {value:#05x}")]
    InvalidCellValue {
        /// Cell index (0-80).
        index: usize,
        /// The decoded 10-bit value.
        value: u16,
    },
}
