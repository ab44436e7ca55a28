//! Core data structures for the numera constraint-propagation engine.
//!
//! This crate holds the board model every other part of the workspace reasons about.
//!
//! # Overview
//!
//! 1. **Basic types**
//!    - [`digit`]: digits 1-9 and [`DigitSet`]
//!    - [`position`]: board cells, their boxes and peers
//!    - [`house`]: rows, columns and boxes
//!    - [`candidate`]: the (cell, digit) pair with a dense index
//!
//! 2. **Containers** parameterized by [`index`] semantics
//!    - [`containers`]: [`BitSet9`], [`BitSet81`], [`Array9`] and [`Array81`]
//!
//! 3. **Board state**
//!    - [`candidate_grid`]: the candidate model, with cell, board and house views kept
//!      in agreement
//!    - [`grid_state`]: immutable snapshots and the base-32 full-state notation
//!    - [`digit_grid`]: placed digits and the 81-character line notation
//!
//! [`BitSet9`]: containers::BitSet9
//! [`BitSet81`]: containers::BitSet81
//! [`Array9`]: containers::Array9
//! [`Array81`]: containers::Array81
//!
//! # Examples
//!
//! ```
//! use numera_core::{CandidateGrid, DigitGrid, Position};
//!
//! let puzzle: DigitGrid =
//!     ".9.2.......1..693..3.71..8.35........48..2.6...7......56....4......4.2..2...3.6.7"
//!         .parse()?;
//! let grid = CandidateGrid::from(&puzzle);
//! assert!(grid.check_consistency().is_ok());
//! assert_eq!(grid.solved_count(), 26);
//! assert!(!grid.candidates_at(Position::new(0, 0)).contains(numera_core::Digit::D9));
//! # Ok::<(), numera_core::NotationError>(())
//! ```

pub mod candidate;
pub mod candidate_grid;
pub mod containers;
pub mod digit;
pub mod digit_grid;
pub mod grid_state;
pub mod house;
pub mod index;
mod notation_error;
pub mod position;

pub use self::{
    candidate::{CANDIDATE_COUNT, Candidate, CandidateSet},
    candidate_grid::{CandidateGrid, ConsistencyError, DigitPositions, HouseMask},
    digit::{Digit, DigitSet},
    digit_grid::DigitGrid,
    grid_state::{CellState, GridState},
    house::{AllDigitHouses, House, all_digit_houses},
    notation_error::NotationError,
    position::Position,
};
