//! Index types and semantics for containers.
//!
//! This module provides index types and their associated semantics for working with
//! 9-element and 81-element containers. These types enable type-safe indexing into
//! the arrays and bitsets used throughout the candidate model.
//!
//! # Index Types
//!
//! - [`Index9`] - Index into 9-element containers (range 0-8)
//! - [`Index81`] - Index into 81-element containers (board positions in row-major order)
//!
//! # Semantics
//!
//! - [`DigitSemantics`] - Maps digits 1-9 to indices 0-8
//! - [`CellIndexSemantics`] - Direct 0-8 mapping for cells within a house
//! - [`PositionSemantics`] - Maps [`Position`] to board indices
//!
//! [`Position`]: crate::Position
//!
//! # Examples
//!
//! ```
//! use numera_core::{
//!     Digit,
//!     index::{DigitSemantics, Index9, Index9Semantics},
//! };
//!
//! let idx = DigitSemantics::to_index(Digit::D5);
//! assert_eq!(idx.index(), 4);
//!
//! let indices: Vec<_> = Index9::all().collect();
//! assert_eq!(indices.len(), 9);
//! ```

pub use self::{index_9::*, index_81::*};

mod index_81;
mod index_9;
