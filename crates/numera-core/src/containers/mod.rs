//! Fixed-size containers parameterized by index semantics.
//!
//! - [`BitSet9`] and [`BitSet81`] are bitsets over 9 and 81 values.
//! - [`Array9`] and [`Array81`] are arrays indexed through the same semantics.
//!
//! The semantics parameter decides what a container is indexed by, so a
//! `BitSet9<DigitSemantics>` holds digits while a `BitSet9<CellIndexSemantics>` holds
//! cell offsets inside a house. Mixing the two is a type error.

pub use self::{array_9::*, array_81::*, bit_set_9::*, bit_set_81::*};

mod array_81;
mod array_9;
mod bit_set_81;
mod bit_set_9;
