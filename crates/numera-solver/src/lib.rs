//! Strategy engine for the numera constraint-propagation solver.
//!
//! # Overview
//!
//! - [`Strategy`] values describe each deduction rule as data, collected in a
//!   [`StrategyRegistry`] and configured through [`StrategyPreset`]s.
//! - [`StrategySolver`] runs them in order over a [`CandidateGrid`], restarting from the
//!   cheapest rule after every commit, and records a [`ChangeReport`] per commit.
//! - Strategies propose changes into a [`ChangeBuffer`]; only the proposals that still
//!   change the grid are applied and reported.
//! - The [`graph`] module builds strong and weak links between candidates; the [`chain`]
//!   module searches alternating chains and propagates hypotheses over them.
//! - [`Backtracker`] is an independent exhaustive search used to count solutions and check
//!   the soundness of the strategies.
//! - [`StatisticsTracker`] observes a solver and counts what each strategy did.
//!
//! [`CandidateGrid`]: numera_core::CandidateGrid
//!
//! # Examples
//!
//! ```
//! use numera_core::DigitGrid;
//! use numera_solver::{Backtracker, SolveStatus, StrategySolver};
//!
//! let puzzle: DigitGrid =
//!     "..3.2.6..9..3.5..1..18.64....81.29..7.......8..67.82....26.95..8..2.3..9..5.1.3.."
//!         .parse()?;
//! assert!(Backtracker::new().has_unique_solution(&puzzle));
//!
//! let mut solver = StrategySolver::standard();
//! solver.set_grid(&puzzle);
//! assert_eq!(solver.solve().status, SolveStatus::Solved);
//! for report in solver.steps().iter().take(3) {
//!     println!("{report}");
//! }
//! # Ok::<(), numera_core::NotationError>(())
//! ```

pub use self::{
    backtrack::{AllDigits, Backtracker, PossibilitiesGiver, SearchSummary},
    change::{Change, ChangeBuffer, ChangeCommit, ChangeKind},
    error::SolverError,
    preset::StrategyPreset,
    registry::StrategyRegistry,
    report::{ChainExplanation, ChangeReport, Explanation, Highlight, HighlightRole, ReportBuilder},
    solver::{SolveOutcome, SolveStatus, StrategySolver},
    strategy::{Difficulty, InstanceHandling, Strategy, StrategyKind},
    tracker::{PuzzleStats, StatisticsTracker, StrategyStats},
};

mod backtrack;
pub mod chain;
mod change;
mod error;
pub mod graph;
mod preset;
mod registry;
mod report;
mod solver;
mod strategy;
pub mod testing;
mod tracker;
