//! Exhaustive depth-first search over digit placements.
//!
//! The backtracker is independent of the strategy engine: it keeps its own row, column
//! and box occupancy and only asks a [`PossibilitiesGiver`] which digits to try in each
//! empty cell. It is used to count solutions, to check that a strategy never removes a
//! candidate that belongs to a solution, and to build solved grids for the generator.
//!
//! # Examples
//!
//! ```
//! use numera_core::DigitGrid;
//! use numera_solver::Backtracker;
//!
//! let puzzle: DigitGrid =
//!     ".9.2.......1..693..3.71..8.35........48..2.6...7......56....4......4.2..2...3.6.7"
//!         .parse()?;
//! let backtracker = Backtracker::new();
//! assert_eq!(backtracker.count_solutions(&puzzle, 2), 2);
//! # Ok::<(), numera_core::NotationError>(())
//! ```

use std::ops::{ControlFlow, Deref, DerefMut};

use numera_core::{CandidateGrid, Digit, DigitGrid, DigitSet, Position};

/// Supplies the digits to try in a cell.
pub trait PossibilitiesGiver {
    /// Returns the digits that may go in `pos`.
    fn possibilities(&self, pos: Position) -> DigitSet;

    /// Returns the order in which digits are tried in `pos`.
    ///
    /// Digits missing from [`possibilities`](Self::possibilities) are skipped, so the
    /// default ascending order works for every giver.
    fn order(&self, pos: Position) -> [Digit; 9] {
        let _ = pos;
        Digit::ALL
    }
}

/// Tries every digit everywhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllDigits;

impl PossibilitiesGiver for AllDigits {
    fn possibilities(&self, _pos: Position) -> DigitSet {
        DigitSet::FULL
    }
}

/// Tries only the open candidates of the grid, or the solved digit of a solved cell.
impl PossibilitiesGiver for CandidateGrid {
    fn possibilities(&self, pos: Position) -> DigitSet {
        match self.solved_at(pos) {
            Some(digit) => DigitSet::from_elem(digit),
            None => self.candidates_at(pos),
        }
    }
}

impl<G> PossibilitiesGiver for &G
where
    G: PossibilitiesGiver + ?Sized,
{
    fn possibilities(&self, pos: Position) -> DigitSet {
        (**self).possibilities(pos)
    }

    fn order(&self, pos: Position) -> [Digit; 9] {
        (**self).order(pos)
    }
}

/// Counters of one search.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchSummary {
    /// Solutions visited.
    pub solutions: usize,
    /// Placements tried.
    pub nodes: u64,
    /// `true` if the search space was fully explored.
    pub exhausted: bool,
}

/// Depth-first search in row-major cell order.
#[derive(Debug, Clone)]
pub struct Backtracker<G = AllDigits> {
    giver: G,
    node_limit: Option<u64>,
}

impl Default for Backtracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Backtracker {
    /// Creates a backtracker that tries every digit.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            giver: AllDigits,
            node_limit: None,
        }
    }
}

impl<G> Backtracker<G>
where
    G: PossibilitiesGiver,
{
    /// Creates a backtracker that asks `giver` for the digits to try.
    #[must_use]
    pub fn with_giver(giver: G) -> Self {
        Self {
            giver,
            node_limit: None,
        }
    }

    /// Stops every search after `limit` placements.
    #[must_use]
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// Returns the first solution in search order.
    #[must_use]
    pub fn first_solution(&self, grid: &DigitGrid) -> Option<DigitGrid> {
        self.solutions(grid, 1).into_iter().next()
    }

    /// Returns up to `cap` distinct solutions in search order.
    #[must_use]
    pub fn solutions(&self, grid: &DigitGrid, cap: usize) -> Vec<DigitGrid> {
        let mut found = Vec::new();
        if cap == 0 {
            return found;
        }
        let mut work = grid.clone();
        self.search(&mut work, |solution| {
            found.push(solution.clone());
            if found.len() >= cap {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        found
    }

    /// Counts solutions, stopping at `cap`.
    #[must_use]
    pub fn count_solutions(&self, grid: &DigitGrid, cap: usize) -> usize {
        if cap == 0 {
            return 0;
        }
        let mut work = grid.clone();
        let mut count = 0;
        self.search(&mut work, |_| {
            count += 1;
            if count >= cap {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        count
    }

    /// Returns `true` if `grid` has exactly one solution.
    #[must_use]
    pub fn has_unique_solution(&self, grid: &DigitGrid) -> bool {
        self.count_solutions(grid, 2) == 1
    }

    /// Visits every solution of `grid` until `visit` breaks.
    ///
    /// Solutions are filled into `grid` while `visit` runs; when the search returns,
    /// `grid` holds exactly what it held before. Givens that clash yield no solution.
    pub fn search<F>(&self, grid: &mut DigitGrid, mut visit: F) -> SearchSummary
    where
        F: FnMut(&DigitGrid) -> ControlFlow<()>,
    {
        let mut summary = SearchSummary::default();
        let Some(occupancy) = Occupancy::from_grid(grid) else {
            summary.exhausted = true;
            return summary;
        };
        let empty: Vec<Position> = grid.empty_positions().collect();
        let mut state = SearchState {
            grid,
            occupancy,
            nodes: 0,
        };
        let flow = self.visit(&mut state, &empty, &mut summary, &mut visit);
        summary.nodes = state.nodes;
        summary.exhausted = flow.is_continue();
        log::trace!("backtracking finished: {summary:?}");
        summary
    }

    fn visit<F>(
        &self,
        state: &mut SearchState<'_>,
        empty: &[Position],
        summary: &mut SearchSummary,
        visit: &mut F,
    ) -> ControlFlow<()>
    where
        F: FnMut(&DigitGrid) -> ControlFlow<()>,
    {
        let Some((&pos, rest)) = empty.split_first() else {
            summary.solutions += 1;
            return visit(&*state.grid);
        };
        let allowed = self.giver.possibilities(pos) - state.occupancy.used(pos);
        if allowed.is_empty() {
            return ControlFlow::Continue(());
        }
        for digit in self.giver.order(pos) {
            if !allowed.contains(digit) {
                continue;
            }
            if self.node_limit.is_some_and(|limit| state.nodes >= limit) {
                return ControlFlow::Break(());
            }
            state.nodes += 1;
            let mut placed = Placement::new(state, pos, digit);
            self.visit(&mut placed, rest, summary, visit)?;
        }
        ControlFlow::Continue(())
    }
}

/// Digits used per row, column and box.
#[derive(Debug, Clone, Copy)]
struct Occupancy {
    rows: [DigitSet; 9],
    columns: [DigitSet; 9],
    boxes: [DigitSet; 9],
}

impl Occupancy {
    fn from_grid(grid: &DigitGrid) -> Option<Self> {
        let mut occupancy = Self {
            rows: [DigitSet::EMPTY; 9],
            columns: [DigitSet::EMPTY; 9],
            boxes: [DigitSet::EMPTY; 9],
        };
        for (pos, digit) in grid.filled() {
            if occupancy.used(pos).contains(digit) {
                return None;
            }
            occupancy.insert(pos, digit);
        }
        Some(occupancy)
    }

    fn used(&self, pos: Position) -> DigitSet {
        self.rows[usize::from(pos.y())]
            | self.columns[usize::from(pos.x())]
            | self.boxes[usize::from(pos.box_index())]
    }

    fn insert(&mut self, pos: Position, digit: Digit) {
        self.rows[usize::from(pos.y())].insert(digit);
        self.columns[usize::from(pos.x())].insert(digit);
        self.boxes[usize::from(pos.box_index())].insert(digit);
    }

    fn remove(&mut self, pos: Position, digit: Digit) {
        self.rows[usize::from(pos.y())].remove(digit);
        self.columns[usize::from(pos.x())].remove(digit);
        self.boxes[usize::from(pos.box_index())].remove(digit);
    }
}

#[derive(Debug)]
struct SearchState<'a> {
    grid: &'a mut DigitGrid,
    occupancy: Occupancy,
    nodes: u64,
}

/// A placement that is undone when the guard goes out of scope.
struct Placement<'s, 'g> {
    state: &'s mut SearchState<'g>,
    pos: Position,
    digit: Digit,
}

impl<'s, 'g> Placement<'s, 'g> {
    fn new(state: &'s mut SearchState<'g>, pos: Position, digit: Digit) -> Self {
        state.grid.set(pos, Some(digit));
        state.occupancy.insert(pos, digit);
        Self { state, pos, digit }
    }
}

impl Drop for Placement<'_, '_> {
    fn drop(&mut self) {
        self.state.grid.set(self.pos, None);
        self.state.occupancy.remove(self.pos, self.digit);
    }
}

impl<'g> Deref for Placement<'_, 'g> {
    type Target = SearchState<'g>;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl DerefMut for Placement<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}
