//! Proposed and applied changes to the candidate model.
//!
//! Strategies never touch the model directly. They propose changes into a [`ChangeBuffer`]
//! while reading a shared grid, and the solver applies the resulting [`ChangeCommit`]s.

use std::fmt::{self, Display};

use numera_core::{Candidate, CandidateGrid, CandidateSet, Digit, Position};

use crate::report::ReportBuilder;

/// The two kinds of change a strategy can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::IsVariant)]
pub enum ChangeKind {
    /// The digit is placed in the cell.
    Assignment,
    /// The digit is removed from the cell's candidates.
    Elimination,
}

/// A single assignment or elimination.
///
/// Displays as `+ DRC` or `- DRC`: the digit, then the 1-based row and column.
///
/// # Examples
///
/// ```
/// use numera_core::{Digit, Position};
/// use numera_solver::Change;
///
/// let change = Change::elimination(Position::new(3, 0), Digit::D7);
/// assert_eq!(change.to_string(), "- 714");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Change {
    /// What happens to the candidate.
    pub kind: ChangeKind,
    /// The affected candidate.
    pub candidate: Candidate,
}

impl Change {
    /// Creates an assignment of `digit` to `position`.
    #[must_use]
    pub const fn assignment(position: Position, digit: Digit) -> Self {
        Self {
            kind: ChangeKind::Assignment,
            candidate: Candidate::new(position, digit),
        }
    }

    /// Creates an elimination of `digit` from `position`.
    #[must_use]
    pub const fn elimination(position: Position, digit: Digit) -> Self {
        Self {
            kind: ChangeKind::Elimination,
            candidate: Candidate::new(position, digit),
        }
    }

    /// Returns the affected cell.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.candidate.position
    }

    /// Returns the affected digit.
    #[must_use]
    pub const fn digit(&self) -> Digit {
        self.candidate.digit
    }

    /// Returns `true` if applying this change to `grid` would modify it.
    #[must_use]
    pub fn is_impactful(&self, grid: &CandidateGrid) -> bool {
        // a solved cell has no open candidates, so both kinds reduce to this
        grid.contains(self.candidate)
    }

    /// Applies the change. Returns `false` if it was vacuous.
    pub fn apply(&self, grid: &mut CandidateGrid) -> bool {
        let Candidate { position, digit } = self.candidate;
        match self.kind {
            ChangeKind::Assignment => grid.assign(position, digit),
            ChangeKind::Elimination => grid.eliminate(position, digit),
        }
    }
}

impl Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.kind {
            ChangeKind::Assignment => '+',
            ChangeKind::Elimination => '-',
        };
        let Candidate { position, digit } = self.candidate;
        write!(f, "{sign} {digit}{}{}", position.y() + 1, position.x() + 1)
    }
}

/// Accumulates the proposals of one strategy instance.
///
/// Proposals are checked against the grid they are made on: an assignment must target an
/// unsolved cell that still has the digit, an elimination a candidate that is still open.
/// Anything else, and any repeat, is dropped on the spot.
#[derive(Debug, Default, Clone)]
pub struct ChangeBuffer {
    assignments: Vec<Candidate>,
    eliminations: Vec<Candidate>,
    assigned: CandidateSet,
    eliminated: CandidateSet,
}

impl ChangeBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Proposes placing `digit` in `position`. Returns `true` if the proposal was kept.
    pub fn propose_assignment(
        &mut self,
        grid: &CandidateGrid,
        position: Position,
        digit: Digit,
    ) -> bool {
        let candidate = Candidate::new(position, digit);
        if !grid.contains(candidate) || !self.assigned.insert(candidate) {
            return false;
        }
        self.assignments.push(candidate);
        true
    }

    /// Proposes removing `digit` from `position`. Returns `true` if the proposal was kept.
    pub fn propose_elimination(
        &mut self,
        grid: &CandidateGrid,
        position: Position,
        digit: Digit,
    ) -> bool {
        let candidate = Candidate::new(position, digit);
        if !grid.contains(candidate) || !self.eliminated.insert(candidate) {
            return false;
        }
        self.eliminations.push(candidate);
        true
    }

    /// Returns `true` if at least one valid proposal is waiting.
    #[must_use]
    pub fn need_commit(&self) -> bool {
        !self.assignments.is_empty() || !self.eliminations.is_empty()
    }

    /// Returns the number of pending proposals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len() + self.eliminations.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.need_commit()
    }

    /// Packs the pending proposals with their explanation and empties the buffer.
    ///
    /// Returns `None` and drops `builder` when nothing is pending.
    pub fn commit<B>(&mut self, builder: B) -> Option<ChangeCommit>
    where
        B: ReportBuilder + 'static,
    {
        if !self.need_commit() {
            self.clear();
            return None;
        }
        let changes = self
            .assignments
            .drain(..)
            .map(|c| Change::assignment(c.position, c.digit))
            .chain(
                self.eliminations
                    .drain(..)
                    .map(|c| Change::elimination(c.position, c.digit)),
            )
            .collect();
        self.clear();
        Some(ChangeCommit {
            changes,
            builder: Box::new(builder),
        })
    }

    /// Drops every pending proposal.
    pub fn clear(&mut self) {
        self.assignments.clear();
        self.eliminations.clear();
        self.assigned = CandidateSet::EMPTY;
        self.eliminated = CandidateSet::EMPTY;
    }
}

/// One deduction, ready to be applied: its changes (assignments first) and the builder
/// for its explanation.
#[derive(Debug)]
pub struct ChangeCommit {
    /// Proposed changes, validated against the grid they were found on.
    pub changes: Vec<Change>,
    /// Builds the report once the impactful subset is known.
    pub builder: Box<dyn ReportBuilder>,
}

impl ChangeCommit {
    /// Applies every change that still has an effect and returns those.
    ///
    /// Changes made obsolete by earlier ones, in this commit or a previous one, are
    /// skipped silently.
    pub fn apply(&self, grid: &mut CandidateGrid) -> Vec<Change> {
        self.changes
            .iter()
            .copied()
            .filter(|change| change.apply(grid))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use numera_core::DigitGrid;

    use super::*;
    use crate::report::Explanation;

    fn grid() -> CandidateGrid {
        let digits: DigitGrid = "
            1........
            .........
            .........
            .........
            .........
            .........
            .........
            .........
            .........
        "
        .parse()
        .unwrap();
        CandidateGrid::from(&digits)
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Change::assignment(Position::new(4, 7), Digit::D4).to_string(),
            "+ 485"
        );
        assert_eq!(
            Change::elimination(Position::new(0, 0), Digit::D9).to_string(),
            "- 911"
        );
    }

    #[test]
    fn test_vacuous_proposals_are_dropped() {
        let grid = grid();
        let mut buffer = ChangeBuffer::new();
        // solved cell
        assert!(!buffer.propose_assignment(&grid, Position::new(0, 0), Digit::D1));
        // 1 is gone from the peers of r1c1
        assert!(!buffer.propose_elimination(&grid, Position::new(5, 0), Digit::D1));
        assert!(!buffer.need_commit());

        assert!(buffer.propose_elimination(&grid, Position::new(5, 5), Digit::D1));
        assert!(!buffer.propose_elimination(&grid, Position::new(5, 5), Digit::D1));
        assert_eq!(buffer.len(), 1);
        assert!(buffer.need_commit());
    }

    #[test]
    fn test_commit_orders_assignments_first() {
        let grid = grid();
        let mut buffer = ChangeBuffer::new();
        buffer.propose_elimination(&grid, Position::new(8, 8), Digit::D2);
        buffer.propose_assignment(&grid, Position::new(4, 4), Digit::D5);
        let commit = buffer.commit(Explanation::new("test")).unwrap();
        assert_eq!(
            commit.changes,
            vec![
                Change::assignment(Position::new(4, 4), Digit::D5),
                Change::elimination(Position::new(8, 8), Digit::D2),
            ]
        );
        assert!(buffer.is_empty());
        assert!(buffer.commit(Explanation::new("empty")).is_none());
    }

    #[test]
    fn test_apply_skips_obsolete_changes() {
        let mut grid = grid();
        let before = grid.clone();
        let mut buffer = ChangeBuffer::new();
        buffer.propose_assignment(&grid, Position::new(4, 4), Digit::D5);
        // made vacuous by the assignment above
        buffer.propose_elimination(&grid, Position::new(4, 0), Digit::D5);
        buffer.propose_elimination(&grid, Position::new(8, 8), Digit::D2);
        let commit = buffer.commit(Explanation::new("test")).unwrap();

        let applied = commit.apply(&mut grid);
        assert_eq!(
            applied,
            vec![
                Change::assignment(Position::new(4, 4), Digit::D5),
                Change::elimination(Position::new(8, 8), Digit::D2),
            ]
        );
        assert_ne!(grid, before);
        grid.verify_agreement();

        // everything is obsolete the second time
        assert!(commit.apply(&mut grid).is_empty());
    }
}
