//! Declarative explanations of applied deductions.
//!
//! A [`ChangeReport`] says what changed and why, as a title and a list of [`Highlight`]s
//! over cells, candidates, houses and links. Nothing here renders anything.

use std::fmt::{self, Debug, Display};

use numera_core::{Candidate, GridState, House, Position};

use crate::{
    change::{Change, ChangeKind},
    chain::{Chain, Polarity},
    graph::LinkStrength,
    strategy::{Difficulty, Strategy},
};

/// How a highlighted element takes part in a deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightRole {
    /// Assumed or proven true.
    On,
    /// Assumed or proven false.
    Off,
    /// Part of the pattern that justifies the deduction.
    Cause,
    /// Context only.
    Neutral,
    /// Changed by the deduction.
    Change,
}

/// One highlight directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Highlight {
    /// A whole cell.
    Cell {
        /// The cell.
        position: Position,
        /// Its role.
        role: HighlightRole,
    },
    /// A single candidate.
    Candidate {
        /// The candidate.
        candidate: Candidate,
        /// Its role.
        role: HighlightRole,
    },
    /// A row, column or box.
    House {
        /// The house.
        house: House,
        /// Its role.
        role: HighlightRole,
    },
    /// A link between two candidates.
    Link {
        /// Where the link starts.
        from: Candidate,
        /// Where the link ends.
        to: Candidate,
        /// The kind of link.
        strength: LinkStrength,
    },
}

/// The explanation of one applied commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeReport {
    /// Name of the strategy that made the deduction.
    pub strategy: String,
    /// Difficulty of that strategy.
    pub difficulty: Difficulty,
    /// One-line description.
    pub title: String,
    /// Elements to highlight, in drawing order.
    pub highlights: Vec<Highlight>,
    /// The changes that were actually applied.
    pub changes: Vec<Change>,
    /// The grid right before the changes.
    pub before: GridState,
}

impl ChangeReport {
    /// Creates a report without title or highlights.
    #[must_use]
    pub fn new(strategy: &Strategy, changes: Vec<Change>, before: GridState) -> Self {
        Self {
            strategy: strategy.name().to_owned(),
            difficulty: strategy.difficulty(),
            title: String::new(),
            highlights: Vec::new(),
            changes,
            before,
        }
    }

    /// Returns the number of assignments in the report.
    #[must_use]
    pub fn assignments(&self) -> usize {
        self.changes.iter().filter(|c| c.kind.is_assignment()).count()
    }

    /// Returns the number of eliminations in the report.
    #[must_use]
    pub fn eliminations(&self) -> usize {
        self.changes.iter().filter(|c| c.kind.is_elimination()).count()
    }

    /// Formats the changes compactly, writing the sign once per run of the same kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use numera_core::{Digit, GridState, Position};
    /// use numera_solver::{Change, ChangeReport, StrategyRegistry};
    ///
    /// let registry = StrategyRegistry::standard();
    /// let strategy = registry.get("x-wing").unwrap();
    /// let changes = vec![
    ///     Change::elimination(Position::new(3, 0), Digit::D7),
    ///     Change::elimination(Position::new(3, 4), Digit::D7),
    /// ];
    /// let report = ChangeReport::new(strategy, changes, GridState::default());
    /// assert_eq!(report.changes_summary(), "- 714 754");
    /// ```
    #[must_use]
    pub fn changes_summary(&self) -> String {
        let mut out = String::new();
        let mut last = None;
        for change in &self.changes {
            let text = change.to_string();
            if last == Some(change.kind) {
                out.push(' ');
                out.push_str(&text[2..]);
            } else {
                if last.is_some() {
                    out.push(' ');
                }
                out.push_str(&text);
            }
            last = Some(change.kind);
        }
        out
    }
}

impl Display for ChangeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.strategy)?;
        if !self.title.is_empty() {
            write!(f, "{} => ", self.title)?;
        }
        write!(f, "{}", self.changes_summary())
    }
}

/// Builds the report of a commit from the changes that were actually applied.
///
/// Builders are created while a strategy searches and only run if the commit still
/// changes something, so they should capture the pattern cheaply and do any formatting
/// work here.
pub trait ReportBuilder: Debug {
    /// Builds the report.
    ///
    /// `before` is the grid right before `changes` were applied.
    fn build_report(
        &self,
        strategy: &Strategy,
        changes: Vec<Change>,
        before: GridState,
    ) -> ChangeReport;
}

/// The stock report builder: a title plus highlights of the pattern.
///
/// Every applied change is appended as a [`HighlightRole::Change`] candidate highlight.
/// Candidate highlights that were no longer open before the commit are dropped.
///
/// # Examples
///
/// ```
/// use numera_core::{House, Position};
/// use numera_solver::{Explanation, HighlightRole};
///
/// let explanation = Explanation::new("Naked pair in row 1")
///     .house(House::Row { y: 0 }, HighlightRole::Neutral)
///     .cells([Position::new(0, 0), Position::new(5, 0)], HighlightRole::Cause);
/// assert_eq!(explanation.highlights().len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Explanation {
    title: String,
    highlights: Vec<Highlight>,
}

impl Explanation {
    /// Creates an explanation with the given title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            highlights: Vec::new(),
        }
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the highlights added so far.
    #[must_use]
    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    /// Highlights a cell.
    #[must_use]
    pub fn cell(mut self, position: Position, role: HighlightRole) -> Self {
        self.highlights.push(Highlight::Cell { position, role });
        self
    }

    /// Highlights several cells.
    #[must_use]
    pub fn cells<I>(mut self, positions: I, role: HighlightRole) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        self.highlights.extend(
            positions
                .into_iter()
                .map(|position| Highlight::Cell { position, role }),
        );
        self
    }

    /// Highlights a candidate.
    #[must_use]
    pub fn candidate(mut self, candidate: Candidate, role: HighlightRole) -> Self {
        self.highlights
            .push(Highlight::Candidate { candidate, role });
        self
    }

    /// Highlights several candidates.
    #[must_use]
    pub fn candidates<I>(mut self, candidates: I, role: HighlightRole) -> Self
    where
        I: IntoIterator<Item = Candidate>,
    {
        self.highlights.extend(
            candidates
                .into_iter()
                .map(|candidate| Highlight::Candidate { candidate, role }),
        );
        self
    }

    /// Highlights a house.
    #[must_use]
    pub fn house(mut self, house: House, role: HighlightRole) -> Self {
        self.highlights.push(Highlight::House { house, role });
        self
    }

    /// Highlights a link.
    #[must_use]
    pub fn link(mut self, from: Candidate, to: Candidate, strength: LinkStrength) -> Self {
        self.highlights.push(Highlight::Link { from, to, strength });
        self
    }

    /// Highlights every node and link of a chain.
    ///
    /// Nodes get [`HighlightRole::On`] or [`HighlightRole::Off`] by their polarity along
    /// the chain.
    #[must_use]
    pub fn chain(mut self, chain: &Chain) -> Self {
        for (candidate, polarity) in chain.nodes_with_polarity() {
            let role = match polarity {
                Polarity::On => HighlightRole::On,
                Polarity::Off => HighlightRole::Off,
            };
            self.highlights.push(Highlight::Candidate { candidate, role });
        }
        for (from, to, strength) in chain.links() {
            self.highlights.push(Highlight::Link { from, to, strength });
        }
        self
    }
}

impl ReportBuilder for Explanation {
    fn build_report(
        &self,
        strategy: &Strategy,
        changes: Vec<Change>,
        before: GridState,
    ) -> ChangeReport {
        let mut highlights: Vec<_> = self
            .highlights
            .iter()
            .copied()
            .filter(|h| match h {
                Highlight::Candidate { candidate, .. } => before.contains(*candidate),
                _ => true,
            })
            .collect();
        highlights.extend(changes.iter().map(|change| {
            let role = match change.kind {
                ChangeKind::Assignment => HighlightRole::On,
                ChangeKind::Elimination => HighlightRole::Change,
            };
            Highlight::Candidate {
                candidate: change.candidate,
                role,
            }
        }));
        let mut report = ChangeReport::new(strategy, changes, before);
        report.title.clone_from(&self.title);
        report.highlights = highlights;
        report
    }
}

/// Report builder for chain deductions.
///
/// The chain is walked only when the report is built, so finding a chain whose
/// eliminations turn out to be obsolete costs no formatting.
#[derive(Debug, Clone)]
pub struct ChainExplanation {
    kind: &'static str,
    chain: Chain,
}

impl ChainExplanation {
    /// Creates a builder for `chain`; `kind` names the chain type in the title.
    #[must_use]
    pub fn new(kind: &'static str, chain: Chain) -> Self {
        Self { kind, chain }
    }
}

impl ReportBuilder for ChainExplanation {
    fn build_report(
        &self,
        strategy: &Strategy,
        changes: Vec<Change>,
        before: GridState,
    ) -> ChangeReport {
        let title = format!("{} of length {}: {}", self.kind, self.chain.len(), self.chain);
        Explanation::new(title)
            .chain(&self.chain)
            .build_report(strategy, changes, before)
    }
}

#[cfg(test)]
mod tests {
    use numera_core::{CandidateGrid, Digit};

    use super::*;
    use crate::StrategyRegistry;

    #[test]
    fn test_summary_groups_runs() {
        let registry = StrategyRegistry::standard();
        let changes = vec![
            Change::assignment(Position::new(4, 7), Digit::D4),
            Change::elimination(Position::new(0, 0), Digit::D1),
            Change::elimination(Position::new(1, 0), Digit::D1),
        ];
        let report = ChangeReport::new(
            registry.get("naked single").unwrap(),
            changes,
            GridState::default(),
        );
        assert_eq!(report.changes_summary(), "+ 485 - 111 112");
        assert_eq!(report.assignments(), 1);
        assert_eq!(report.eliminations(), 2);
    }

    #[test]
    fn test_explanation_drops_stale_candidates() {
        let registry = StrategyRegistry::standard();
        let mut grid = CandidateGrid::new();
        grid.eliminate(Position::new(0, 0), Digit::D2);
        let before = grid.snapshot();
        let report = Explanation::new("test")
            .candidate(Candidate::new(Position::new(0, 0), Digit::D2), HighlightRole::Cause)
            .candidate(Candidate::new(Position::new(0, 0), Digit::D3), HighlightRole::Cause)
            .build_report(
                registry.get("naked single").unwrap(),
                vec![Change::elimination(Position::new(1, 1), Digit::D9)],
                before,
            );
        assert_eq!(report.title, "test");
        assert_eq!(
            report.highlights,
            vec![
                Highlight::Candidate {
                    candidate: Candidate::new(Position::new(0, 0), Digit::D3),
                    role: HighlightRole::Cause,
                },
                Highlight::Candidate {
                    candidate: Candidate::new(Position::new(1, 1), Digit::D9),
                    role: HighlightRole::Change,
                },
            ]
        );
    }
}
