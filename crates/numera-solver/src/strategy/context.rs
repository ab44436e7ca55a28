use std::{ops::ControlFlow, sync::Arc};

use numera_core::{Candidate, CandidateGrid, Digit, DigitPositions, Position};

use super::InstanceHandling;
use crate::{
    change::{ChangeBuffer, ChangeCommit},
    chain::{Coloring, Polarity},
    graph::{GraphCache, LinkGraph, LinkRules},
    report::ReportBuilder,
};

/// What a strategy sees while it searches.
///
/// The grid is shared and read-only. Proposals go into a fresh buffer, and every
/// [`StrategyContext::commit`] turns the buffer into one instance.
pub(crate) struct StrategyContext<'a> {
    grid: &'a CandidateGrid,
    graphs: &'a mut GraphCache,
    handling: InstanceHandling,
    assume_unique: bool,
    buffer: ChangeBuffer,
    commits: Vec<ChangeCommit>,
}

impl<'a> StrategyContext<'a> {
    pub(crate) fn new(
        grid: &'a CandidateGrid,
        graphs: &'a mut GraphCache,
        handling: InstanceHandling,
        assume_unique: bool,
    ) -> Self {
        Self {
            grid,
            graphs,
            handling,
            assume_unique,
            buffer: ChangeBuffer::new(),
            commits: Vec::new(),
        }
    }

    pub(crate) fn grid(&self) -> &'a CandidateGrid {
        self.grid
    }

    /// Whether uniqueness-based strategies may assume a single solution.
    pub(crate) fn assume_unique(&self) -> bool {
        self.assume_unique
    }

    pub(crate) fn graph(&mut self, rules: LinkRules) -> Arc<LinkGraph> {
        self.graphs.graph(self.grid, rules)
    }

    pub(crate) fn coloring(&mut self, seed: Candidate, polarity: Polarity) -> Arc<Coloring> {
        self.graphs.coloring(self.grid, seed, polarity)
    }

    pub(crate) fn propose_assignment(&mut self, position: Position, digit: Digit) -> bool {
        self.buffer.propose_assignment(self.grid, position, digit)
    }

    pub(crate) fn propose_elimination(&mut self, position: Position, digit: Digit) -> bool {
        self.buffer.propose_elimination(self.grid, position, digit)
    }

    /// Proposes removing `digit` from every cell of `mask`.
    pub(crate) fn propose_eliminations(&mut self, mask: DigitPositions, digit: Digit) -> bool {
        let mut any = false;
        for pos in mask & self.grid.digit_positions(digit) {
            any |= self.propose_elimination(pos, digit);
        }
        any
    }

    pub(crate) fn need_commit(&self) -> bool {
        self.buffer.need_commit()
    }

    /// Closes the current instance.
    ///
    /// An empty buffer commits nothing and the explanation is never built. Breaks once
    /// the first instance is in when only the first one is wanted.
    pub(crate) fn commit<B, F>(&mut self, explain: F) -> ControlFlow<()>
    where
        B: ReportBuilder + 'static,
        F: FnOnce() -> B,
    {
        if !self.buffer.need_commit() {
            self.buffer.clear();
            return ControlFlow::Continue(());
        }
        if let Some(commit) = self.buffer.commit(explain()) {
            self.commits.push(commit);
        }
        if self.handling == InstanceHandling::FirstOnly {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    /// Drops pending proposals without committing.
    pub(crate) fn discard(&mut self) {
        self.buffer.clear();
    }

    pub(crate) fn into_commits(self) -> Vec<ChangeCommit> {
        self.commits
    }
}
